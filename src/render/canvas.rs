use crate::{color::Color, geometry::Point, spiral::DiskSet};

/// The width of a disk's outline, in canvas pixels.
const STROKE_WIDTH: f64 = 1.0;

/// Maps viewport coordinates into canvas pixels.
///
/// The square viewport is scaled to fit the canvas and centered in it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportTransform {
    scale: f64,
    offset: Point,
}

impl ViewportTransform {
    pub fn fit(viewport_width: f64, canvas_width: usize, canvas_height: usize) -> Self {
        let side = canvas_width.min(canvas_height) as f64;
        let scale = side / viewport_width;
        let offset = Point::new((canvas_width as f64 - side) / 2.0, (canvas_height as f64 - side) / 2.0);
        Self { scale, offset }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn apply(&self, point: Point) -> Point {
        Point::new(point.x * self.scale + self.offset.x, point.y * self.scale + self.offset.y)
    }
}

/// A circular region of the canvas, in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Clip {
    center: Point,
    radius: f64,
}

impl Clip {
    fn contains(&self, point: &Point) -> bool {
        self.center.distance(point) <= self.radius
    }
}

/// A grid of pixels disks get rasterized into.
#[derive(Clone, Debug)]
pub struct Canvas {
    width: usize,
    height: usize,
    background: Color,
    pixels: Vec<Color>,
    clip: Option<Clip>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: Color) -> Self {
        Self { width, height, background, pixels: vec![background; width * height], clip: None }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// The color of the pixel at the given position, or `None` if it's outside the viewport.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height || !self.is_visible(x, y) {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Clear the canvas and draw all disks in order, clipped to the circular viewport.
    pub fn draw(&mut self, disks: &DiskSet) {
        self.pixels.fill(self.background);
        let transform = ViewportTransform::fit(disks.viewport_width(), self.width, self.height);
        let half_width = disks.viewport_width() / 2.0;
        self.clip = Some(Clip {
            center: transform.apply(Point::new(half_width, half_width)),
            radius: half_width * transform.scale(),
        });
        for disk in disks {
            let center = transform.apply(disk.center);
            let radius = disk.radius * transform.scale();
            self.draw_disk(center, radius, disk.fill, disk.stroke, disk.alpha);
        }
    }

    /// Draw a filled and outlined disk, in canvas pixels.
    pub fn draw_disk(&mut self, center: Point, radius: f64, fill: Color, stroke: Color, alpha: f64) {
        if radius <= 0.0 || alpha <= 0.0 {
            return;
        }
        let min_x = (center.x - radius).floor().max(0.0) as usize;
        let min_y = (center.y - radius).floor().max(0.0) as usize;
        let max_x = ((center.x + radius).ceil().max(0.0) as usize).min(self.width);
        let max_y = ((center.y + radius).ceil().max(0.0) as usize).min(self.height);
        for y in min_y..max_y {
            for x in min_x..max_x {
                let distance = pixel_center(x, y).distance(&center);
                if distance > radius || !self.is_visible(x, y) {
                    continue;
                }
                let color = if distance > radius - STROKE_WIDTH { stroke } else { fill };
                let pixel = &mut self.pixels[y * self.width + x];
                *pixel = color.blend_over(*pixel, alpha);
            }
        }
    }

    fn is_visible(&self, x: usize, y: usize) -> bool {
        self.clip.map(|clip| clip.contains(&pixel_center(x, y))).unwrap_or(true)
    }
}

fn pixel_center(x: usize, y: usize) -> Point {
    Point::new(x as f64 + 0.5, y as f64 + 0.5)
}
