use crate::{color::Color, geometry::Point};
use serde::{Deserialize, Serialize};

/// The colors every disk in a frame is painted with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskStyle {
    /// The color the disk is filled with.
    pub fill: Color,

    /// The color of the disk's outline.
    pub stroke: Color,
}

impl DiskStyle {
    /// Swap the fill and stroke colors.
    pub fn inverted(self) -> Self {
        Self { fill: self.stroke, stroke: self.fill }
    }
}

impl Default for DiskStyle {
    fn default() -> Self {
        Self { fill: Color::WHITE, stroke: Color::BLACK }
    }
}

/// A single disk to be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DiskDescriptor {
    /// The disk's radius, in viewport pixels.
    pub radius: f64,

    /// The disk's center, in viewport pixels.
    pub center: Point,

    pub fill: Color,
    pub stroke: Color,

    /// The disk's opacity, in `[0, 1]`.
    pub alpha: f64,
}

/// The ordered set of disks that make up a frame.
///
/// Disks later in the set are meant to be drawn on top of earlier ones.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DiskSet {
    viewport_width: f64,
    disks: Vec<DiskDescriptor>,
}

impl DiskSet {
    pub fn new(viewport_width: f64, disks: Vec<DiskDescriptor>) -> Self {
        Self { viewport_width, disks }
    }

    /// The width of the square viewport these disks are laid out in.
    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    pub fn disks(&self) -> &[DiskDescriptor] {
        &self.disks
    }

    pub fn len(&self) -> usize {
        self.disks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiskDescriptor> {
        self.disks.iter()
    }
}

impl<'a> IntoIterator for &'a DiskSet {
    type Item = &'a DiskDescriptor;
    type IntoIter = std::slice::Iter<'a, DiskDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.disks.iter()
    }
}
