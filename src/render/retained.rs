use super::{RenderError, Renderer};
use crate::{
    color::Color,
    spiral::{DiskDescriptor, DiskSet},
};
use serde::Serialize;
use std::fmt::Write;

/// A persistent shape standing for one disk slot.
///
/// Shapes are positioned by their bounding box's top left corner, like elements in a document.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShapeNode {
    pub left: f64,
    pub top: f64,
    pub size: f64,
    pub fill: Color,
    pub stroke: Color,
    pub opacity: f64,
}

impl ShapeNode {
    fn new(disk: &DiskDescriptor) -> Self {
        let mut node = Self { left: 0.0, top: 0.0, size: 0.0, fill: disk.fill, stroke: disk.stroke, opacity: 1.0 };
        node.update(disk);
        node
    }

    /// Update this node in place to match `disk`, returning whether anything changed.
    fn update(&mut self, disk: &DiskDescriptor) -> bool {
        let updated = Self {
            left: disk.center.x - disk.radius,
            top: disk.center.y - disk.radius,
            size: disk.radius * 2.0,
            fill: disk.fill,
            stroke: disk.stroke,
            opacity: disk.alpha,
        };
        if *self == updated {
            return false;
        }
        *self = updated;
        true
    }

    fn radius(&self) -> f64 {
        self.size / 2.0
    }
}

/// Statistics about the last frame a [RetainedRenderer] drew.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RetainedStats {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

/// Keeps one shape per disk slot alive across frames, mutating them in place on every frame.
#[derive(Debug, Default)]
pub struct RetainedRenderer {
    viewport_width: f64,
    nodes: Vec<ShapeNode>,
    stats: RetainedStats,
    frames: u64,
}

impl RetainedRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[ShapeNode] {
        &self.nodes
    }

    pub fn stats(&self) -> RetainedStats {
        self.stats
    }

    /// The number of frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Export the current shapes as an SVG document, clipped to the circular viewport.
    pub fn to_svg(&self) -> String {
        let width = self.viewport_width;
        let half = width / 2.0;
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{width}" viewBox="0 0 {width} {width}">"#
        );
        let _ = writeln!(svg, r#"  <clipPath id="viewport"><circle cx="{half}" cy="{half}" r="{half}"/></clipPath>"#);
        let _ = writeln!(svg, r#"  <g clip-path="url(#viewport)">"#);
        for node in &self.nodes {
            let radius = node.radius();
            let _ = writeln!(
                svg,
                r#"    <circle cx="{}" cy="{}" r="{}" fill="{}" stroke="{}" opacity="{}"/>"#,
                node.left + radius,
                node.top + radius,
                radius,
                node.fill,
                node.stroke,
                node.opacity
            );
        }
        svg.push_str("  </g>\n</svg>\n");
        svg
    }
}

impl Renderer for RetainedRenderer {
    fn render(&mut self, disks: &DiskSet) -> Result<(), RenderError> {
        let mut stats = RetainedStats::default();
        if self.nodes.len() > disks.len() {
            stats.removed = self.nodes.len() - disks.len();
            self.nodes.truncate(disks.len());
        }
        for (index, disk) in disks.iter().enumerate() {
            match self.nodes.get_mut(index) {
                Some(node) => {
                    if node.update(disk) {
                        stats.updated += 1;
                    }
                }
                None => {
                    self.nodes.push(ShapeNode::new(disk));
                    stats.created += 1;
                }
            }
        }
        self.viewport_width = disks.viewport_width();
        self.stats = stats;
        self.frames += 1;
        Ok(())
    }
}
