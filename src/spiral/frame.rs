use super::disk::{DiskDescriptor, DiskSet};
use crate::{
    config::Configuration,
    geometry::{Point, polar_to_cartesian},
};
use std::f64::consts::PI;

/// How fast a disk moves away from the center, in viewport widths per second.
const RADIAL_VELOCITY: f64 = 0.05;

/// The size of every disk, relative to the viewport width.
const DISK_RADIUS_RATIO: f64 = 0.3;

/// The parts of a frame that only depend on the spiral's geometry settings.
///
/// These are derived once per session rather than once per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameLayout {
    revision: u64,
    disk_count: usize,
    disks_per_cycle: f64,
    delay_between_disks: f64,
    start_offset: f64,
    viewport_width: f64,
    disk_radius: f64,
}

impl FrameLayout {
    pub fn new(config: &Configuration) -> Self {
        let disks_per_cycle = config.disks_per_cycle() as f64;
        Self {
            revision: config.geometry_revision(),
            disk_count: config.disk_count(),
            disks_per_cycle,
            delay_between_disks: config.cycle_duration() / 2.0 / disks_per_cycle,
            start_offset: 1.0 / config.speed(),
            viewport_width: config.viewport_width(),
            disk_radius: DISK_RADIUS_RATIO * config.viewport_width(),
        }
    }

    pub fn disk_count(&self) -> usize {
        self.disk_count
    }

    /// The angular slot the disk at `index` sits on.
    pub fn angle(&self, index: usize) -> f64 {
        (PI / self.disks_per_cycle) * self.slots_behind(index)
    }

    /// How far, in unit viewport space, the disk at `index` has moved away from the center at time `t`.
    ///
    /// Disks that haven't emerged yet sit at the center.
    pub fn distance(&self, index: usize, t: f64) -> f64 {
        let delay = self.delay_between_disks * self.slots_behind(index);
        (RADIAL_VELOCITY * (t + self.start_offset - delay)).max(0.0)
    }

    /// Lay out every disk for time `t`.
    pub fn disks(&self, t: f64, config: &Configuration) -> DiskSet {
        let style = config.style();
        let disks = (0..self.disk_count)
            .map(|index| {
                let position = polar_to_cartesian(self.distance(index, t), self.angle(index));
                let center = Point::new(
                    (position.x + 0.5) * self.viewport_width,
                    (position.y + 0.5) * self.viewport_width,
                );
                DiskDescriptor {
                    radius: self.disk_radius,
                    center,
                    fill: style.fill,
                    stroke: style.stroke,
                    alpha: self.alpha(index, config.opacity_mode()),
                }
            })
            .collect();
        DiskSet::new(self.viewport_width, disks)
    }

    fn alpha(&self, index: usize, opacity_mode: bool) -> f64 {
        if opacity_mode { (index as f64 / self.disks_per_cycle) % 1.0 } else { 1.0 }
    }

    fn slots_behind(&self, index: usize) -> f64 {
        (self.disk_count - index - 1) as f64
    }
}

/// Generate the disks for time `t`.
///
/// This is a pure function of its inputs: the same time and configuration always yield the same
/// disks.
pub fn generate(t: f64, config: &Configuration) -> DiskSet {
    FrameLayout::new(config).disks(t, config)
}

/// Generates frames, re-deriving the frame layout only when the geometry settings change.
#[derive(Debug, Default)]
pub struct FrameGenerator {
    layout: Option<FrameLayout>,
}

impl FrameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The layout for the current session, if one has started.
    pub fn layout(&self) -> Option<&FrameLayout> {
        self.layout.as_ref()
    }

    /// Generate the disks for time `t`.
    pub fn generate(&mut self, t: f64, config: &Configuration) -> DiskSet {
        self.layout_for(config).disks(t, config)
    }

    fn layout_for(&mut self, config: &Configuration) -> &FrameLayout {
        let revision = config.geometry_revision();
        let current = matches!(&self.layout, Some(layout) if layout.revision == revision);
        if !current {
            let layout = FrameLayout::new(config);
            tracing::debug!(
                disk_count = layout.disk_count,
                revision = layout.revision,
                "starting new frame generation session"
            );
            self.layout = Some(layout);
        }
        self.layout.as_ref().expect("layout was just initialized")
    }
}
