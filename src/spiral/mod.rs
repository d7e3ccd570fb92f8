//! The spiral itself: the disks that make up a frame and how they're laid out over time.

mod disk;
mod frame;

pub use disk::{DiskDescriptor, DiskSet, DiskStyle};
pub use frame::{FrameGenerator, FrameLayout, generate};
