//! Disks unwinding along spiral trajectories inside a circular viewport.
//!
//! A [playback::AnimationLoop] advances time and wraps it around at the end of every cycle,
//! [spiral::FrameGenerator] lays out the disks for that time, and a [render::Renderer] draws them.

pub mod app;
pub mod color;
pub mod config;
pub mod controls;
pub mod geometry;
pub mod palette;
pub mod playback;
pub mod render;
pub mod schedule;
pub mod spiral;
