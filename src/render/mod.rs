//! Backends that turn a set of disks into something visible.

use crate::spiral::DiskSet;
use std::io;

pub mod canvas;
pub mod retained;
pub mod terminal;

/// Draws frames.
///
/// Every call replaces whatever the previous frame drew. Disks are drawn in order so later disks
/// end up on top.
pub trait Renderer {
    fn render(&mut self, disks: &DiskSet) -> Result<(), RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, disks: &DiskSet) -> Result<(), RenderError> {
        (**self).render(disks)
    }
}

/// Errors that can occur when rendering a frame.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("viewport too small to draw in: {0}x{1}")]
    ViewportTooSmall(u16, u16),
}
