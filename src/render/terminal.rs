use super::{RenderError, Renderer, canvas::Canvas};
use crate::{color::Color, spiral::DiskSet};
use crossterm::{
    ExecutableCommand, QueueableCommand,
    cursor::{Hide, MoveTo, Show},
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};

const UPPER_HALF_BLOCK: char = '▀';
const LOWER_HALF_BLOCK: char = '▄';

/// A terminal cell, made up of two vertically stacked pixels.
///
/// `None` pixels lie outside the viewport and are left with the terminal's own background.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Cell {
    top: Option<Color>,
    bottom: Option<Color>,
}

impl Cell {
    fn glyph(&self) -> (char, TermColor, TermColor) {
        let color = |pixel: Option<Color>| pixel.map(TermColor::from).unwrap_or(TermColor::Reset);
        match (self.top, self.bottom) {
            (None, None) => (' ', TermColor::Reset, TermColor::Reset),
            (None, Some(bottom)) => (LOWER_HALF_BLOCK, bottom.into(), TermColor::Reset),
            (top, bottom) => (UPPER_HALF_BLOCK, color(top), color(bottom)),
        }
    }
}

/// Draws frames into a terminal using 24 bit colors.
///
/// Every frame is rasterized from scratch and only the cells that changed since the previous frame
/// are written out.
pub struct TerminalRenderer<W: Write> {
    writer: W,
    canvas: Canvas,
    columns: u16,
    rows: u16,
    cells: Vec<Cell>,
    previous: Option<Vec<Cell>>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(writer: W, columns: u16, rows: u16, background: Color) -> Self {
        let canvas = Canvas::new(columns as usize, rows as usize * 2, background);
        Self { writer, canvas, columns, rows, cells: Vec::new(), previous: None }
    }

    /// Resize the drawing area. The next frame is drawn in full.
    pub fn resize(&mut self, columns: u16, rows: u16) {
        tracing::debug!(columns, rows, "resizing terminal renderer");
        self.canvas = Canvas::new(columns as usize, rows as usize * 2, self.canvas.background());
        self.columns = columns;
        self.rows = rows;
        self.previous = None;
    }

    pub fn size(&self) -> (u16, u16) {
        (self.columns, self.rows)
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn rasterize(&mut self, disks: &DiskSet) {
        self.canvas.draw(disks);
        self.cells.clear();
        for row in 0..self.rows as usize {
            for column in 0..self.columns as usize {
                let top = self.canvas.pixel(column, row * 2);
                let bottom = self.canvas.pixel(column, row * 2 + 1);
                self.cells.push(Cell { top, bottom });
            }
        }
    }

    fn emit(&mut self) -> Result<usize, RenderError> {
        let mut emitted = 0;
        let mut cursor: Option<(u16, u16)> = None;
        if self.previous.is_none() {
            self.writer.queue(Clear(ClearType::All))?;
        }
        for (index, cell) in self.cells.iter().enumerate() {
            if let Some(previous) = &self.previous {
                if previous[index] == *cell {
                    continue;
                }
            }
            let column = (index % self.columns as usize) as u16;
            let row = (index / self.columns as usize) as u16;
            if cursor != Some((column, row)) {
                self.writer.queue(MoveTo(column, row))?;
            }
            let (glyph, foreground, background) = cell.glyph();
            self.writer
                .queue(SetForegroundColor(foreground))?
                .queue(SetBackgroundColor(background))?
                .queue(Print(glyph))?;
            cursor = Some((column + 1, row));
            emitted += 1;
        }
        if emitted > 0 {
            self.writer.queue(ResetColor)?;
        }
        self.writer.flush()?;
        Ok(emitted)
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, disks: &DiskSet) -> Result<(), RenderError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(RenderError::ViewportTooSmall(self.columns, self.rows));
        }
        self.rasterize(disks);
        let emitted = self.emit()?;
        tracing::trace!(emitted, "frame drawn");
        self.previous = Some(self.cells.clone());
        Ok(())
    }
}

/// Puts the terminal in raw mode on an alternate screen for as long as it's alive.
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        tracing::info!("terminal raw mode enabled");
        // build the session before anything else can fail so raw mode gets disabled on drop
        let session = Self { _private: () };
        io::stdout().execute(EnterAlternateScreen)?.execute(Hide)?;
        tracing::info!("alternate screen enabled");
        Ok(session)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = stdout.execute(ResetColor).and_then(|s| s.execute(Show)).and_then(|s| s.execute(LeaveAlternateScreen));
        let _ = terminal::disable_raw_mode();
        tracing::info!("terminal restored");
    }
}
