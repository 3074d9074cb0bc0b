//! Presenting a logical canvas in the terminal.
//!
//! Every terminal cell shows two vertically stacked samples using the upper
//! half block, so a cell is roughly square. The canvas is scaled uniformly
//! to fit and centred (letterboxed); nothing upstream knows the terminal
//! size.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use glam::Vec2;

use crate::canvas::{Align, Canvas, Rgb};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub logical_w: usize,
    pub logical_h: usize,
    pub origin_col: u16,
    pub origin_row: u16,
    /// Cells used horizontally.
    pub cols: u16,
    /// Cells used vertically.
    pub rows: u16,
    /// Half-cell samples used vertically (`rows * 2` or one less).
    pub samples_h: u16,
}

impl Viewport {
    pub fn fit(logical_w: usize, logical_h: usize, term_cols: u16, term_rows: u16) -> Viewport {
        let avail_w = term_cols.max(1) as f32;
        let avail_h = (term_rows.max(1) as f32) * 2.0;
        let scale = (avail_w / logical_w as f32).min(avail_h / logical_h as f32);
        let cols = ((logical_w as f32 * scale).floor() as u16).clamp(1, term_cols.max(1));
        let samples_h = ((logical_h as f32 * scale).floor() as u16).clamp(1, term_rows.max(1) * 2);
        let rows = samples_h.div_ceil(2);
        Viewport {
            logical_w,
            logical_h,
            origin_col: (term_cols.saturating_sub(cols)) / 2,
            origin_row: (term_rows.saturating_sub(rows)) / 2,
            cols,
            rows,
            samples_h,
        }
    }

    /// Logical coordinates of the centre of a terminal cell, clamped to the
    /// canvas.
    pub fn to_logical(&self, col: u16, row: u16) -> Vec2 {
        let c = col.saturating_sub(self.origin_col).min(self.cols - 1) as f32;
        let r = row.saturating_sub(self.origin_row).min(self.rows - 1) as f32;
        Vec2::new(
            (c + 0.5) / self.cols as f32 * self.logical_w as f32,
            ((r * 2.0 + 1.0) / self.samples_h as f32 * self.logical_h as f32)
                .min(self.logical_h as f32 - 0.5),
        )
    }

    fn source_x(&self, col: u16) -> usize {
        let x = ((col as f32 + 0.5) * self.logical_w as f32 / self.cols as f32) as usize;
        x.min(self.logical_w - 1)
    }

    fn source_y(&self, sample: u16) -> usize {
        let y = ((sample as f32 + 0.5) * self.logical_h as f32 / self.samples_h as f32) as usize;
        y.min(self.logical_h - 1)
    }

    /// Top and bottom colours shown in cell (`col`, `row`) of the viewport.
    pub fn sample_cell(&self, canvas: &Canvas, col: u16, row: u16) -> (Rgb, Rgb) {
        let x = self.source_x(col);
        let top = canvas.pixel(x, self.source_y(row * 2)).unwrap_or_default();
        let bottom = if row * 2 + 1 < self.samples_h {
            canvas.pixel(x, self.source_y(row * 2 + 1)).unwrap_or_default()
        } else {
            Rgb::default()
        };
        (top, bottom)
    }

    fn text_cell(&self, x: f32, y: f32, len: usize, align: Align) -> (u16, u16) {
        let col = (x / self.logical_w as f32 * self.cols as f32).floor() as i32;
        let col = match align {
            Align::Left => col,
            Align::Center => col - len as i32 / 2,
            Align::Right => col - len as i32,
        };
        let row = (y / self.logical_h as f32 * self.samples_h as f32 / 2.0).floor() as i32;
        (
            col.clamp(0, self.cols as i32 - 1) as u16,
            row.clamp(0, self.rows as i32 - 1) as u16,
        )
    }
}

fn term_color(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

/// Clears the whole terminal, used when the viewport changes.
pub fn clear<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.queue(style::ResetColor)?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    Ok(())
}

/// Writes one complete frame.
pub fn present<W: Write>(out: &mut W, canvas: &Canvas, vp: &Viewport) -> std::io::Result<()> {
    let mut fg = None;
    let mut bg = None;

    for row in 0..vp.rows {
        out.queue(cursor::MoveTo(vp.origin_col, vp.origin_row + row))?;
        for col in 0..vp.cols {
            let (top, bottom) = vp.sample_cell(canvas, col, row);
            if fg != Some(top) {
                out.queue(style::SetForegroundColor(term_color(top)))?;
                fg = Some(top);
            }
            if bg != Some(bottom) {
                out.queue(style::SetBackgroundColor(term_color(bottom)))?;
                bg = Some(bottom);
            }
            out.queue(Print('▀'))?;
        }
    }

    for run in canvas.texts() {
        let len = run.text.chars().count();
        let (col, row) = vp.text_cell(run.x, run.y, len, run.align);
        let visible: String = run.text.chars().take((vp.cols - col) as usize).collect();
        let (behind, _) = vp.sample_cell(canvas, col, row);
        out.queue(cursor::MoveTo(vp.origin_col + col, vp.origin_row + row))?;
        out.queue(style::SetBackgroundColor(term_color(behind)))?;
        out.queue(style::SetForegroundColor(term_color(run.color)))?;
        out.queue(Print(visible))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}
