//! Logical-resolution drawing surface.
//!
//! Renderers draw into a `Canvas` in logical pixels only; `screen` scales the
//! finished canvas into whatever terminal it lands in. Text is kept as runs
//! anchored in logical space rather than rasterised, since the terminal
//! draws glyphs far better than a 240×135 bitmap could.

use std::f32::consts::TAU;

use crate::assets::Sprite;

// ── Colour ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn hex(value: u32) -> Rgb {
        Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Parses `#rgb` or `#rrggbb`.
    pub fn parse(text: &str) -> Option<Rgb> {
        let digits = text.strip_prefix('#')?;
        match digits.len() {
            6 => u32::from_str_radix(digits, 16).ok().map(Rgb::hex),
            3 => {
                let v = u32::from_str_radix(digits, 16).ok()?;
                let expand = |n: u32| ((n & 0xf) * 0x11) as u8;
                Some(Rgb(expand(v >> 8), expand(v >> 4), expand(v)))
            }
            _ => None,
        }
    }

    /// `self` painted over `under` with opacity `alpha`.
    pub fn over(self, under: Rgb, alpha: f32) -> Rgb {
        let a = alpha.clamp(0.0, 1.0);
        let mix = |top: u8, bottom: u8| {
            (top as f32 * a + bottom as f32 * (1.0 - a)).round() as u8
        };
        Rgb(mix(self.0, under.0), mix(self.1, under.1), mix(self.2, under.2))
    }
}

/// Screen-space rectangle, used for buttons and their click tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect { x, y, w, h }
    }

    /// Edges inclusive.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }
}

// ── Text ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub color: Rgb,
    pub align: Align,
}

// ── Canvas ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
    texts: Vec<TextRun>,
    /// Translation applied to world-space drawing (the camera transform).
    offset: (f32, f32),
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Rgb::default(); width * height],
            texts: Vec::new(),
            offset: (0.0, 0.0),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn texts(&self) -> &[TextRun] {
        &self.texts
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Clears pixels and text and drops any translation.
    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
        self.texts.clear();
        self.offset = (0.0, 0.0);
    }

    pub fn set_offset(&mut self, dx: f32, dy: f32) {
        self.offset = (dx, dy);
    }

    pub fn reset_offset(&mut self) {
        self.offset = (0.0, 0.0);
    }

    fn to_px(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x + self.offset.0).floor() as i32,
            (y + self.offset.1).floor() as i32,
        )
    }

    fn put(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.pixels[idx] = if alpha >= 1.0 {
            color
        } else {
            color.over(self.pixels[idx], alpha)
        };
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.blend_rect(x, y, w, h, color, 1.0);
    }

    pub fn blend_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32) {
        let (x0, y0) = self.to_px(x, y);
        let x1 = (x0 + w.round() as i32).min(self.width as i32);
        let y1 = (y0 + h.round() as i32).min(self.height as i32);
        for py in y0.max(0)..y1 {
            for px in x0.max(0)..x1 {
                self.put(px, py, color, alpha);
            }
        }
    }

    /// One-pixel outline of the rectangle.
    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32) {
        let (x0, y0) = self.to_px(x, y);
        let x1 = x0 + w.round() as i32 - 1;
        let y1 = y0 + h.round() as i32 - 1;
        for px in x0..=x1 {
            self.put(px, y0, color, alpha);
            self.put(px, y1, color, alpha);
        }
        for py in y0..=y1 {
            self.put(x0, py, color, alpha);
            self.put(x1, py, color, alpha);
        }
    }

    /// Full-surface tint, ignoring the translation.
    pub fn blend_all(&mut self, color: Rgb, alpha: f32) {
        for p in &mut self.pixels {
            *p = color.over(*p, alpha);
        }
    }

    pub fn hline(&mut self, x0: f32, x1: f32, y: f32, color: Rgb, alpha: f32) {
        let (a, py) = self.to_px(x0, y);
        let (b, _) = self.to_px(x1, y);
        if py < 0 || py as usize >= self.height {
            return;
        }
        for px in a.max(0)..=b.min(self.width as i32 - 1) {
            self.put(px, py, color, alpha);
        }
    }

    pub fn vline(&mut self, x: f32, y0: f32, y1: f32, color: Rgb, alpha: f32) {
        let (px, a) = self.to_px(x, y0);
        let (_, b) = self.to_px(x, y1);
        if px < 0 || px as usize >= self.width {
            return;
        }
        for py in a.max(0)..=b.min(self.height as i32 - 1) {
            self.put(px, py, color, alpha);
        }
    }

    /// Arc of radius `r` from angle `start` to `end` (radians, clockwise in
    /// screen space as y grows downward).
    pub fn stroke_arc(
        &mut self,
        cx: f32,
        cy: f32,
        r: f32,
        start: f32,
        end: f32,
        color: Rgb,
        alpha: f32,
    ) {
        let (ox, oy) = (cx + self.offset.0, cy + self.offset.1);
        // Skip arcs whose bounding box misses the surface entirely.
        if ox + r < 0.0
            || oy + r < 0.0
            || ox - r > self.width as f32
            || oy - r > self.height as f32
        {
            return;
        }
        let sweep = (end - start).abs().min(TAU);
        let steps = ((sweep * r).ceil() as usize).max(1);
        let mut last = None;
        for i in 0..=steps {
            let a = start + (end - start).signum() * sweep * i as f32 / steps as f32;
            let p = self.to_px(cx + a.cos() * r, cy + a.sin() * r);
            if last != Some(p) {
                self.put(p.0, p.1, color, alpha);
                last = Some(p);
            }
        }
    }

    pub fn stroke_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgb, alpha: f32) {
        self.stroke_arc(cx, cy, r, 0.0, TAU, color, alpha);
    }

    /// A ring `width` pixels thick centred on radius `r`.
    pub fn stroke_ring(&mut self, cx: f32, cy: f32, r: f32, width: f32, color: Rgb) {
        let half = width / 2.0;
        let mut rr = r - half;
        while rr <= r + half {
            self.stroke_circle(cx, cy, rr, color, 1.0);
            rr += 0.5;
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgb) {
        let (x0, y0) = self.to_px(cx - r, cy - r);
        let (x1, y1) = self.to_px(cx + r, cy + r);
        let (ox, oy) = (cx + self.offset.0, cy + self.offset.1);
        for py in y0.max(0)..=y1.min(self.height as i32 - 1) {
            for px in x0.max(0)..=x1.min(self.width as i32 - 1) {
                let dx = px as f32 + 0.5 - ox;
                let dy = py as f32 + 0.5 - oy;
                if dx * dx + dy * dy <= r * r {
                    self.put(px, py, color, 1.0);
                }
            }
        }
    }

    /// Draws `sprite` at its native size with its top-left corner at `(x, y)`.
    pub fn draw_sprite(&mut self, sprite: &Sprite, x: f32, y: f32, flip_x: bool) {
        self.draw_sprite_scaled(
            sprite,
            x,
            y,
            sprite.width() as f32,
            sprite.height() as f32,
            flip_x,
        );
    }

    /// Draws `sprite` stretched (nearest neighbour) to `w`×`h`.
    pub fn draw_sprite_scaled(
        &mut self,
        sprite: &Sprite,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        flip_x: bool,
    ) {
        let (x0, y0) = self.to_px(x, y);
        let (w, h) = (w.round().max(0.0) as usize, h.round().max(0.0) as usize);
        if w == 0 || h == 0 {
            return;
        }
        for dy in 0..h {
            let sy = dy * sprite.height() / h;
            for dx in 0..w {
                let sx = dx * sprite.width() / w;
                let src = if flip_x { sprite.width() - 1 - sx } else { sx };
                if let Some(color) = sprite.pixel(src, sy) {
                    self.put(x0 + dx as i32, y0 + dy as i32, color, 1.0);
                }
            }
        }
    }

    /// Queues a text run. Text is always screen-space.
    pub fn text(&mut self, x: f32, y: f32, text: impl Into<String>, color: Rgb, align: Align) {
        self.texts.push(TextRun {
            x,
            y,
            text: text.into(),
            color,
            align,
        });
    }
}
