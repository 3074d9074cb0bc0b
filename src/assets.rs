//! Sprite assets and their asynchronous loading.
//!
//! A sprite file is plain text:
//!
//! ```text
//! # comment
//! palette a #eaeff7
//! palette b #c2c8d2
//! ---
//! .aa.
//! bbbb
//! ```
//!
//! `.` (and any space) is transparent. Rows may be ragged.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::{info, warn};

use crate::canvas::Rgb;
use crate::error::AssetError;

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    width: usize,
    height: usize,
    pixels: Vec<Option<Rgb>>,
}

impl Sprite {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            None
        }
    }

    pub fn parse(source: &str) -> Result<Sprite, AssetError> {
        let mut palette: HashMap<char, Rgb> = HashMap::new();
        let mut rows: Vec<(usize, &str)> = Vec::new();
        let mut in_grid = false;

        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx + 1;
            if in_grid {
                rows.push((line_no, raw.trim_end()));
                continue;
            }
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line == "---" {
                in_grid = true;
                continue;
            }
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some("palette"), Some(key), Some(hex), None) => {
                    let mut chars = key.chars();
                    let (Some(c), None) = (chars.next(), chars.next()) else {
                        return Err(AssetError::Parse {
                            line: line_no,
                            message: format!("palette key `{key}` must be one character"),
                        });
                    };
                    let color = Rgb::parse(hex).ok_or_else(|| AssetError::Parse {
                        line: line_no,
                        message: format!("bad colour `{hex}`"),
                    })?;
                    palette.insert(c, color);
                }
                _ => {
                    return Err(AssetError::Parse {
                        line: line_no,
                        message: format!("unexpected header line `{line}`"),
                    })
                }
            }
        }

        while rows.last().is_some_and(|(_, r)| r.is_empty()) {
            rows.pop();
        }
        let width = rows.iter().map(|(_, r)| r.chars().count()).max().unwrap_or(0);
        if rows.is_empty() || width == 0 {
            return Err(AssetError::Empty);
        }

        let mut pixels = Vec::with_capacity(width * rows.len());
        for (line_no, row) in &rows {
            let mut count = 0;
            for c in row.chars() {
                let px = match c {
                    '.' | ' ' => None,
                    other => Some(*palette.get(&other).ok_or_else(|| AssetError::Parse {
                        line: *line_no,
                        message: format!("colour `{other}` is not in the palette"),
                    })?),
                };
                pixels.push(px);
                count += 1;
            }
            pixels.extend(std::iter::repeat(None).take(width - count));
        }

        Ok(Sprite {
            width,
            height: rows.len(),
            pixels,
        })
    }

    pub fn load(path: &Path) -> Result<Sprite, AssetError> {
        let text = fs::read_to_string(path).map_err(|e| AssetError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Sprite::parse(&text)
    }
}

// ── Handle ────────────────────────────────────────────────────────────────────

/// An asset that may still be on its way.
///
/// Renderers must draw a fallback for every state other than `Ready`.
#[derive(Debug)]
pub enum AssetHandle {
    Loading(Receiver<Result<Sprite, AssetError>>),
    Ready(Sprite),
    Failed(AssetError),
}

impl AssetHandle {
    /// Starts loading `path` on a background thread.
    pub fn load(path: PathBuf) -> AssetHandle {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // Receiver gone means the game was dropped; nothing to report to.
            let _ = tx.send(Sprite::load(&path));
        });
        AssetHandle::Loading(rx)
    }

    /// A handle that never becomes ready.
    pub fn missing() -> AssetHandle {
        AssetHandle::Failed(AssetError::Disconnected)
    }

    /// Picks up a finished load, if any. Cheap to call every frame.
    pub fn poll(&mut self) {
        let AssetHandle::Loading(rx) = self else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(sprite)) => {
                info!("sprite ready ({}x{})", sprite.width(), sprite.height());
                *self = AssetHandle::Ready(sprite);
            }
            Ok(Err(e)) => {
                warn!("sprite failed to load, using fallback: {e}");
                *self = AssetHandle::Failed(e);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => *self = AssetHandle::Failed(AssetError::Disconnected),
        }
    }

    pub fn ready(&self) -> Option<&Sprite> {
        match self {
            AssetHandle::Ready(sprite) => Some(sprite),
            _ => None,
        }
    }
}

impl From<Sprite> for AssetHandle {
    fn from(sprite: Sprite) -> Self {
        AssetHandle::Ready(sprite)
    }
}
