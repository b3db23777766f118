use crate::foundation::error::{ChaosError, ChaosResult};

/// One polygon corner in canvas pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Vertex {
    /// Column, 0 at the left edge.
    pub x: i32,
    /// Row, 0 at the top edge.
    pub y: i32,
}

impl Vertex {
    /// Create a vertex.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Position of the chaos-game walk.
///
/// Kept wider than [`Vertex`] so averaging never overflows and an escaped cursor can still be
/// reported verbatim in a [`ChaosError::Bounds`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
}

impl Position {
    /// Create a position.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Center of a `width`x`height` canvas, using integer division.
    pub fn canvas_center(width: u32, height: u32) -> Self {
        Self {
            x: i64::from(width / 2),
            y: i64::from(height / 2),
        }
    }
}

impl From<Vertex> for Position {
    fn from(v: Vertex) -> Self {
        Self {
            x: i64::from(v.x),
            y: i64::from(v.y),
        }
    }
}

/// Opaque RGB8 color.
///
/// Serialized as a packed `0x00RRGGBB` integer so palettes stay compact in JSON configs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Canvas background.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Create a color from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack `0x00RRGGBB`. The top byte is ignored.
    pub const fn from_packed(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xFF) as u8,
            g: ((v >> 8) & 0xFF) as u8,
            b: (v & 0xFF) as u8,
        }
    }

    /// Pack into `0x00RRGGBB`.
    pub const fn to_packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Channels in `[r, g, b]` order.
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<u32> for Rgb8 {
    fn from(v: u32) -> Self {
        Self::from_packed(v)
    }
}

impl From<Rgb8> for u32 {
    fn from(c: Rgb8) -> Self {
        c.to_packed()
    }
}

/// Palette used when no colors are configured: red, green, blue, cyan, magenta, yellow, white.
pub const DEFAULT_PALETTE: [Rgb8; 7] = [
    Rgb8::from_packed(0xFF0000),
    Rgb8::from_packed(0x00FF00),
    Rgb8::from_packed(0x0000FF),
    Rgb8::from_packed(0x00FFFF),
    Rgb8::from_packed(0xFF00FF),
    Rgb8::from_packed(0xFFFF00),
    Rgb8::from_packed(0xFFFFFF),
];

/// Absolute 0-based index of a sampled video frame.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// File name of this frame inside a frame directory (`00042.png`).
    pub fn file_name(self) -> String {
        format!("{:05}.png", self.0)
    }
}

/// Whole frames per second of the time-lapse video.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Fps(u32);

impl Fps {
    /// Create a validated FPS value.
    pub fn new(fps: u32) -> ChaosResult<Self> {
        if fps == 0 {
            return Err(ChaosError::validation("fps must be > 0"));
        }
        Ok(Self(fps))
    }

    /// Frames per second.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Number of frames in a video lasting `secs` seconds.
    pub fn frames_for_secs(self, secs: u32) -> u64 {
        u64::from(secs) * u64::from(self.0)
    }
}

impl TryFrom<u32> for Fps {
    type Error = ChaosError;

    fn try_from(v: u32) -> ChaosResult<Self> {
        Self::new(v)
    }
}

impl From<Fps> for u32 {
    fn from(f: Fps) -> Self {
        f.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
