use serde::Deserialize;

/// A tracked hand joint in normalized image coordinates ([0,1] on both axes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(from = "[f32; 2]")]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Landmark {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

/// Landmarks of a single detected hand, in the estimator's joint order.
/// Only valid when it holds exactly `NUM_LANDMARKS` points.
pub type LandmarkSet = Vec<Landmark>;

/// Joint numbering of the hand-pose estimator
pub const NUM_LANDMARKS: usize = 21;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;

/// Screen size in pixels, queried once at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenBounds {
    pub width: u32,
    pub height: u32,
}

impl ScreenBounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Limits a pixel position to `0..=width-1`, `0..=height-1`.
    pub fn clamp(&self, x: i32, y: i32) -> (i32, i32) {
        let max_x = self.width.saturating_sub(1).min(i32::MAX as u32) as i32;
        let max_y = self.height.saturating_sub(1).min(i32::MAX as u32) as i32;
        (x.clamp(0, max_x), y.clamp(0, max_y))
    }

    /// Parses `WIDTHxHEIGHT`, e.g. `1920x1080`.
    pub fn parse(value: &str) -> Option<Self> {
        let (w, h) = value.trim().split_once(['x', 'X'])?;
        let width = w.trim().parse().ok()?;
        let height = h.trim().parse().ok()?;
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }
}

/// Result of classifying one frame. Exactly one per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureLabel {
    Move,
    LockedIdle,
    LeftClick,
    RightClick,
    DoubleClick,
    Screenshot,
}

impl GestureLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            GestureLabel::Move => "move",
            GestureLabel::LockedIdle => "locked-idle",
            GestureLabel::LeftClick => "left-click",
            GestureLabel::RightClick => "right-click",
            GestureLabel::DoubleClick => "double-click",
            GestureLabel::Screenshot => "screenshot",
        }
    }
}

impl std::fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}
