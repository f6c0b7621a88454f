use crate::types::ScreenBounds;

/// Weight of the new target against the previous cursor position.
pub const SMOOTHING_FACTOR: f32 = 0.3;
/// Smoothed steps of this many pixels or fewer on both axes are not sent.
pub const MOVEMENT_THRESHOLD_PX: i32 = 2;

/// Last smoothed cursor position. Unseeded until the first MOVE frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorState {
    pub prev_x: i32,
    pub prev_y: i32,
    pub initialized: bool,
}

/// Turns the raw fingertip position into smoothed, jitter-gated cursor moves.
///
/// `prev_x`/`prev_y` advance on every call, including the ones whose step is
/// below the threshold and therefore not sent. Slow drifts are followed
/// internally without ever being forwarded until a single step exceeds the
/// threshold.
#[derive(Debug, Default)]
pub struct CursorSmoother {
    state: CursorState,
}

impl CursorSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_state(state: CursorState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Forgets the anchor; the next call seeds it again.
    pub fn reset(&mut self) {
        self.state = CursorState::default();
    }

    /// `raw_x`, `raw_y` are normalized fingertip coordinates. Returns the
    /// screen position to move to, if any.
    pub fn smooth_move(&mut self, raw_x: f32, raw_y: f32, bounds: ScreenBounds) -> Option<(i32, i32)> {
        let x = (raw_x * bounds.width as f32) as i32;
        let y = (raw_y * bounds.height as f32) as i32;

        if !self.state.initialized {
            self.state = CursorState {
                prev_x: x,
                prev_y: y,
                initialized: true,
            };
            return None;
        }

        let prev_x = self.state.prev_x;
        let prev_y = self.state.prev_y;
        let new_x = (prev_x as f32 + (x - prev_x) as f32 * SMOOTHING_FACTOR) as i32;
        let new_y = (prev_y as f32 + (y - prev_y) as f32 * SMOOTHING_FACTOR) as i32;

        self.state.prev_x = new_x;
        self.state.prev_y = new_y;

        if (new_x - prev_x).abs() > MOVEMENT_THRESHOLD_PX
            || (new_y - prev_y).abs() > MOVEMENT_THRESHOLD_PX
        {
            Some((new_x, new_y))
        } else {
            None
        }
    }
}
