use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info};

use crate::hid::{MouseButton, OutputError, PointerOutput};
use crate::screen::ScreenCapture;

pub const CLICK_COOLDOWN: Duration = Duration::from_millis(300);
pub const DOUBLE_CLICK_COOLDOWN: Duration = Duration::from_millis(500);
pub const SCREENSHOT_COOLDOWN: Duration = Duration::from_millis(1000);

/// Screenshot names are `my_screenshot_<n>.png` with `n` drawn from this range.
const SCREENSHOT_LABELS: std::ops::RangeInclusive<u32> = 1..=1000;

/// Side effect requested for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Move { x: i32, y: i32 },
    LeftClick,
    RightClick,
    DoubleClick,
    Screenshot,
}

impl PointerAction {
    pub fn cooldown(self) -> Option<Duration> {
        match self {
            PointerAction::Move { .. } => None,
            PointerAction::LeftClick | PointerAction::RightClick => Some(CLICK_COOLDOWN),
            PointerAction::DoubleClick => Some(DOUBLE_CLICK_COOLDOWN),
            PointerAction::Screenshot => Some(SCREENSHOT_COOLDOWN),
        }
    }
}

pub fn screenshot_path(dir: &Path, label: u32) -> PathBuf {
    dir.join(format!("my_screenshot_{}.png", label))
}

/// Sends actions to the pointer/capture backends and enforces the
/// post-action cooldown.
///
/// The cooldown is a deadline checked against the caller's clock, so no
/// call ever sleeps; while it is running `is_cooling_down` is true and
/// `dispatch` refuses everything.
pub struct ActionDispatcher<P, S> {
    pointer: P,
    capture: S,
    screenshot_dir: PathBuf,
    cooldown_until: Option<Instant>,
}

impl<P: PointerOutput, S: ScreenCapture> ActionDispatcher<P, S> {
    pub fn new(pointer: P, capture: S, screenshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            pointer,
            capture,
            screenshot_dir: screenshot_dir.into(),
            cooldown_until: None,
        }
    }

    pub fn is_cooling_down(&self, now: Instant) -> bool {
        self.cooldown_until.is_some_and(|until| now < until)
    }

    #[cfg(test)]
    pub fn cooldown_until(&self) -> Option<Instant> {
        self.cooldown_until
    }

    /// Returns `Ok(false)` when the action was dropped because of an active
    /// cooldown.
    pub fn dispatch(&mut self, action: PointerAction, now: Instant) -> Result<bool, OutputError> {
        if self.is_cooling_down(now) {
            debug!("En cooldown, se descarta {:?}", action);
            return Ok(false);
        }

        match action {
            PointerAction::Move { x, y } => self.pointer.move_to(x, y)?,
            PointerAction::LeftClick => {
                info!("🖱️  Clic izquierdo");
                self.click(MouseButton::Left)?
            }
            PointerAction::RightClick => {
                info!("🖱️  Clic derecho");
                self.click(MouseButton::Right)?
            }
            PointerAction::DoubleClick => {
                info!("🖱️  Doble clic");
                self.pointer.double_click()?
            }
            PointerAction::Screenshot => {
                let label = rand::thread_rng().gen_range(SCREENSHOT_LABELS);
                let path = screenshot_path(&self.screenshot_dir, label);
                info!("📸 Captura -> {}", path.display());
                self.capture.save_screenshot(&path)?
            }
        }

        if let Some(cooldown) = action.cooldown() {
            self.cooldown_until = Some(now + cooldown);
        }
        Ok(true)
    }

    fn click(&mut self, button: MouseButton) -> Result<(), OutputError> {
        self.pointer.press(button)?;
        self.pointer.release(button)
    }

    #[cfg(test)]
    pub fn pointer(&self) -> &P {
        &self.pointer
    }

    #[cfg(test)]
    pub fn capture(&self) -> &S {
        &self.capture
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        MoveTo(i32, i32),
        Press(MouseButton),
        Release(MouseButton),
        DoubleClick,
    }

    #[derive(Debug, Default)]
    pub struct RecordingPointer {
        pub calls: Vec<Call>,
        pub fail: bool,
    }

    impl PointerOutput for RecordingPointer {
        fn move_to(&mut self, x: i32, y: i32) -> Result<(), OutputError> {
            if self.fail {
                return Err(OutputError::NoMonitor);
            }
            self.calls.push(Call::MoveTo(x, y));
            Ok(())
        }

        fn press(&mut self, button: MouseButton) -> Result<(), OutputError> {
            if self.fail {
                return Err(OutputError::NoMonitor);
            }
            self.calls.push(Call::Press(button));
            Ok(())
        }

        fn release(&mut self, button: MouseButton) -> Result<(), OutputError> {
            self.calls.push(Call::Release(button));
            Ok(())
        }

        fn double_click(&mut self) -> Result<(), OutputError> {
            self.calls.push(Call::DoubleClick);
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    pub struct RecordingCapture {
        pub paths: Vec<PathBuf>,
    }

    impl ScreenCapture for RecordingCapture {
        fn save_screenshot(&mut self, path: &Path) -> Result<(), OutputError> {
            self.paths.push(path.to_path_buf());
            Ok(())
        }
    }
}
