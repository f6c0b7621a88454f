use std::time::Duration;
use thiserror::Error;
use tracing::info;
use uinput::device::Device;
use uinput::event::absolute;
use uinput::event::controller;

use crate::types::ScreenBounds;

/// Gap between the two clicks of a double click and between press/release.
const CLICK_GAP: Duration = Duration::from_millis(10);

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("uinput error: {0}")]
    Uinput(#[from] uinput::Error),

    #[error("Screen capture error: {0}")]
    Capture(#[from] xcap::XCapError),

    #[error("Image error: {0}")]
    Image(#[from] xcap::image::ImageError),

    #[error("No monitor available")]
    NoMonitor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

impl MouseButton {
    fn to_uinput(self) -> controller::Controller {
        match self {
            MouseButton::Left => controller::Controller::Mouse(controller::Mouse::Left),
            MouseButton::Right => controller::Controller::Mouse(controller::Mouse::Right),
        }
    }
}

/// Pointer injection primitives the dispatcher drives.
pub trait PointerOutput {
    /// Absolute move, in screen pixels.
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), OutputError>;
    fn press(&mut self, button: MouseButton) -> Result<(), OutputError>;
    fn release(&mut self, button: MouseButton) -> Result<(), OutputError>;
    fn double_click(&mut self) -> Result<(), OutputError>;
}

/// Virtual absolute pointer on `/dev/uinput`. The axis ranges match the
/// screen so `move_to` takes pixel coordinates directly.
pub struct HidOutput {
    dev: Device,
    bounds: ScreenBounds,
}

impl HidOutput {
    pub fn new(name: &str, bounds: ScreenBounds) -> Result<Self, OutputError> {
        let (max_x, max_y) = bounds.clamp(i32::MAX, i32::MAX);

        let dev = uinput::default()?
            .name(name)?
            .event(uinput::event::Controller::Mouse(controller::Mouse::Left))?
            .event(uinput::event::Controller::Mouse(controller::Mouse::Right))?
            .event(uinput::event::Absolute::Position(absolute::Position::X))?
            .min(0)
            .max(max_x)
            .event(uinput::event::Absolute::Position(absolute::Position::Y))?
            .min(0)
            .max(max_y)
            .create()?;

        Ok(HidOutput { dev, bounds })
    }

    fn sync(&mut self) -> Result<(), uinput::Error> {
        self.dev.synchronize()
    }

    fn click(&mut self, button: MouseButton) -> Result<(), OutputError> {
        self.press(button)?;
        std::thread::sleep(CLICK_GAP);
        self.release(button)
    }
}

impl PointerOutput for HidOutput {
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), OutputError> {
        // Axes only span the screen
        let (x, y) = self.bounds.clamp(x, y);
        self.dev.send(absolute::Position::X, x)?;
        self.dev.send(absolute::Position::Y, y)?;
        Ok(self.sync()?)
    }

    fn press(&mut self, button: MouseButton) -> Result<(), OutputError> {
        self.dev.press(&button.to_uinput())?;
        Ok(self.sync()?)
    }

    fn release(&mut self, button: MouseButton) -> Result<(), OutputError> {
        self.dev.release(&button.to_uinput())?;
        Ok(self.sync()?)
    }

    fn double_click(&mut self) -> Result<(), OutputError> {
        self.click(MouseButton::Left)?;
        std::thread::sleep(CLICK_GAP);
        self.click(MouseButton::Left)
    }
}

/// Dry-run pointer: logs what would have been injected.
#[derive(Debug, Default)]
pub struct LogOutput;

impl PointerOutput for LogOutput {
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), OutputError> {
        info!("🖱️  move_to({}, {})", x, y);
        Ok(())
    }

    fn press(&mut self, button: MouseButton) -> Result<(), OutputError> {
        info!("🖱️  press({:?})", button);
        Ok(())
    }

    fn release(&mut self, button: MouseButton) -> Result<(), OutputError> {
        info!("🖱️  release({:?})", button);
        Ok(())
    }

    fn double_click(&mut self) -> Result<(), OutputError> {
        info!("🖱️  double_click()");
        Ok(())
    }
}
