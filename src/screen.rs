//! Display geometry and full-screen capture, backed by `xcap`.

use std::path::Path;

use tracing::{debug, info};
use xcap::Monitor;

use crate::hid::OutputError;
use crate::types::ScreenBounds;

/// Source of the screen size, asked once at start-up.
pub trait ScreenGeometry {
    fn bounds(&self) -> Result<ScreenBounds, OutputError>;
}

/// Saves a capture of the whole screen as an image file.
pub trait ScreenCapture {
    fn save_screenshot(&mut self, path: &Path) -> Result<(), OutputError>;
}

fn primary_monitor() -> Result<Monitor, OutputError> {
    let monitors = Monitor::all()?;
    let mut fallback = None;
    for monitor in monitors {
        if monitor.is_primary() {
            return Ok(monitor);
        }
        fallback.get_or_insert(monitor);
    }
    fallback.ok_or(OutputError::NoMonitor)
}

/// Primary monitor as reported by the display server.
#[derive(Debug, Default)]
pub struct PrimaryMonitor;

impl ScreenGeometry for PrimaryMonitor {
    fn bounds(&self) -> Result<ScreenBounds, OutputError> {
        let monitor = primary_monitor()?;
        let bounds = ScreenBounds::new(monitor.width(), monitor.height());
        debug!("Monitor '{}': {}x{}", monitor.name(), bounds.width, bounds.height);
        Ok(bounds)
    }
}

#[derive(Debug, Default)]
pub struct XcapCapture;

impl ScreenCapture for XcapCapture {
    fn save_screenshot(&mut self, path: &Path) -> Result<(), OutputError> {
        let image = primary_monitor()?.capture_image()?;
        image.save(path)?;
        info!("📸 Captura guardada en {}", path.display());
        Ok(())
    }
}

/// Capture that drops every request, for replays and dry runs.
#[derive(Debug, Default)]
pub struct NoCapture;

impl ScreenCapture for NoCapture {
    fn save_screenshot(&mut self, path: &Path) -> Result<(), OutputError> {
        info!("📸 (simulación) la captura se guardaría en {}", path.display());
        Ok(())
    }
}
