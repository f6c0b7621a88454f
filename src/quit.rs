use std::fs;
use std::time::Duration;

use crossbeam_channel::Sender;
use evdev::{Device, InputEventKind, Key};
use tracing::{info, warn};

fn find_keyboard() -> Option<Device> {
    let entries = fs::read_dir("/dev/input").ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        let is_event_node = path
            .file_name()
            .map(|name| name.to_string_lossy().starts_with("event"))
            .unwrap_or(false);
        if !is_event_node {
            continue;
        }

        let Ok(device) = Device::open(&path) else {
            continue;
        };
        let Some(name) = device.name() else {
            continue;
        };
        let name_lc = name.to_lowercase();
        if name_lc.contains("keyboard") || name_lc.contains("at translated") {
            info!("⌨️  Teclado encontrado: {} ({})", name, path.display());
            return Some(device);
        }
    }
    None
}

/// Watches the first keyboard under `/dev/input` and sends `()` once `q` is
/// pressed. Without a readable keyboard the run can only end with the input
/// stream.
pub fn spawn_quit_watcher(tx: Sender<()>) {
    std::thread::spawn(move || {
        let Some(mut device) = find_keyboard() else {
            warn!("⚠️  No hay teclado legible en /dev/input, salir con 'q' desactivado");
            return;
        };

        loop {
            let events = match device.fetch_events() {
                Ok(events) => events,
                Err(e) => {
                    warn!("⚠️  Error leyendo el teclado, salir con 'q' desactivado: {}", e);
                    return;
                }
            };
            for ev in events {
                if let InputEventKind::Key(key) = ev.kind() {
                    if key == Key::KEY_Q && ev.value() == 1 {
                        let _ = tx.send(());
                        return;
                    }
                }
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    });
}
