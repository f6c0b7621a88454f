/*
Hand-gesture pointer control.

Reads hand landmarks (21 normalized points per frame) from an external
hand-pose estimator and drives the mouse:
  - thumb folded      -> cursor follows the index fingertip
  - thumb extended    -> command mode: left/right click, double click, screenshot

The estimator writes one JSON object per line, e.g. piped on stdin:
     estimator | ./target/release/handmouse
or a recorded session:
     ./target/release/handmouse --input session.csv --format csv --dry-run

/dev/uinput must be writable:
     sg input -c './target/release/handmouse'
*/

use std::env;
use std::fs::File;
use std::io::{self, BufReader};

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{bounded, Sender};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use handmouse::config::{AppConfig, InputFormat};
use handmouse::csv_loader::{load_frames_from_csv, load_frames_from_reader};
use handmouse::dispatcher::ActionDispatcher;
use handmouse::hid::{HidOutput, LogOutput};
use handmouse::landmark_stream::JsonLinesSource;
use handmouse::pipeline::{run_frame_loop, GesturePipeline};
use handmouse::quit::spawn_quit_watcher;
use handmouse::screen::{NoCapture, PrimaryMonitor, ScreenGeometry, XcapCapture};
use handmouse::types::LandmarkSet;

const FRAME_QUEUE: usize = 100;

fn init_tracing(level: &str) -> Result<()> {
    let level: Level = level
        .parse()
        .map_err(|_| anyhow!("Nivel de log inválido '{}'", level))?;
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("No se pudo instalar el subscriber de tracing")?;
    Ok(())
}

/// Reads frames on a background thread so a slow estimator never blocks
/// the quit check. The first read error is forwarded and ends the stream.
fn spawn_frame_reader(config: &AppConfig, tx: Sender<Result<LandmarkSet>>) {
    let input = config.input.clone();
    let format = config.format;
    let from_stdin = config.reads_stdin();

    std::thread::spawn(move || match format {
        InputFormat::Csv => {
            let frames = if from_stdin {
                load_frames_from_reader(io::stdin().lock())
            } else {
                load_frames_from_csv(&input)
            };
            match frames {
                Ok(frames) => {
                    for frame in frames {
                        if tx.send(Ok(frame)).is_err() {
                            return;
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e));
                }
            }
        }
        InputFormat::Jsonl => {
            let reader: Box<dyn io::BufRead> = if from_stdin {
                Box::new(io::stdin().lock())
            } else {
                match File::open(&input) {
                    Ok(file) => Box::new(BufReader::new(file)),
                    Err(e) => {
                        let _ = tx.send(Err(anyhow!(e).context(format!("No se pudo abrir {:?}", input))));
                        return;
                    }
                }
            };
            for frame in JsonLinesSource::new(reader) {
                let failed = frame.is_err();
                if tx.send(frame.map_err(anyhow::Error::from)).is_err() || failed {
                    return;
                }
            }
        }
    });
}

fn main() -> Result<()> {
    let config = AppConfig::from_args(env::args().skip(1))?;
    init_tracing(&config.log_level)?;

    info!("🎯 Control del puntero por gestos de mano");

    let bounds = match config.screen_override()? {
        Some(bounds) => bounds,
        None => PrimaryMonitor
            .bounds()
            .context("No se pudo obtener el tamaño de pantalla, usa --screen ANCHOxALTO")?,
    };
    info!("🖥️  Pantalla: {}x{}", bounds.width, bounds.height);

    let (tx_frames, rx_frames) = bounded(FRAME_QUEUE);
    spawn_frame_reader(&config, tx_frames);

    // tx_quit lives until main returns, so rx_quit only fires on a real quit
    let (tx_quit, rx_quit) = bounded::<()>(1);
    if config.quit_key {
        spawn_quit_watcher(tx_quit.clone());
        info!("⌨️  Pulsa 'q' para salir");
    }

    if config.dry_run {
        info!("🔧 Modo simulación: las acciones solo se registran");
        let dispatcher = ActionDispatcher::new(LogOutput, NoCapture, config.screenshot_dir.clone());
        let mut pipeline = GesturePipeline::new(bounds, dispatcher);
        run_frame_loop(&mut pipeline, &rx_frames, &rx_quit)
    } else {
        let hid = HidOutput::new(&config.device_name, bounds).context("No se pudo crear el dispositivo uinput")?;
        info!("✅ HID inicializado (/dev/uinput)");
        let dispatcher = ActionDispatcher::new(hid, XcapCapture, config.screenshot_dir.clone());
        let mut pipeline = GesturePipeline::new(bounds, dispatcher);
        run_frame_loop(&mut pipeline, &rx_frames, &rx_quit)
    }
}
