use std::env;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use handmouse::csv_loader::load_frames_from_csv;
use handmouse::dispatcher::ActionDispatcher;
use handmouse::hid::LogOutput;
use handmouse::pipeline::{FrameOutcome, GesturePipeline};
use handmouse::screen::NoCapture;
use handmouse::types::ScreenBounds;

/// Recorded sessions are replayed as if captured at this rate.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

const USAGE: &str = "Uso: replay_csv [--angles] [--screen ANCHOxALTO] <sesion.csv>...";

struct ReplayOptions {
    dump_angles: bool,
    screen: ScreenBounds,
}

fn parse_args() -> Result<(Vec<PathBuf>, ReplayOptions)> {
    let mut dump_angles = false;
    let mut screen = ScreenBounds::new(1920, 1080);
    let mut csv_paths = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--angles" => dump_angles = true,
            "--screen" => {
                let raw = args.next().ok_or_else(|| anyhow!("--screen necesita un valor\n{}", USAGE))?;
                screen = ScreenBounds::parse(&raw)
                    .ok_or_else(|| anyhow!("Tamaño de pantalla inválido '{}'", raw))?;
            }
            flag if flag.starts_with("--") => bail!("Flag desconocido '{}'\n{}", flag, USAGE),
            _ => csv_paths.push(PathBuf::from(arg)),
        }
    }

    if csv_paths.is_empty() {
        bail!("Se necesita al menos un archivo CSV\n{}", USAGE);
    }
    Ok((csv_paths, ReplayOptions { dump_angles, screen }))
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let (csv_paths, opts) = parse_args()?;

    let dispatcher = ActionDispatcher::new(LogOutput, NoCapture, ".");
    let mut pipeline = GesturePipeline::new(opts.screen, dispatcher);

    // Synthetic clock so cooldowns behave the same on every replay
    let mut now = Instant::now();

    for csv_path in &csv_paths {
        println!("🎞️  Reproduciendo {:?}", csv_path);
        let frames = load_frames_from_csv(csv_path)?;
        pipeline.reset();

        for (idx, landmarks) in frames.iter().enumerate() {
            let outcome = pipeline.process_frame(landmarks, now)?;
            now += FRAME_INTERVAL;

            match outcome {
                FrameOutcome::CoolingDown => println!("  {:>5}: (cooldown)", idx),
                FrameOutcome::NoHand => println!("  {:>5}: sin mano", idx),
                FrameOutcome::Classified {
                    label,
                    angles,
                    action,
                } => {
                    let action = action.map(|a| format!("{:?}", a)).unwrap_or_else(|| "-".to_string());
                    if opts.dump_angles {
                        println!(
                            "  {:>5}: {:<13} {:<28} thumb={:>6.1} index={:>6.1} middle={:>6.1} ring={:>6.1}",
                            idx, label, action, angles.thumb, angles.index, angles.middle, angles.ring
                        );
                    } else {
                        println!("  {:>5}: {:<13} {}", idx, label, action);
                    }
                }
            }
        }
    }

    Ok(())
}
