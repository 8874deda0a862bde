use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use drivescene_input::InputTracker;
use drivescene_render::DebugTextRenderer;
use drivescene_runtime::{DriveConfig, FrameReport, FrameScheduler};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "drivescene-cli", about = "CLI tool for drivescene operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the default tuning
    Info,
    /// Drive headlessly from a key script
    Drive {
        /// Comma-separated `<keys>:<frames>` segments, e.g. `w:50,wa:30,:20,2:1`
        #[arg(short, long)]
        script: String,
        /// Print frame reports as JSON lines
        #[arg(long)]
        json: bool,
        /// Print every Nth frame (the last frame is always printed)
        #[arg(short, long, default_value = "1")]
        every: u64,
        /// YAML drive config
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Load and validate a config file
    CheckConfig {
        /// Path to the YAML config
        path: PathBuf,
    },
}

/// Keys held for a run of frames.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    keys: String,
    frames: u64,
}

/// Parse `w:50,wa:30,:20`. Each character of `keys` is one key; empty keys coast.
fn parse_script(script: &str) -> anyhow::Result<Vec<Segment>> {
    let mut segments = Vec::new();
    for raw in script.split(',') {
        let raw = raw.trim();
        let Some((keys, frames)) = raw.rsplit_once(':') else {
            bail!("segment {raw:?} is missing `:<frames>`");
        };
        let frames: u64 = frames
            .trim()
            .parse()
            .with_context(|| format!("bad frame count in segment {raw:?}"))?;
        if frames == 0 {
            bail!("segment {raw:?} runs zero frames");
        }
        segments.push(Segment {
            keys: keys.trim().to_lowercase(),
            frames,
        });
    }
    Ok(segments)
}

/// Frames the whole script runs. Errors if the count does not fit in a `u64`.
fn total_frames(segments: &[Segment]) -> anyhow::Result<u64> {
    segments.iter().try_fold(0u64, |sum, seg| {
        sum.checked_add(seg.frames)
            .context("script frame count overflows u64")
    })
}

/// Reject keys the tracker would silently ignore.
fn check_keys(segments: &[Segment], input: &InputTracker) -> anyhow::Result<()> {
    for seg in segments {
        for key in seg.keys.chars() {
            if input.bindings().resolve(&key.to_string()).is_none() {
                bail!("key {key:?} is not bound");
            }
        }
    }
    Ok(())
}

/// Run every segment. `emit` sees each frame's report and debug text.
fn drive(
    scheduler: &mut FrameScheduler,
    segments: &[Segment],
    mut emit: impl FnMut(&FrameReport, &str) -> anyhow::Result<()>,
) -> anyhow::Result<u64> {
    let renderer = DebugTextRenderer::new();
    let mut total = 0;
    for seg in segments {
        let input = scheduler.input_mut();
        input.release_all();
        for key in seg.keys.chars() {
            input.key_down(&key.to_string());
        }

        let Some(end) = scheduler.frame().checked_add(seg.frames) else {
            bail!("frame counter would overflow after frame {}", scheduler.frame());
        };
        let mut failure = None;
        let ran = scheduler.run(&renderer, |report, text| {
            if let Err(e) = emit(report, text) {
                failure = Some(e);
                return false;
            }
            report.frame < end
        });
        if let Some(e) = failure {
            return Err(e);
        }
        total += ran;
    }
    Ok(total)
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<DriveConfig> {
    Ok(match path {
        Some(path) => DriveConfig::load(path)?,
        None => DriveConfig::default(),
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("drivescene-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("default config:");
            print!("{}", DriveConfig::default().to_yaml_string()?);
        }
        Commands::Drive {
            script,
            json,
            every,
            config,
        } => {
            let config = load_config(config.as_ref())?;
            let segments = parse_script(&script)?;
            let mut scheduler = FrameScheduler::from_config(&config)?;
            check_keys(&segments, scheduler.input())?;

            let last = total_frames(&segments)?;
            let every = every.max(1);
            tracing::info!(segments = segments.len(), frames = last, "starting scripted drive");

            let frames = drive(&mut scheduler, &segments, |report, text| {
                if report.frame % every != 0 && report.frame != last {
                    return Ok(());
                }
                if json {
                    println!("{}", serde_json::to_string(report)?);
                } else {
                    print!("{text}");
                }
                Ok(())
            })?;

            let r = scheduler.report();
            tracing::info!(
                frames,
                speed = r.speed,
                heading = r.heading,
                hash = %format!("{:#018x}", scheduler.vehicle().state_hash()),
                "drive finished"
            );
        }
        Commands::CheckConfig { path } => match DriveConfig::load(&path) {
            Ok(config) => {
                println!(
                    "{}: OK ({} extra bindings)",
                    path.display(),
                    config.bindings.len()
                );
            }
            Err(e) => {
                tracing::error!("{}: {e}", path.display());
                return Err(e.into());
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivescene_input::Control;

    #[test]
    fn parses_segments() {
        let segs = parse_script("w:50, WA:30,:20,2:1").unwrap();
        assert_eq!(
            segs,
            vec![
                Segment { keys: "w".into(), frames: 50 },
                Segment { keys: "wa".into(), frames: 30 },
                Segment { keys: "".into(), frames: 20 },
                Segment { keys: "2".into(), frames: 1 },
            ]
        );
    }

    #[test]
    fn rejects_malformed_segments() {
        assert!(parse_script("w").is_err());
        assert!(parse_script("w:x").is_err());
        assert!(parse_script("w:0").is_err());
        assert!(parse_script("w:5,").is_err());
    }

    #[test]
    fn huge_scripts_do_not_overflow() {
        let segs = parse_script("w:18446744073709551615,w:1").unwrap();
        assert!(total_frames(&segs).is_err());
        assert_eq!(total_frames(&parse_script("w:50,:10").unwrap()).unwrap(), 60);

        let mut s = FrameScheduler::default();
        let segs = parse_script("w:1,w:18446744073709551615").unwrap();
        assert!(drive(&mut s, &segs, |_, _| Ok(())).is_err());
        assert_eq!(s.frame(), 1);
    }

    #[test]
    fn unbound_keys_are_rejected() {
        let segs = parse_script("wq:5").unwrap();
        assert!(check_keys(&segs, &InputTracker::default()).is_err());
        let segs = parse_script("wasd123:5").unwrap();
        assert!(check_keys(&segs, &InputTracker::default()).is_ok());
    }

    #[test]
    fn drive_runs_each_segment() {
        let mut s = FrameScheduler::default();
        let segs = parse_script("w:50,:10").unwrap();
        let mut seen = Vec::new();
        let frames = drive(&mut s, &segs, |r, _| {
            seen.push(r.frame);
            Ok(())
        })
        .unwrap();
        assert_eq!(frames, 60);
        assert_eq!(seen, (1..=60).collect::<Vec<_>>());
        assert!(!s.input().is_pressed(Control::Forward));
        let at_50 = 0.2 * (1.0 - 0.95_f32.powi(50));
        let coasted = at_50 * 0.97_f32.powi(10);
        assert!((s.report().speed - coasted).abs() < 1e-4);
    }

    #[test]
    fn camera_key_persists_across_segments() {
        let mut s = FrameScheduler::default();
        let segs = parse_script("3:1,w:5").unwrap();
        drive(&mut s, &segs, |_, _| Ok(())).unwrap();
        assert_eq!(s.report().camera_mode.label(), "side");
    }

    #[test]
    fn emit_error_stops_the_drive() {
        let mut s = FrameScheduler::default();
        let segs = parse_script("w:50").unwrap();
        let res = drive(&mut s, &segs, |r, _| {
            if r.frame == 3 {
                bail!("stop");
            }
            Ok(())
        });
        assert!(res.is_err());
        assert_eq!(s.frame(), 3);
    }
}
