//! Juice Guide entry point
//!
//! On the web the page drives `juice_guide::platform::web::JuiceDemo`.
//! Natively this replays a demo headlessly and prints one JSON frame per line.

#[cfg(not(target_arch = "wasm32"))]
mod replay {
    use std::io::{BufWriter, Write};
    use std::path::PathBuf;

    use anyhow::Context;
    use clap::Parser;
    use glam::Vec2;

    use juice_guide::platform::init_logging;
    use juice_guide::{DemoDriver, DemoKind, QualityPreset, Settings};

    /// Replay a juice demo and dump its frames as JSON lines
    #[derive(Debug, Parser)]
    #[command(name = "juice-guide", version)]
    pub struct Args {
        /// Demo type (intro, squash, shake, particles, flash, persistence, audio,
        /// coyote, hitstop, buffer, ghost, text, lookahead, tilt, shockwave, ui, none)
        #[arg(short, long, default_value = "shake")]
        pub demo: String,

        /// RNG seed
        #[arg(short, long, default_value_t = 42)]
        pub seed: u64,

        /// Number of frames to simulate
        #[arg(short, long, default_value_t = 120)]
        pub frames: u32,

        /// Simulated display frame length (ms)
        #[arg(long, default_value_t = 1000.0 / 60.0)]
        pub frame_ms: f64,

        /// Click the demo every N frames (0 = once, on the first frame)
        #[arg(long, default_value_t = 0)]
        pub trigger_every: u32,

        /// Press jump every N frames (0 = never)
        #[arg(long, default_value_t = 0)]
        pub jump_every: u32,

        /// Click position in container percent, "x,y"
        #[arg(long, value_parser = parse_point)]
        pub at: Option<Vec2>,

        /// Turn juice on (intro demo)
        #[arg(long)]
        pub juice: bool,

        /// Settings JSON file
        #[arg(long)]
        pub settings: Option<PathBuf>,

        /// Override the quality preset (low, medium, high)
        #[arg(long, value_parser = parse_quality)]
        pub quality: Option<QualityPreset>,

        /// Pretty-print each frame
        #[arg(long)]
        pub pretty: bool,
    }

    fn parse_point(s: &str) -> Result<Vec2, String> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected x,y but got '{s}'"))?;
        let x: f32 = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
        let y: f32 = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
        Ok(Vec2::new(x, y))
    }

    fn parse_quality(s: &str) -> Result<QualityPreset, String> {
        QualityPreset::parse(s).ok_or_else(|| format!("unknown quality preset '{s}'"))
    }

    pub fn run(args: Args) -> anyhow::Result<()> {
        init_logging();

        let kind: DemoKind = args.demo.parse()?;
        let mut settings = match &args.settings {
            Some(path) => Settings::load_from(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::default(),
        };
        if let Some(quality) = args.quality {
            settings.quality = quality;
        }
        log::debug!("Quality preset {}", settings.quality.as_str());

        let mut driver = DemoDriver::with_settings(kind, args.seed, settings);
        if args.juice {
            driver.set_juice(true);
        }

        let stdout = std::io::stdout();
        let mut out = BufWriter::new(stdout.lock());

        for frame_index in 0..args.frames {
            let now_ms = f64::from(frame_index) * args.frame_ms;
            driver.advance(now_ms);

            let click = match args.trigger_every {
                0 => frame_index == 0,
                n => frame_index % n == 0,
            };
            if click {
                driver.click(args.at);
            }
            if args.jump_every > 0 && frame_index % args.jump_every == 0 {
                driver.jump();
            }

            let frame = driver.frame();
            if args.pretty {
                serde_json::to_writer_pretty(&mut out, &frame)?;
            } else {
                serde_json::to_writer(&mut out, &frame)?;
            }
            writeln!(out)?;
        }
        out.flush()?;

        log::info!(
            "Replayed {} frames of {} (seed {})",
            args.frames,
            driver.kind(),
            driver.seed()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    replay::run(replay::Args::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
