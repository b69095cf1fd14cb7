use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use entitas_scene::{Canvas, SceneSession, SceneTuning, Stage};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "entitas-scene", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the stages with their layout.
    Stages,
    /// Run a session at a fixed frame rate and print what happens.
    Simulate(SimulateArgs),
    /// Simulate up to a point in time and write a preview PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct SessionArgs {
    /// Stage id (canonical or legacy). Unknown ids fall back to the empty stage.
    #[arg(long)]
    stage: String,

    /// Frames per second of the simulated host loop.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,

    /// Tuning overrides (JSON). Missing fields keep their defaults.
    #[arg(long)]
    tuning: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Simulated duration in seconds.
    #[arg(long, default_value_t = 5.0)]
    seconds: f64,

    /// Print one JSON snapshot per frame instead of waypoint events.
    #[arg(long)]
    snapshots: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Session time of the frame, in seconds.
    #[arg(long)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 640)]
    width: u32,

    #[arg(long, default_value_t = 320)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Stages => cmd_stages(),
        Command::Simulate(args) => cmd_simulate(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn load_tuning(path: Option<&Path>) -> anyhow::Result<SceneTuning> {
    match path {
        Some(p) => SceneTuning::from_path(p)
            .with_context(|| format!("load tuning '{}'", p.display())),
        None => Ok(SceneTuning::default()),
    }
}

fn open_session(args: &SessionArgs) -> anyhow::Result<SceneSession> {
    let tuning = load_tuning(args.tuning.as_deref())?;
    let stage = Stage::from_name_lossy(&args.stage);
    SceneSession::with_stage(tuning, stage)
        .with_context(|| format!("start session on stage '{stage}'"))
}

/// Upper bound on simulated frames per invocation (about 46 hours at 60 fps).
const MAX_FRAMES: u64 = 10_000_000;

fn frame_count(seconds: f64, fps: u32) -> anyhow::Result<u64> {
    if !seconds.is_finite() || seconds < 0.0 {
        anyhow::bail!("duration must be a finite, non-negative number of seconds (got {seconds})");
    }
    let frames = (seconds * f64::from(fps)).round();
    if frames > MAX_FRAMES as f64 {
        anyhow::bail!(
            "{seconds} s at {fps} fps is {frames} frames; at most {MAX_FRAMES} can be simulated"
        );
    }
    Ok(frames as u64)
}

fn cmd_stages() -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    for stage in Stage::ALL {
        let config = entitas_scene::select(stage);
        let path = match &config.path {
            None => "none".to_string(),
            Some(p) if p.chained => format!("chain({})", p.segment_count()),
            Some(_) => "segment".to_string(),
        };
        writeln!(
            out,
            "{:<10} {:<12} nodes={} path={}",
            stage.id(),
            stage.term().unwrap_or("-"),
            config.nodes.len(),
            path
        )?;
    }
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let mut session = open_session(&args.session)?;
    let frames = frame_count(args.seconds, args.session.fps)?;
    let delta = 1.0 / f64::from(args.session.fps);

    let mut out = std::io::stdout().lock();
    let mut events = 0usize;
    for _ in 0..frames {
        let snap = session.advance(delta);
        events += snap.waypoints.len();
        if args.snapshots {
            let line = snap.to_json_line().context("serialize snapshot")?;
            writeln!(out, "{line}")?;
        } else {
            for w in &snap.waypoints {
                writeln!(out, "t={:.3} waypoint={w}", snap.elapsed)?;
            }
        }
    }
    session.teardown();

    eprintln!(
        "stage={} frames={frames} waypoints={events} hits={:?}",
        session.stage(),
        session.hit_counts()
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let canvas = Canvas::new(args.width, args.height)?;
    let mut session = open_session(&args.session)?;
    let frames = frame_count(args.time, args.session.fps)?;
    let delta = 1.0 / f64::from(args.session.fps);

    for _ in 0..frames {
        session.advance(delta);
    }
    let img = entitas_scene::render_preview(&session.snapshot(), canvas);
    entitas_scene::write_png(&img, &args.out)
        .with_context(|| format!("write preview '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
