use std::path::{Path, PathBuf};

use anyhow::Context as _;
use caption_core::formats::{parse_srt, write_srt};
use caption_core::{
    format_srt_time, parse_time_to_seconds, resolve_styling, PartialStylingDescriptor,
};
use caption_overlay::{
    compose_overlay, CaptionSnapshot, ManualScheduler, MediaEvent, OutlineCache, OutputFormat,
    OverlayConfig, PlaybackState, PreviewSession, ScrubTimeline, SimulatedMedia, SnapshotStore,
    ViewportSize,
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "caption-overlay", version, about = "Preview burned-in captions over a video")]
struct Cli {
    /// Overlay configuration JSON.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level regardless of RUST_LOG.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose the overlay at one instant and print it as JSON.
    Frame(FrameArgs),
    /// Play the captions through a simulated media element.
    Simulate(SimulateArgs),
    /// Print the scrub bar layout.
    Timeline(TimelineArgs),
    /// Write the caption list as SubRip.
    ExportSrt(ExportArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Snapshot JSON or `.srt` file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Partial styling JSON applied over the input.
    #[arg(long)]
    style: Option<PathBuf>,

    /// Output format, `9:16` or `16:9`.
    #[arg(long)]
    format: Option<OutputFormat>,
}

#[derive(Args, Debug)]
struct ViewportArgs {
    /// Viewport width in pixels; 0 uses the configured fallback.
    #[arg(long, default_value_t = 0.0)]
    width: f32,

    /// Viewport height in pixels; 0 uses the configured fallback.
    #[arg(long, default_value_t = 0.0)]
    height: f32,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    viewport: ViewportArgs,

    /// Playhead, in seconds or `M:SS` / `H:MM:SS,mmm` form.
    #[arg(long, default_value = "0")]
    time: String,

    /// Compose as if the media were paused.
    #[arg(long, default_value_t = false)]
    paused: bool,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    viewport: ViewportArgs,

    /// Media duration in seconds; defaults to one second past the last caption.
    #[arg(long)]
    duration: Option<f64>,

    /// Display refresh rate driving the frame scheduler.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,
}

#[derive(Args, Debug)]
struct TimelineArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Media duration in seconds; defaults to the end of the last caption.
    #[arg(long)]
    duration: Option<f64>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => {
            let json = read(path)?;
            OverlayConfig::from_json(&json)
                .with_context(|| format!("invalid config '{}'", path.display()))?
        }
        None => OverlayConfig::default(),
    };

    match cli.cmd {
        Command::Frame(args) => cmd_frame(&args, &config),
        Command::Simulate(args) => cmd_simulate(&args, config),
        Command::Timeline(args) => cmd_timeline(&args),
        Command::ExportSrt(args) => cmd_export_srt(&args),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_frame(args: &FrameArgs, config: &OverlayConfig) -> anyhow::Result<()> {
    let snapshot = load_snapshot(&args.input)?;
    let playback = PlaybackState {
        current_time: parse_time_to_seconds(&args.time),
        is_playing: !args.paused,
    };
    let mut outlines =
        OutlineCache::with_params(config.outline_params(), config.outline_cache_capacity);
    let frame = compose_overlay(
        &snapshot,
        playback,
        ViewportSize::new(args.viewport.width, args.viewport.height),
        config,
        &mut outlines,
    );
    println!("{}", serde_json::to_string_pretty(&frame)?);
    Ok(())
}

fn cmd_simulate(args: &SimulateArgs, config: OverlayConfig) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.fps.is_finite() && args.fps > 0.0,
        "fps must be positive, got {}",
        args.fps
    );
    let snapshot = load_snapshot(&args.input)?;
    let duration = args.duration.unwrap_or_else(|| {
        snapshot
            .entries
            .iter()
            .map(caption_core::CaptionEntry::end_seconds)
            .fold(0.0, f64::max)
            + 1.0
    });
    let viewport = ViewportSize::new(args.viewport.width, args.viewport.height);

    for change in simulate(snapshot, config, viewport, duration, args.fps)? {
        match change.caption {
            Some((id, text)) => println!("{}  #{id} {text}", format_srt_time(change.time)),
            None => println!("{}  -", format_srt_time(change.time)),
        }
    }
    Ok(())
}

fn cmd_timeline(args: &TimelineArgs) -> anyhow::Result<()> {
    let snapshot = load_snapshot(&args.input)?;
    let timeline = ScrubTimeline::build(&snapshot.entries, args.duration);
    println!("total {:.3}s", timeline.total_duration);
    for segment in &timeline.segments {
        println!(
            "{:>4} {:>8} left {:6.2}% width {:6.2}%",
            segment.index, segment.label, segment.left_percent, segment.width_percent
        );
    }
    Ok(())
}

fn cmd_export_srt(args: &ExportArgs) -> anyhow::Result<()> {
    let snapshot = load_snapshot(&args.input)?;
    let srt = write_srt(&snapshot.entries);
    match &args.out {
        Some(path) => std::fs::write(path, srt)
            .with_context(|| format!("write srt '{}'", path.display()))?,
        None => print!("{srt}"),
    }
    Ok(())
}

/// Caption shown from `time` on
#[derive(Debug, Clone, PartialEq)]
struct CaptionChange {
    time: f64,
    caption: Option<(i64, String)>,
}

/// Play `snapshot` from the start and record every change of displayed caption
fn simulate(
    snapshot: CaptionSnapshot,
    config: OverlayConfig,
    viewport: ViewportSize,
    duration: f64,
    fps: f64,
) -> anyhow::Result<Vec<CaptionChange>> {
    let store = SnapshotStore::new(snapshot);
    let mut session = PreviewSession::new(store, ManualScheduler::new(), config)?;
    session.resize(viewport);

    let mut media = SimulatedMedia::new(duration);
    session.handle_media_event(MediaEvent::LoadedMetadata, Some(&media));
    media.play();
    session.handle_media_event(MediaEvent::Play, Some(&media));

    let mut changes = Vec::new();
    let mut shown = None;
    loop {
        let ended = media.advance(1.0 / fps);
        let due = session.clock_mut().scheduler_mut().take_due();
        if due.is_empty() {
            break;
        }
        for token in due {
            session.on_frame(token, Some(&media));
        }
        if ended {
            session.handle_media_event(MediaEvent::Ended, Some(&media));
        }

        let playback = session.playback();
        let caption = session
            .frame()
            .caption
            .as_ref()
            .map(|layer| (layer.entry_id, layer.text()));
        if caption != shown {
            changes.push(CaptionChange {
                time: playback.current_time,
                caption: caption.clone(),
            });
            shown = caption;
        }
    }

    tracing::debug!(
        stats = ?session.stats(),
        outlines = ?session.outline_stats(),
        "simulation finished"
    );
    Ok(changes)
}

fn load_snapshot(input: &InputArgs) -> anyhow::Result<CaptionSnapshot> {
    let contents = read(&input.in_path)?;
    let mut snapshot = parse_input(&contents, is_srt(&input.in_path))
        .with_context(|| format!("parse '{}'", input.in_path.display()))?;

    if let Some(path) = &input.style {
        let partial: PartialStylingDescriptor = serde_json::from_str(&read(path)?)
            .with_context(|| format!("parse style '{}'", path.display()))?;
        snapshot.styling = resolve_styling(&partial);
    }
    if let Some(format) = input.format {
        snapshot.format = format;
    }
    Ok(snapshot)
}

fn parse_input(contents: &str, srt: bool) -> anyhow::Result<CaptionSnapshot> {
    if srt {
        let document = parse_srt(contents);
        if document.has_issues() {
            tracing::warn!(skipped = document.issues.len(), "some SRT blocks were skipped");
        }
        return Ok(CaptionSnapshot {
            entries: document.entries,
            ..CaptionSnapshot::default()
        });
    }
    Ok(CaptionSnapshot::from_json(contents)?)
}

fn is_srt(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("srt"))
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SRT: &str = "1\n00:00:01,000 --> 00:00:02,000\nfirst\n\n\
                       2\n00:00:03,000 --> 00:00:04,000\nsecond\n";

    #[test]
    fn srt_extension_is_case_insensitive() {
        assert!(is_srt(Path::new("a/b.SRT")));
        assert!(!is_srt(Path::new("snapshot.json")));
        assert!(!is_srt(Path::new("srt")));
    }

    #[test]
    fn json_and_srt_inputs_load() {
        let from_srt = parse_input(SRT, true).unwrap();
        assert_eq!(from_srt.entries.len(), 2);

        let from_json = parse_input(
            r#"{"entries": [{"id": 7, "start": 0, "end": "0:02", "text": "x"}], "format": "16:9"}"#,
            false,
        )
        .unwrap();
        assert_eq!(from_json.entries[0].id, 7);
        assert_eq!(from_json.format, OutputFormat::Landscape);

        assert!(parse_input("not json", false).is_err());
    }

    #[test]
    fn simulation_reports_each_caption_once() {
        let snapshot = parse_input(SRT, true).unwrap();
        let changes = simulate(
            snapshot,
            OverlayConfig::default(),
            ViewportSize::new(360.0, 640.0),
            5.0,
            10.0,
        )
        .unwrap();

        let shown: Vec<_> = changes
            .iter()
            .map(|change| change.caption.as_ref().map(|(id, _)| *id))
            .collect();
        assert_eq!(shown, [Some(1), None, Some(2), None, Some(1)]);
        assert!((changes[0].time - 1.0).abs() < 0.11);
    }
}
