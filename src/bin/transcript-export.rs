//! Render the most recent messages of a transcript to a PNG without a window.
//!
//! Usage: transcript-export <file.json> --output out.png [--count N] [--self-id ID] [--query Q]

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use transcript_viewer::export::{
    check_render_backend, export_count_options, spawn_export, ExportEvent, ExportJob,
    ExportSnapshot,
};
use transcript_viewer::{Transcript, ViewState, ViewerConfig};

#[derive(Debug, Parser)]
#[command(version, about = "Export recent transcript messages as a PNG image")]
struct Args {
    /// Exported chat (result.json)
    file: PathBuf,

    /// Where to write the PNG
    #[arg(short, long)]
    output: PathBuf,

    /// Most recent messages to include
    #[arg(short, long)]
    count: Option<usize>,

    /// Sender id substring that marks your own messages
    #[arg(long)]
    self_id: Option<String>,

    /// Only export messages matching this search
    #[arg(short, long)]
    query: Option<String>,

    /// Config file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    transcript_viewer::init_logging();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ViewerConfig::load_from(path),
        None => ViewerConfig::load(),
    }
    .context("Failed to load config")?;
    if args.self_id.is_some() {
        config.self_id = args.self_id;
    }

    let transcript = Transcript::load(&args.file, config.self_id())
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let mut view = ViewState::new(config.page_size).load(transcript);
    if let Some(query) = &args.query {
        view = view.with_query(query);
    }

    let total = view.displayed().len();
    if total == 0 {
        bail!("No messages to export");
    }

    let mut options = config.export_options();
    match args.count {
        Some(count) => options.max_messages = count,
        None => log::info!(
            "No --count given, using {} (common choices: {:?})",
            options.max_messages,
            export_count_options(total)
        ),
    }

    check_render_backend(config.font_path.as_deref())
        .context("Cannot render without a font")?;

    let job = ExportJob {
        snapshot: ExportSnapshot::from_view(&view, options.max_messages),
        options,
        output: args.output,
        font_path: config.font_path.clone(),
    };
    let mut handle = spawn_export(job, || {}).context("Failed to start export")?;

    let mut result = None;
    while let Some(event) = handle.wait_event() {
        match event {
            ExportEvent::Progress(progress) => {
                eprint!(
                    "\rRendering {}/{} ({}%)",
                    progress.done,
                    progress.total,
                    progress.percent()
                );
                let _ = std::io::stderr().flush();
            }
            ExportEvent::Finished(finished) => {
                eprintln!();
                result = Some(finished);
                break;
            }
        }
    }
    handle.join();

    let summary = match result {
        Some(finished) => finished.context("Export failed")?,
        None => bail!("Export worker exited without a result"),
    };
    eprintln!(
        "Saved {} ({}x{}, {} bytes)",
        summary.path.display(),
        summary.width,
        summary.height,
        summary.bytes
    );
    Ok(())
}
