use anyhow::Context;
use clap::Parser;
use generator::profile::build_session_frames;
use gui_bridge::bridge::{gui_bind_address, IngestBridge};
use log::warn;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::recording::{load_recording, save_recording};
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Squat rep-counting driver")]
struct Args {
    /// Load a workflow config (detector + generator settings) from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Replay a JSON landmark recording through the detector
    #[arg(long, conflicts_with = "synthetic")]
    recording: Option<PathBuf>,
    /// Generate and replay a synthetic squat session
    #[arg(long, default_value_t = false)]
    synthetic: bool,
    #[arg(long)]
    reps: Option<usize>,
    #[arg(long)]
    rep_duration_ms: Option<u64>,
    #[arg(long)]
    fps: Option<u32>,
    #[arg(long)]
    seed: Option<u64>,
    /// Override the tempo window a rep must finish within
    #[arg(long)]
    max_rep_duration_ms: Option<u64>,
    /// Compute knee angles with landmark depth
    #[arg(long, default_value_t = false)]
    spatial: bool,
    /// Write the synthetic frames out as a recording
    #[arg(long, requires = "synthetic")]
    dump_recording: Option<PathBuf>,
    /// Append a one-line run summary to this file
    #[arg(long)]
    report: Option<PathBuf>,
    /// Keep the ingest bridge alive for frames pushed by a pose model
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let base_config = if let Some(path) = args.config.as_ref() {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::default()
    };
    let mut workflow_config = base_config.with_overrides(args.max_rep_duration_ms, args.spatial)?;
    if let Some(reps) = args.reps {
        workflow_config.generator.reps = reps;
    }
    if let Some(rep_duration_ms) = args.rep_duration_ms {
        workflow_config.generator.rep_duration_ms = rep_duration_ms;
    }
    if let Some(fps) = args.fps {
        workflow_config.generator.fps = fps;
    }
    if let Some(seed) = args.seed {
        workflow_config.generator.seed = seed;
    }

    let runner = Runner::new(workflow_config.clone());

    let frames = if let Some(path) = args.recording.as_ref() {
        Some(load_recording(path)?)
    } else if args.synthetic {
        let frames = build_session_frames(&workflow_config.generator)?;
        if let Some(path) = args.dump_recording.as_ref() {
            save_recording(path, &frames)?;
        }
        Some(frames)
    } else {
        None
    };

    if let Some(frames) = frames {
        let result = runner.execute(&frames)?;
        for record in &result.events {
            println!(
                "{:>8} ms  {}",
                record.timestamp_ms,
                serde_json::to_string(&record.event)?
            );
        }
        println!(
            "Replay -> reps {}, frames {}, rejected {}, advisories {}",
            result.summary.rep_count,
            result.summary.frames_processed,
            result.summary.frames_rejected,
            result.advisories()
        );

        if let Some(report_path) = args.report.as_ref() {
            let report = format!(
                "reps={} frames={} rejected={} advisories={} max_rep_duration_ms={}\n",
                result.summary.rep_count,
                result.summary.frames_processed,
                result.summary.frames_rejected,
                result.advisories(),
                workflow_config.detector.max_rep_duration_ms
            );
            if let Some(parent) = report_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(report_path)
                .with_context(|| format!("opening report {}", report_path.display()))?;
            file.write_all(report.as_bytes())?;
        }
    } else if !args.serve {
        warn!("nothing to do: pass --recording, --synthetic or --serve");
    }

    if args.serve {
        let bridge = IngestBridge::new(runner.new_session()?);
        bridge.serve(gui_bind_address());
        bridge.publish_status("Ingest bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
