//! hl7pump - synthetic HL7 test-message transmitter
//!
//! Generates HL7 messages from segment templates (or replays a corpus of
//! message files), emits them at a controlled rate, optionally persists
//! each one, and stops on a count or time budget.

use clap::Parser;
use hl7pump::{
    builtin_patients, parse_stop_after, LogRenderer, OutputMode, RunConfig, Transmitter,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Synthetic HL7 test-message transmitter.
#[derive(Parser, Debug)]
#[command(name = "hl7pump")]
#[command(version, about, long_about = None)]
struct Args {
    /// MSH segment template (may contain {TIMESTAMP})
    #[arg(long)]
    msh: Option<String>,

    /// PID segment template
    #[arg(long)]
    pid: Option<String>,

    /// PV1 segment template
    #[arg(long)]
    pv1: Option<String>,

    /// Messages per second (0.1 to 10.0)
    #[arg(short, long)]
    rate: Option<f64>,

    /// Stop after this many messages
    #[arg(long)]
    stop_count: Option<u64>,

    /// Stop after a duration: off, 10s, 30s, 1m, 5m, or literal seconds
    #[arg(long)]
    stop_after: Option<String>,

    /// Directory to persist each emitted message into
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Replay these message files instead of generating (uniform random
    /// selection with replacement)
    #[arg(long, num_args = 1..)]
    corpus: Vec<PathBuf>,

    /// Substitute a builtin test patient into the templates
    #[arg(long)]
    patient: Option<String>,

    /// List the builtin test patients and exit
    #[arg(long)]
    list_patients: bool,

    /// Load a JSON run configuration (CLI flags override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit the transmission log as NDJSON instead of colored text
    #[arg(long)]
    ndjson: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug)
    #[arg(short = 'd', long)]
    debug: bool,

    /// Enable verbose logging (equivalent to RUST_LOG=trace)
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Args {
    /// Fold CLI flags over the loaded (or default) configuration.
    fn overlay(&self, mut config: RunConfig) -> RunConfig {
        if let Some(msh) = &self.msh {
            config.templates.msh = msh.clone();
        }
        if let Some(pid) = &self.pid {
            config.templates.pid = pid.clone();
        }
        if let Some(pv1) = &self.pv1 {
            config.templates.pv1 = pv1.clone();
        }
        if let Some(rate) = self.rate {
            config.rate_hz = rate;
        }
        if let Some(count) = self.stop_count {
            config.stop.count = Some(count);
        }
        if let Some(after) = &self.stop_after {
            config.stop.seconds = parse_stop_after(after);
        }
        if let Some(dir) = &self.out_dir {
            config.out_dir = Some(dir.clone());
        }
        if !self.corpus.is_empty() {
            config.corpus = self.corpus.clone();
        }
        if let Some(patient) = &self.patient {
            config.patient = Some(patient.clone());
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(args))
}

async fn run(args: Args) -> anyhow::Result<()> {
    // Determine log level from args or env
    let default_filter = if args.verbose {
        "trace"
    } else if args.debug {
        "debug"
    } else {
        "warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if args.list_patients {
        for patient in builtin_patients() {
            println!(
                "{}  id={} dob={} gender={}",
                patient.name, patient.patient_id, patient.dob, patient.gender
            );
        }
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::default(),
    };
    let config = args.overlay(config);
    let plan = config.plan()?;

    let engine = Transmitter::new();
    engine.set_rate(config.rate_hz)?;

    let mode = if args.ndjson {
        OutputMode::Ndjson
    } else {
        OutputMode::Pretty
    };
    let renderer = tokio::spawn(LogRenderer::new(mode).run_loop(engine.subscribe()));

    engine.start(plan)?;

    tokio::select! {
        _ = engine.wait_until_idle() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted; stopping transmission");
            engine.stop();
            engine.wait_until_idle().await;
        }
    }

    // Closing the bus lets the renderer drain buffered events and exit.
    drop(engine);
    let _ = renderer.await;
    Ok(())
}
