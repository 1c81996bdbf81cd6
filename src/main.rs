//! violin-posture - Real-time violin posture monitor
//!
//! Reads pose landmarks recorded (or streamed) by an external pose estimator,
//! fuses them with scroll-mount telemetry, and reports one feedback message
//! per frame.
//!
//! # Usage
//!
//! ```bash
//! # Replay a recorded session with simulated accessory reports
//! ./violin-posture --poses demos/session.jsonl --telemetry simulate --seed 7
//!
//! # Live: pose estimator on stdin, verdicts as JSON lines for an overlay
//! pose-estimator --jsonl | ./violin-posture --poses - --json
//! ```
//!
//! # Environment Variables
//!
//! - `POSTURE_CONFIG`: Path to a posture_config.toml
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

use violin_posture::acquisition::{LineTelemetrySource, SimulatedTelemetry};
use violin_posture::config::{self, defaults, MonitorConfig};
use violin_posture::pipeline::{
    spawn_telemetry, FusionLoop, JsonRenderer, JsonlPoseSource, LogRenderer, PoseSource, Renderer,
    TelemetryLink, TelemetryStore,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TelemetryMode {
    /// No accessory; overlay keeps its initial values
    #[value(name = "none")]
    Off,
    /// Newline-delimited accessory tokens on stdin (from a BLE bridge)
    Stdin,
    /// Seedable simulated accessory
    Simulate,
}

#[derive(Parser, Debug)]
#[command(name = "violin-posture")]
#[command(about = "Real-time violin posture monitor")]
#[command(version)]
struct CliArgs {
    /// Path to a posture_config.toml (errors are fatal, unlike the
    /// POSTURE_CONFIG / ./posture_config.toml fallbacks)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON-lines pose recording, one sample (or null) per frame; "-" reads stdin
    #[arg(long, value_name = "PATH|-", default_value = "-")]
    poses: String,

    /// Delay between replayed frames (0 = as fast as possible)
    #[arg(long, default_value_t = defaults::REPLAY_FRAME_INTERVAL_MS)]
    frame_interval_ms: u64,

    /// Where accessory telemetry comes from
    #[arg(long, value_enum, default_value = "none")]
    telemetry: TelemetryMode,

    /// Seed for the simulated accessory (random if omitted)
    #[arg(long, env = "POSTURE_SIM_SEED")]
    seed: Option<u64>,

    /// Emit one JSON verdict per frame on stdout instead of log lines
    #[arg(long)]
    json: bool,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,
}

// ============================================================================
// Startup
// ============================================================================

fn load_config(path: Option<&PathBuf>) -> Result<MonitorConfig> {
    match path {
        Some(p) => {
            let config = MonitorConfig::load_from_file(p)
                .with_context(|| format!("Failed to load config {}", p.display()))?;
            info!("Loaded monitor config from {}", p.display());
            Ok(config)
        }
        None => Ok(MonitorConfig::load()),
    }
}

async fn start_telemetry(
    mode: TelemetryMode,
    seed: Option<u64>,
    store: &TelemetryStore,
    cancel_token: &CancellationToken,
) -> TelemetryLink {
    let telemetry = &config::get().telemetry;

    match mode {
        TelemetryMode::Off => {
            info!("📡 Telemetry: disabled (vision-only)");
            TelemetryLink::Unavailable("telemetry disabled".to_string())
        }
        TelemetryMode::Stdin => {
            info!(
                "📡 Telemetry: stdin bridge for {} (characteristic {})",
                telemetry.device_address, telemetry.characteristic_uuid
            );
            spawn_telemetry(LineTelemetrySource::stdin(), store.clone(), cancel_token.clone()).await
        }
        TelemetryMode::Simulate => {
            let interval = Duration::from_millis(telemetry.simulator_interval_ms);
            info!(
                "📡 Telemetry: simulated accessory every {}ms (seed {})",
                interval.as_millis(),
                seed.map_or_else(|| "random".to_string(), |s| s.to_string())
            );
            spawn_telemetry(SimulatedTelemetry::new(seed, interval), store.clone(), cancel_token.clone()).await
        }
    }
}

async fn open_pose_source(poses: &str, frame_interval_ms: u64) -> Result<Box<dyn PoseSource>> {
    if poses == "-" {
        info!("📥 Poses: stdin (JSON lines)");
        return Ok(Box::new(JsonlPoseSource::stdin(frame_interval_ms)));
    }
    let path = PathBuf::from(poses);
    let source = JsonlPoseSource::open(&path, frame_interval_ms)
        .await
        .with_context(|| format!("Cannot open pose recording {}", path.display()))?;
    info!("📥 Poses: {} ({}ms between frames)", path.display(), frame_interval_ms);
    Ok(Box::new(source))
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    if args.poses == "-" && args.telemetry == TelemetryMode::Stdin {
        bail!("--poses - and --telemetry stdin cannot both read standard input");
    }

    let monitor_config = load_config(args.config.as_ref())?;
    let t = &monitor_config.thresholds;
    info!(
        "Thresholds: arm [{:.0}°, {:.0}°] | shoulders ≤ {:.2} | back ≤ {:.0}° | min confidence {:.2}",
        t.bow_arm_min_deg,
        t.bow_arm_max_deg,
        t.shoulder_level_max,
        t.back_angle_max_deg,
        monitor_config.detection.min_detection_confidence
    );
    config::init(monitor_config);

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  violin-posture - Real-time Violin Posture Monitor");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("");

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("🛑 Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let mut source = open_pose_source(&args.poses, args.frame_interval_ms).await?;

    let store = TelemetryStore::new();
    let link = start_telemetry(args.telemetry, args.seed, &store, &cancel_token).await;

    let mut renderer: Box<dyn Renderer> = if args.json {
        Box::new(JsonRenderer::stdout())
    } else {
        Box::new(LogRenderer::new())
    };

    let stats = FusionLoop::new(store, link.is_online(), cancel_token.clone())
        .with_max_frames(args.max_frames)
        .run(source.as_mut(), renderer.as_mut())
        .await;

    // Stop the telemetry pump once the video side is done
    cancel_token.cancel();
    if let Some(applied) = link.join().await {
        info!("Telemetry link closed ({} events applied)", applied);
    }

    info!("");
    info!(
        "✓ violin-posture shutdown complete ({} frames, {} with a pose)",
        stats.frames, stats.detections
    );
    Ok(())
}
