//! Per-frame fusion loop.
//!
//! Pulls one pose sample per frame, classifies it, reads a telemetry snapshot,
//! and hands the combined [`FrameVerdict`] to a [`Renderer`]. Telemetry is
//! read, never awaited, so a silent accessory cannot stall the video path.

use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::render::{RenderControl, Renderer};
use super::source::{FrameEvent, PoseSource};
use super::TelemetryStore;
use crate::classifier::PostureClassifier;
use crate::config::defaults::PROGRESS_LOG_EVERY_FRAMES;
use crate::config::{DisplayConfig, PostureThresholds};
use crate::kinematics::derive_angles;
use crate::types::{FeedbackLabel, FrameVerdict, JointSample, PostureAssessment, TelemetryState};

// ============================================================================
// Statistics
// ============================================================================

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream,
    RendererQuit,
    Cancelled,
    FrameLimit,
    SourceError,
}

/// Session totals returned by [`FusionLoop::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopStats {
    pub frames: u64,
    /// Frames in which a usable pose was found
    pub detections: u64,
    pub label_counts: BTreeMap<FeedbackLabel, u64>,
    pub stop_reason: StopReason,
}

impl LoopStats {
    fn new() -> Self {
        Self {
            frames: 0,
            detections: 0,
            label_counts: FeedbackLabel::ALL.iter().map(|l| (*l, 0)).collect(),
            stop_reason: StopReason::EndOfStream,
        }
    }

    pub fn count(&self, label: FeedbackLabel) -> u64 {
        self.label_counts.get(&label).copied().unwrap_or(0)
    }

    fn record(&mut self, verdict: &FrameVerdict) {
        self.frames += 1;
        if let Some(label) = verdict.label() {
            self.detections += 1;
            *self.label_counts.entry(label).or_insert(0) += 1;
        }
    }
}

// ============================================================================
// Verdict Composition
// ============================================================================

/// Fuse one frame's pose sample with a telemetry snapshot.
///
/// Samples below `min_confidence`, or missing a required landmark, produce a
/// verdict without posture (the "no pose detected" display state).
pub fn build_verdict(
    frame_index: u64,
    sample: Option<&JointSample>,
    telemetry: &TelemetryState,
    telemetry_online: bool,
    thresholds: &PostureThresholds,
    min_confidence: f64,
) -> FrameVerdict {
    compose(
        frame_index,
        sample,
        telemetry,
        telemetry_online,
        &PostureClassifier::new(*thresholds),
        min_confidence,
        &DisplayConfig::default().height_placeholder,
    )
}

fn compose(
    frame_index: u64,
    sample: Option<&JointSample>,
    telemetry: &TelemetryState,
    telemetry_online: bool,
    classifier: &PostureClassifier,
    min_confidence: f64,
    height_placeholder: &str,
) -> FrameVerdict {
    let posture = sample
        .filter(|s| s.confidence >= min_confidence)
        .and_then(|s| {
            let Some(angles) = derive_angles(s) else {
                tracing::trace!(frame = frame_index, missing = ?s.missing_required(), "Pose lacks required landmarks");
                return None;
            };
            let class = classifier.classify(&angles);
            Some(PostureAssessment {
                label: class.label,
                severity: class.severity,
                color: class.color,
                angles,
                skeleton: s.skeleton_segments(),
            })
        });

    let arm_angle_text = posture.as_ref().map(|p| arm_text(p.angles.right_arm_angle));

    FrameVerdict {
        frame_index,
        posture,
        telemetry: *telemetry,
        telemetry_online,
        mount_text: mount_text(telemetry),
        height_text: height_text(telemetry, height_placeholder),
        arm_angle_text,
    }
}

/// Truncated to whole degrees; a non-finite angle shows a placeholder.
fn arm_text(degrees: f64) -> String {
    if degrees.is_finite() {
        format!("Arm Angle: {}°", degrees as i64)
    } else {
        "Arm Angle: --".to_string()
    }
}

pub fn mount_text(telemetry: &TelemetryState) -> String {
    format!("Scroll: {}", telemetry.mount_status)
}

pub fn height_text(telemetry: &TelemetryState, placeholder: &str) -> String {
    match telemetry.height_cm {
        Some(cm) => format!("Height: {cm} cm"),
        None => format!("Height: {placeholder}"),
    }
}

// ============================================================================
// Fusion Loop
// ============================================================================

/// Owns everything the per-frame loop needs.
///
/// Built with [`new()`](FusionLoop::new), optionally tuned with the `with_*`
/// builders, then consumed by [`run()`](FusionLoop::run).
pub struct FusionLoop {
    store: TelemetryStore,
    telemetry_online: bool,
    classifier: PostureClassifier,
    min_confidence: f64,
    height_placeholder: String,
    max_frames: Option<u64>,
    cancel_token: CancellationToken,
}

impl FusionLoop {
    pub fn new(store: TelemetryStore, telemetry_online: bool, cancel_token: CancellationToken) -> Self {
        let config = crate::config::get();
        Self {
            store,
            telemetry_online,
            classifier: PostureClassifier::new(config.thresholds),
            min_confidence: config.detection.min_detection_confidence,
            height_placeholder: config.display.height_placeholder.clone(),
            max_frames: None,
            cancel_token,
        }
    }

    pub fn with_thresholds(mut self, thresholds: PostureThresholds) -> Self {
        self.classifier = PostureClassifier::new(thresholds);
        self
    }

    pub const fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub const fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Run until the source ends, the renderer quits, the frame limit is
    /// reached, the source fails, or cancellation.
    ///
    /// The source is released exactly once: before returning, or during
    /// unwinding if frame processing panics, or when this future is dropped.
    pub async fn run<S, R>(self, source: &mut S, renderer: &mut R) -> LoopStats
    where
        S: PoseSource + ?Sized,
        R: Renderer + ?Sized,
    {
        let mut source = ReleaseGuard::new(source);
        let mut stats = LoopStats::new();

        info!("🎻 Monitoring posture from {}...", source.source_name());
        if !self.telemetry_online {
            info!("[FusionLoop] Telemetry offline; scroll overlay shows initial values");
        }
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        stats.stop_reason = loop {
            if self.max_frames.is_some_and(|max| stats.frames >= max) {
                info!("[FusionLoop] Frame limit reached ({} frames)", stats.frames);
                break StopReason::FrameLimit;
            }

            let event = tokio::select! {
                biased;
                () = self.cancel_token.cancelled() => {
                    info!("[FusionLoop] Shutdown signal received");
                    break StopReason::Cancelled;
                }
                result = source.next_frame() => match result {
                    Ok(ev) => ev,
                    Err(e) => {
                        warn!("[FusionLoop] Pose source error: {}", e);
                        break StopReason::SourceError;
                    }
                }
            };

            let sample = match event {
                FrameEvent::Sample(sample) => sample,
                FrameEvent::Eof => {
                    info!("[FusionLoop] Source reached end ({} frames processed)", stats.frames);
                    break StopReason::EndOfStream;
                }
            };

            let telemetry = self.store.current_state();
            let verdict = compose(
                stats.frames,
                sample.as_ref(),
                &telemetry,
                self.telemetry_online,
                &self.classifier,
                self.min_confidence,
                &self.height_placeholder,
            );
            stats.record(&verdict);

            if stats.frames % PROGRESS_LOG_EVERY_FRAMES == 0 {
                debug!(
                    "📈 Progress: {} frames | Detections: {} | Telemetry rev {}",
                    stats.frames, stats.detections, telemetry.revision
                );
            }

            if renderer.render(&verdict) == RenderControl::Quit {
                info!("[FusionLoop] Renderer requested quit");
                break StopReason::RendererQuit;
            }
        };

        source.release_once();
        log_summary(&stats, &self.store.current_state());
        stats
    }
}

/// Releases the wrapped source on drop unless it was already released.
struct ReleaseGuard<'a, S: PoseSource + ?Sized> {
    source: &'a mut S,
    released: bool,
}

impl<'a, S: PoseSource + ?Sized> ReleaseGuard<'a, S> {
    fn new(source: &'a mut S) -> Self {
        Self { source, released: false }
    }

    fn release_once(&mut self) {
        if !self.released {
            self.released = true;
            self.source.release();
        }
    }
}

impl<S: PoseSource + ?Sized> std::ops::Deref for ReleaseGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.source
    }
}

impl<S: PoseSource + ?Sized> std::ops::DerefMut for ReleaseGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.source
    }
}

impl<S: PoseSource + ?Sized> Drop for ReleaseGuard<'_, S> {
    fn drop(&mut self) {
        if !self.released {
            warn!("[FusionLoop] Loop aborted; releasing {}", self.source.source_name());
        }
        self.release_once();
    }
}

fn log_summary(stats: &LoopStats, telemetry: &TelemetryState) {
    info!("");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("📊 SESSION SUMMARY");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("   Frames Processed:     {}", stats.frames);
    info!("   Poses Detected:       {}", stats.detections);
    for (label, count) in &stats.label_counts {
        info!("   {:<30} {}", label.message(), count);
    }
    info!("   Telemetry Events:     {}", telemetry.revision);
    info!("   Stopped By:           {:?}", stats.stop_reason);
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
