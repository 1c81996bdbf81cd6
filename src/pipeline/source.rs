//! Pose source abstraction for per-frame landmark ingestion.
//!
//! Provides a unified trait for reading pose samples from different sources:
//! in-memory replay (tests, fixtures) and JSON-lines recordings (file or
//! stdin) produced by an external camera + pose-model process.

use crate::types::JointSample;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Frame-acquisition errors
#[derive(Debug, Error)]
pub enum PoseSourceError {
    #[error("Failed to open pose source {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("Pose source read error: {0}")]
    Read(#[from] std::io::Error),

    #[error("Pose source already released")]
    Released,
}

/// Events produced by a pose source.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEvent {
    /// One frame was acquired; `None` means the detector found no pose.
    Sample(Option<JointSample>),
    /// Source reached end of stream.
    Eof,
}

/// Trait abstracting where per-frame pose samples come from.
///
/// The fusion loop calls [`next_frame`](PoseSource::next_frame) in a
/// `select!` with cancellation and calls [`release`](PoseSource::release)
/// exactly once when it stops, whatever the reason.
#[async_trait]
pub trait PoseSource: Send + 'static {
    /// Acquire the next frame's sample.
    ///
    /// Returns `FrameEvent::Eof` when no more frames are available.
    async fn next_frame(&mut self) -> Result<FrameEvent, PoseSourceError>;

    /// Release the underlying capture resource.
    fn release(&mut self);

    /// Human-readable name for logging (e.g. "replay", "jsonl").
    fn source_name(&self) -> &str;
}

// ============================================================================
// Replay Source (in-memory)
// ============================================================================

/// Replays pre-loaded samples with optional inter-frame delay.
pub struct ReplaySource {
    frames: std::vec::IntoIter<Option<JointSample>>,
    delay_ms: u64,
    yielded_first: bool,
    released: bool,
}

impl ReplaySource {
    pub fn new(frames: Vec<Option<JointSample>>, delay_ms: u64) -> Self {
        Self {
            frames: frames.into_iter(),
            delay_ms,
            yielded_first: false,
            released: false,
        }
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

#[async_trait]
impl PoseSource for ReplaySource {
    async fn next_frame(&mut self) -> Result<FrameEvent, PoseSourceError> {
        if self.released {
            return Err(PoseSourceError::Released);
        }
        // No delay before the first frame
        if self.yielded_first && self.delay_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.delay_ms)).await;
        }
        match self.frames.next() {
            Some(frame) => {
                self.yielded_first = true;
                Ok(FrameEvent::Sample(frame))
            }
            None => Ok(FrameEvent::Eof),
        }
    }

    fn release(&mut self) {
        self.released = true;
    }

    fn source_name(&self) -> &str {
        "replay"
    }
}

// ============================================================================
// JSON-Lines Source (file / stdin)
// ============================================================================

/// Reads one JSON pose sample per line.
///
/// Each line is either a [`JointSample`] object or `null` for a frame with no
/// detection. Lines that fail to parse are logged and delivered as
/// no-detection frames so frame numbering stays aligned with the recording.
pub struct JsonlPoseSource<R> {
    reader: Option<R>,
    name: String,
    delay_ms: u64,
    yielded_first: bool,
    line_buffer: Vec<u8>,
    line_number: u64,
}

impl JsonlPoseSource<BufReader<tokio::fs::File>> {
    /// Open a recording on disk.
    pub async fn open(path: &Path, delay_ms: u64) -> Result<Self, PoseSourceError> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|source| PoseSourceError::Open {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self::new(BufReader::new(file), &path.display().to_string(), delay_ms))
    }
}

impl JsonlPoseSource<BufReader<tokio::io::Stdin>> {
    /// Read samples piped into standard input.
    pub fn stdin(delay_ms: u64) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), "stdin", delay_ms)
    }
}

impl<R> JsonlPoseSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(reader: R, name: &str, delay_ms: u64) -> Self {
        Self {
            reader: Some(reader),
            name: name.to_string(),
            delay_ms,
            yielded_first: false,
            line_buffer: Vec::with_capacity(1024),
            line_number: 0,
        }
    }

    fn parse_line(&self, line: &str) -> Option<JointSample> {
        match serde_json::from_str::<Option<JointSample>>(line) {
            Ok(sample) => sample,
            Err(e) => {
                tracing::warn!(
                    source = %self.name,
                    line = self.line_number,
                    "Failed to parse pose sample: {}",
                    e
                );
                None
            }
        }
    }
}

#[async_trait]
impl<R> PoseSource for JsonlPoseSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    async fn next_frame(&mut self) -> Result<FrameEvent, PoseSourceError> {
        if self.yielded_first && self.delay_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.delay_ms)).await;
        }
        loop {
            let reader = self.reader.as_mut().ok_or(PoseSourceError::Released)?;
            self.line_buffer.clear();
            let bytes = reader.read_until(b'\n', &mut self.line_buffer).await?;
            if bytes == 0 {
                return Ok(FrameEvent::Eof);
            }
            self.line_number += 1;
            let line = match std::str::from_utf8(&self.line_buffer) {
                Ok(text) => text.trim(),
                Err(e) => {
                    tracing::warn!(
                        source = %self.name,
                        line = self.line_number,
                        "Pose sample is not valid UTF-8: {}",
                        e
                    );
                    self.yielded_first = true;
                    return Ok(FrameEvent::Sample(None));
                }
            };
            if line.is_empty() {
                continue;
            }
            self.yielded_first = true;
            return Ok(FrameEvent::Sample(self.parse_line(line)));
        }
    }

    fn release(&mut self) {
        if self.reader.take().is_some() {
            tracing::debug!(source = %self.name, "Pose source released");
        }
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
