//! Verdict rendering.
//!
//! The fusion loop hands every [`FrameVerdict`] to a [`Renderer`]. Drawing on
//! a video frame is the embedding application's concern; the renderers here
//! surface verdicts as log lines or as JSON for a downstream overlay process.

use std::io::Write;

use serde::Serialize;

use crate::types::{FeedbackLabel, FrameVerdict, Readout};

/// Whether the loop should keep going after a frame was rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderControl {
    Continue,
    /// User asked to stop (e.g. pressed `q` in a display window)
    Quit,
}

/// Consumer of per-frame verdicts.
pub trait Renderer: Send {
    fn render(&mut self, verdict: &FrameVerdict) -> RenderControl;
}

// ============================================================================
// Log Renderer
// ============================================================================

/// Logs feedback changes at info and every frame at debug.
#[derive(Debug, Default)]
pub struct LogRenderer {
    last_label: Option<Option<FeedbackLabel>>,
    last_telemetry_text: Option<(String, String)>,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, verdict: &FrameVerdict) -> RenderControl {
        let label = verdict.label();

        tracing::debug!(
            frame = verdict.frame_index,
            label = ?label,
            mount = %verdict.mount_text,
            height = %verdict.height_text,
            "Frame verdict"
        );

        if self.last_label != Some(label) {
            match &verdict.posture {
                Some(posture) => tracing::info!(
                    "[Feedback] frame {}: {} | {} | severity {:?}",
                    verdict.frame_index,
                    posture.label.message(),
                    verdict.arm_angle_text.as_deref().unwrap_or_default(),
                    posture.severity
                ),
                None => tracing::info!("[Feedback] frame {}: no pose detected", verdict.frame_index),
            }
            self.last_label = Some(label);
        }

        if verdict.telemetry_online && self.telemetry_text_changed(verdict) {
            tracing::info!(
                "[Feedback] {} | {}",
                verdict.mount_text,
                verdict.height_text
            );
            self.last_telemetry_text = Some((verdict.mount_text.clone(), verdict.height_text.clone()));
        }

        RenderControl::Continue
    }
}

impl LogRenderer {
    fn telemetry_text_changed(&self, verdict: &FrameVerdict) -> bool {
        self.last_telemetry_text
            .as_ref()
            .map_or(true, |(mount, height)| *mount != verdict.mount_text || *height != verdict.height_text)
    }
}

// ============================================================================
// JSON Renderer
// ============================================================================

/// Verdict fields plus the coloured overlay readouts.
#[derive(Serialize)]
struct JsonFrame<'a> {
    #[serde(flatten)]
    verdict: &'a FrameVerdict,
    readouts: Vec<Readout<'a>>,
}

/// Writes one JSON object per verdict, newline-delimited.
///
/// Each object is a serialized [`FrameVerdict`] with an extra `readouts`
/// array giving every overlay line with its colour.
/// A write failure (e.g. a closed pipe) ends the session.
pub struct JsonRenderer<W: Write + Send> {
    writer: W,
}

impl JsonRenderer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> JsonRenderer<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_verdict(&mut self, verdict: &FrameVerdict) -> std::io::Result<()> {
        let frame = JsonFrame {
            verdict,
            readouts: verdict.readouts(),
        };
        serde_json::to_writer(&mut self.writer, &frame)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

impl<W: Write + Send> Renderer for JsonRenderer<W> {
    fn render(&mut self, verdict: &FrameVerdict) -> RenderControl {
        match self.write_verdict(verdict) {
            Ok(()) => RenderControl::Continue,
            Err(e) => {
                tracing::warn!("[JsonRenderer] Output closed: {}", e);
                RenderControl::Quit
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TelemetryState;

    fn verdict(frame_index: u64) -> FrameVerdict {
        FrameVerdict {
            frame_index,
            posture: None,
            telemetry: TelemetryState::default(),
            telemetry_online: false,
            mount_text: "Scroll: Connecting...".to_string(),
            height_text: "Height: ...".to_string(),
            arm_angle_text: None,
        }
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_json_renderer_writes_one_line_per_verdict() {
        let mut renderer = JsonRenderer::new(Vec::new());
        assert_eq!(renderer.render(&verdict(0)), RenderControl::Continue);
        assert_eq!(renderer.render(&verdict(1)), RenderControl::Continue);

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: FrameVerdict = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed, verdict(1));
    }

    #[test]
    fn test_json_renderer_includes_readout_colours() {
        let mut renderer = JsonRenderer::new(Vec::new());
        renderer.render(&verdict(0));

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        let readouts = value["readouts"].as_array().unwrap();
        assert_eq!(readouts.len(), 2);
        assert_eq!(readouts[0]["text"], "Scroll: Connecting...");
        assert_eq!(readouts[0]["color"], serde_json::json!({"r": 100, "g": 200, "b": 255}));
        assert_eq!(readouts[1]["text"], "Height: ...");
    }

    #[test]
    fn test_log_renderer_notices_height_change_with_same_mount() {
        let mut renderer = LogRenderer::new();
        let mut online = verdict(0);
        online.telemetry_online = true;
        online.mount_text = "Scroll: Mounted".to_string();
        online.height_text = "Height: 12 cm".to_string();

        assert!(renderer.telemetry_text_changed(&online));
        renderer.render(&online);
        assert!(!renderer.telemetry_text_changed(&online));

        let mut taller = online.clone();
        taller.height_text = "Height: 15 cm".to_string();
        assert!(renderer.telemetry_text_changed(&taller));
        renderer.render(&taller);
        assert_eq!(
            renderer.last_telemetry_text,
            Some(("Scroll: Mounted".to_string(), "Height: 15 cm".to_string()))
        );
    }

    #[test]
    fn test_json_renderer_quits_on_write_failure() {
        let mut renderer = JsonRenderer::new(ClosedPipe);
        assert_eq!(renderer.render(&verdict(0)), RenderControl::Quit);
    }

    #[test]
    fn test_log_renderer_never_quits() {
        let mut renderer = LogRenderer::new();
        for i in 0..3 {
            assert_eq!(renderer.render(&verdict(i)), RenderControl::Continue);
        }
    }
}
