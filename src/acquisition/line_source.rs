//! Line-delimited telemetry source
//!
//! Reads one accessory token per line from any async reader. Used with a
//! transport bridge that forwards notifications, e.g.
//! `ble-bridge F8:24:41:A3:1C:5B | violin-posture --telemetry stdin`.

use super::{AcquisitionError, TelemetrySource};
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

/// Telemetry source reading newline-delimited payloads.
pub struct LineTelemetrySource<R> {
    reader: Option<R>,
    pending: Option<R>,
    name: String,
    line_buffer: Vec<u8>,
}

impl LineTelemetrySource<BufReader<Stdin>> {
    /// Read payloads from the process's standard input.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), "stdin")
    }
}

impl<R> LineTelemetrySource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(reader: R, name: &str) -> Self {
        Self {
            reader: None,
            pending: Some(reader),
            name: name.to_string(),
            line_buffer: Vec::with_capacity(64),
        }
    }
}

#[async_trait]
impl<R> TelemetrySource for LineTelemetrySource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    async fn connect(&mut self) -> Result<(), AcquisitionError> {
        if self.reader.is_some() {
            return Ok(());
        }
        let reader = self
            .pending
            .take()
            .ok_or_else(|| AcquisitionError::ConnectionFailed("reader already consumed".to_string()))?;
        self.reader = Some(reader);
        tracing::info!(source = %self.name, "Line telemetry source connected");
        Ok(())
    }

    async fn next_payload(&mut self) -> Result<Option<Vec<u8>>, AcquisitionError> {
        let reader = self.reader.as_mut().ok_or(AcquisitionError::NotConnected)?;
        loop {
            self.line_buffer.clear();
            let bytes = reader.read_until(b'\n', &mut self.line_buffer).await?;
            if bytes == 0 {
                return Ok(None);
            }
            // Blank lines carry no token
            if self.line_buffer.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            return Ok(Some(self.line_buffer.clone()));
        }
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock(data: &'static [u8]) -> BufReader<tokio_test::io::Mock> {
        BufReader::new(tokio_test::io::Builder::new().read(data).build())
    }

    #[tokio::test]
    async fn test_reads_lines_until_eof() {
        let mut source = LineTelemetrySource::new(mock(b"OK\n\nHeight:15\r\nScrollLoose"), "mock");
        source.connect().await.unwrap();

        assert_eq!(source.next_payload().await.unwrap().as_deref(), Some(&b"OK\n"[..]));
        assert_eq!(
            source.next_payload().await.unwrap().as_deref(),
            Some(&b"Height:15\r\n"[..])
        );
        assert_eq!(
            source.next_payload().await.unwrap().as_deref(),
            Some(&b"ScrollLoose"[..])
        );
        assert!(source.next_payload().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_before_connect_fails() {
        let reader = BufReader::new(tokio_test::io::Builder::new().build());
        let mut source = LineTelemetrySource::new(reader, "mock");
        assert!(matches!(
            source.next_payload().await,
            Err(AcquisitionError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_connect_is_idempotent() {
        let mut source = LineTelemetrySource::new(mock(b"OK\n"), "mock");
        source.connect().await.unwrap();
        source.connect().await.unwrap();
        assert_eq!(source.source_name(), "mock");
        assert!(source.next_payload().await.unwrap().is_some());
    }
}
