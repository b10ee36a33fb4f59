use crate::domain::event::KycEvent;
use crate::domain::ports::EventBus;
use crate::error::{KycError, Result};
use async_trait::async_trait;
use std::io::Write;
use tokio::sync::Mutex;

/// Event bus adapter that writes every published event as one JSON object
/// per line.
///
/// Wired to stdout in the CLI so a run produces a machine-readable audit
/// trail; diagnostics go to stderr and never interleave with it.
pub struct JsonLineEventBus<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLineEventBus<W> {
    /// Creates a new `JsonLineEventBus` over any `Write` sink (e.g., Stdout,
    /// File, `Vec<u8>`).
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the bus and returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W: Write + Send> EventBus for JsonLineEventBus<W> {
    async fn publish(&self, event: KycEvent) -> Result<()> {
        let line = serde_json::to_string(&event)
            .map_err(|e| KycError::InternalError(Box::new(e)))?;
        let mut writer = self.writer.lock().await;
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}
