//! Terminal rendering of the transmission log.
//!
//! Subscribes to the event bus and renders each event either as a colored
//! human-readable log block or as one NDJSON line per event for machine
//! consumption.

use crate::events::{BusError, EventReceiver, SentRecord, TransmissionEvent};
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    ExecutableCommand,
};
use std::io::stdout;
use tracing::warn;

/// Render style configuration.
#[derive(Debug, Clone)]
pub struct RenderStyle {
    pub sent_color: Color,
    pub error_color: Color,
    pub status_color: Color,
    /// Width of the divider printed between log entries.
    pub divider_width: usize,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            sent_color: Color::Green,
            error_color: Color::Red,
            status_color: Color::Cyan,
            divider_width: 60,
        }
    }
}

/// Output mode for the log renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Colored, human-readable log blocks.
    Pretty,
    /// One JSON object per line.
    Ndjson,
}

/// Renders transmission events to stdout.
pub struct LogRenderer {
    mode: OutputMode,
    style: RenderStyle,
}

impl LogRenderer {
    /// Create a renderer for the given output mode.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            style: RenderStyle::default(),
        }
    }

    /// Create with custom style.
    pub fn with_style(mode: OutputMode, style: RenderStyle) -> Self {
        Self { mode, style }
    }

    /// Consume events until the bus closes.
    pub async fn run_loop(self, mut rx: EventReceiver) {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Err(e) = self.render(&event) {
                        warn!("Failed to render event: {e}");
                    }
                }
                Err(BusError::Lagged(n)) => warn!("Renderer lagged behind by {n} events"),
                Err(BusError::Closed) => break,
            }
        }
    }

    /// Render a single event.
    pub fn render(&self, event: &TransmissionEvent) -> std::io::Result<()> {
        match self.mode {
            OutputMode::Pretty => self.render_pretty(event),
            OutputMode::Ndjson => self.render_ndjson(event),
        }
    }

    fn render_ndjson(&self, event: &TransmissionEvent) -> std::io::Result<()> {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => warn!("Failed to serialize event: {e}"),
        }
        Ok(())
    }

    fn render_pretty(&self, event: &TransmissionEvent) -> std::io::Result<()> {
        match event {
            TransmissionEvent::Started { rate_hz, .. } => {
                self.render_status(&format!("Transmitting at {rate_hz:.1} msg/sec"))
            }
            TransmissionEvent::Sent(record) => self.render_sent(record),
            TransmissionEvent::SourceFailed { detail } => {
                self.render_error(&format!("Skipped tick: {detail}"))
            }
            TransmissionEvent::PersistFailed { detail } => {
                self.render_error(&format!("Persist failed: {detail}"))
            }
            TransmissionEvent::Stopped { reason, emitted } => self.render_status(&format!(
                "Stopped ({reason:?}): {emitted} messages sent"
            )),
        }
    }

    fn render_sent(&self, record: &SentRecord) -> std::io::Result<()> {
        stdout()
            .execute(SetForegroundColor(self.style.sent_color))?
            .execute(Print(format!(
                "SENT #{} at {}:\n",
                record.seq,
                record.timestamp.format("%H:%M:%S%.3f")
            )))?
            .execute(ResetColor)?
            .execute(Print(&record.text))?
            .execute(Print(format!("\n{}\n", "-".repeat(self.style.divider_width))))?;
        Ok(())
    }

    fn render_error(&self, text: &str) -> std::io::Result<()> {
        stdout()
            .execute(SetForegroundColor(self.style.error_color))?
            .execute(Print(format!("{text}\n")))?
            .execute(ResetColor)?;
        Ok(())
    }

    fn render_status(&self, text: &str) -> std::io::Result<()> {
        stdout()
            .execute(SetForegroundColor(self.style.status_color))?
            .execute(Print(format!("{text}\n")))?
            .execute(ResetColor)?;
        Ok(())
    }
}
