//! Plain-text and JSON presentation of board events.

use std::fmt::Write as _;

use serde::Deserialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use trilemma_domain::event::Event;
use trilemma_domain::snapshot::{BoardSnapshot, SwitchView};
use trilemma_domain::switch::SwitchPhase;

/// How events are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per switch plus a conflict banner.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Render the board, one line per switch.
#[must_use]
pub fn render_board(snapshot: &BoardSnapshot) -> String {
    let width = snapshot
        .switches
        .iter()
        .map(|s| s.label.chars().count())
        .max()
        .unwrap_or_default();

    let mut out = String::new();
    for (position, switch) in snapshot.switches.iter().enumerate() {
        let _ = writeln!(
            out,
            "{} [{}] {:<width$}{}",
            position + 1,
            marker(switch.phase),
            switch.label,
            flags(switch),
        );
    }
    if snapshot.conflict {
        match snapshot.order.first() {
            Some(next) => {
                let _ = writeln!(out, "!! all three on, {next} drops next");
            }
            None => out.push_str("!! all three on\n"),
        }
    }
    out
}

/// Render one event in the requested format.
///
/// # Errors
///
/// Returns an error if the event cannot be serialized to JSON.
pub fn render_event(event: &Event, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(format!("> {}\n{}", event.kind, render_board(&event.snapshot))),
        OutputFormat::Json => serde_json::to_string(event).map(|json| json + "\n"),
    }
}

/// Write every event received on `events` to `out` until the bus closes.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub async fn render_events<W>(
    events: broadcast::Receiver<Event>,
    mut out: W,
    format: OutputFormat,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut stream = BroadcastStream::new(events);
    while let Some(result) = stream.next().await {
        match result {
            Ok(event) => match render_event(&event, format) {
                Ok(text) => {
                    out.write_all(text.as_bytes()).await?;
                    out.flush().await?;
                }
                Err(err) => tracing::warn!(%err, "failed to serialize event"),
            },
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "renderer lagged, some events were dropped");
            }
        }
    }
    Ok(())
}

fn marker(phase: SwitchPhase) -> &'static str {
    match phase {
        SwitchPhase::Off => "   ",
        SwitchPhase::TurningOn => "...",
        SwitchPhase::On => "ON ",
    }
}

fn flags(switch: &SwitchView) -> String {
    let mut flags = String::new();
    if switch.shake {
        flags.push_str("  ~shake");
    }
    if switch.shake_strong {
        flags.push_str("  ~shake-strong");
    }
    if switch.falling {
        flags.push_str("  v falling");
    }
    flags
}
