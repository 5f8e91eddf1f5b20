//! Keyboard driver — forwards parsed lines to the sequencer.

use std::io::BufRead;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};

use trilemma_app::sequencer::SequencerHandle;
use trilemma_domain::error::TrilemmaError;
use trilemma_domain::id::SwitchKey;

use crate::input::Input;
use crate::render::render_board;

const LINE_CAPACITY: usize = 16;

/// Lines typed on stdin, read by a dedicated OS thread.
///
/// The thread is never joined, so an interrupted session does not wait for
/// the next line. The stream ends at end of input or on a read error.
#[must_use]
pub fn stdin_lines() -> ReceiverStream<String> {
    let (sender, receiver) = mpsc::channel(LINE_CAPACITY);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if sender.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::warn!(%err, "failed to read stdin");
                    break;
                }
            }
        }
        tracing::debug!("stdin closed");
    });
    ReceiverStream::new(receiver)
}

/// Read commands from `lines` until it ends, `quit` is entered or the
/// sequencer stops.
///
/// Board changes are shown by the event renderer; only `print` and
/// rejected lines write to `out`. Dropping the future between lines
/// leaves the sequencer untouched.
///
/// # Errors
///
/// Returns an error if writing `out` fails.
pub async fn read_commands<L, W>(
    handle: &SequencerHandle,
    keys: &[SwitchKey],
    mut lines: L,
    mut out: W,
) -> std::io::Result<()>
where
    L: Stream<Item = String> + Unpin,
    W: AsyncWrite + Unpin,
{
    while let Some(line) = lines.next().await {
        let command = match Input::parse(&line, keys) {
            Ok(command) => command,
            Err(err) => {
                out.write_all(format!("? {err}\n").as_bytes()).await?;
                continue;
            }
        };
        tracing::debug!(?command, "keyboard command");

        let result = match command {
            Input::Quit => break,
            Input::Toggle(key) => handle.toggle(key).await.map(drop),
            Input::Advance => handle.advance().await.map(drop),
            Input::Reset => handle.reset().await.map(drop),
            Input::Restart => handle.restart().await.map(drop),
            Input::Print => match handle.snapshot().await {
                Ok(snapshot) => {
                    out.write_all(render_board(&snapshot).as_bytes()).await?;
                    Ok(())
                }
                Err(err) => Err(err),
            },
        };

        match result {
            Ok(()) => {}
            Err(TrilemmaError::SequencerStopped) => {
                tracing::info!("sequencer stopped, no longer reading input");
                break;
            }
            Err(err) => out.write_all(format!("? {err}\n").as_bytes()).await?,
        }
        out.flush().await?;
    }
    Ok(())
}
