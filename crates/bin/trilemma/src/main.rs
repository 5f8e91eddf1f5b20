//! # trilemma — switch sequencer in the terminal
//!
//! Composition root that wires the sequencer to the keyboard and stdout.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Install the tracing subscriber, writing to stderr
//! - Build the board and scenario, start the sequencer
//! - Render board events to stdout, read commands from stdin
//! - Handle graceful shutdown (`quit`, end of input, Ctrl-C)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on every other crate.
//! It is the wiring layer — no sequencing logic belongs here.

use tokio::io::AsyncWriteExt;
use tracing_subscriber::EnvFilter;

use trilemma::config::Config;
use trilemma::input::HELP;
use trilemma::render::render_events;
use trilemma::session::{read_commands, stdin_lines};
use trilemma_app::event_bus::InProcessEventBus;
use trilemma_app::sequencer::Sequencer;
use trilemma_domain::error::TrilemmaError;

const EVENT_CAPACITY: usize = 64;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .with_writer(std::io::stderr)
        .init();

    let board = config.board()?;
    let scenario = config.scenario()?;
    let keys: Vec<_> = board.switches().iter().map(|s| s.key.clone()).collect();

    // The sequencer owns the only publisher, so the renderer ends with it.
    let bus = InProcessEventBus::new(EVENT_CAPACITY);
    let renderer = tokio::spawn(render_events(
        bus.subscribe(),
        tokio::io::stdout(),
        config.display.output,
    ));
    let (handle, sequencer) = Sequencer::spawn(board, scenario, bus)?;

    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{HELP}\n").as_bytes()).await?;
    stdout.flush().await?;

    tokio::select! {
        result = read_commands(&handle, &keys, stdin_lines(), stdout) => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("interrupted"),
    }

    match handle.shutdown().await {
        Ok(()) | Err(TrilemmaError::SequencerStopped) => {}
        Err(err) => return Err(err.into()),
    }
    drop(handle);
    sequencer.await?;
    renderer.await??;
    Ok(())
}
