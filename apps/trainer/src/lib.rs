pub mod commands;
pub mod config;
pub mod dataset;
pub mod db;
pub mod render;
pub mod scheduler;
pub mod state;

use std::io::Write;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vocab_core::{KeyValueStore, SessionMachine, PROGRESS_KEY};

use crate::commands::{is_confirmation, parse_input, study, Flow};
use crate::config::Config;
use crate::dataset::LOAD_ERROR_MESSAGE;
use crate::db::SqliteStore;
use crate::scheduler::AdvanceScheduler;
use crate::state::AppState;

pub const RESET_PROMPT: &str = "進行状況をリセットしますか？（保存データも消去されます） [y/N]";

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;

    let store = match SqliteStore::open(&config.db_path) {
        Ok(store) => store,
        Err(err) => {
            tracing::warn!(
                error = %err,
                path = %config.db_path.display(),
                "cannot open progress database, progress will not be kept"
            );
            SqliteStore::open_in_memory()?
        }
    };
    if let Ok(Some(at)) = store.last_updated(PROGRESS_KEY) {
        tracing::info!(%at, "found saved progress");
    }

    let mut app = match dataset::load(&config.dataset).await {
        Ok(entries) => {
            let mut app = AppState::new(SessionMachine::new(entries), store);
            app.start();
            app
        }
        Err(err) => {
            tracing::error!(error = %err, dataset = %config.dataset, "dataset load failed");
            AppState::failed(SessionMachine::new(Vec::new()), store, err.to_string())
        }
    };

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    session_loop(&mut app, config.advance_delay, stdin, &mut stdout).await
}

/// Read commands from `input` until `:quit` or end of input, interleaved
/// with scheduled advances.
pub async fn session_loop<S, R, W>(
    app: &mut AppState<S>,
    advance_delay: Duration,
    input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: KeyValueStore,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
    let mut scheduler = AdvanceScheduler::new(advance_delay, tick_tx);
    let mut lines = input.lines();
    let mut confirming_reset = false;

    if app.load_error().is_some() {
        writeln!(out, "{LOAD_ERROR_MESSAGE}")?;
    } else {
        render::card(out, &app.machine)?;
    }
    render::prompt(out)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };

                if confirming_reset {
                    confirming_reset = false;
                    if is_confirmation(&line) {
                        study::reset(app, &mut scheduler, out)?;
                    } else {
                        writeln!(out, "reset cancelled")?;
                    }
                    render::prompt(out)?;
                    continue;
                }

                match commands::handle(parse_input(&line), app, &mut scheduler, out)? {
                    Flow::Quit => break,
                    Flow::ConfirmReset => {
                        confirming_reset = true;
                        write!(out, "{RESET_PROMPT} ")?;
                        out.flush()?;
                    }
                    Flow::Continue => render::prompt(out)?,
                }
            }
            Some(ticket) = tick_rx.recv() => {
                if study::tick(ticket, app, out)? {
                    render::prompt(out)?;
                }
            }
        }
    }

    scheduler.cancel();
    Ok(())
}
