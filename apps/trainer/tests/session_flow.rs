//! End-to-end session tests over a shared SQLite store.

mod common;

use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::io::{AsyncWriteExt, BufReader};

use common::{shared_store, started_app, text, DELAY};
use vocab_core::{KeyValueStore, Phase, SessionMachine, PROGRESS_KEY};
use vocab_trainer::dataset::LOAD_ERROR_MESSAGE;
use vocab_trainer::render::CORRECT_MESSAGE;
use vocab_trainer::session_loop;
use vocab_trainer::state::AppState;

/// Progress written by one app is resumed by the next.
#[test]
fn progress_survives_restart() {
    let store = shared_store();
    let mut app = started_app(store.clone());
    assert_eq!(app.machine.current_card().unwrap().en, "run");

    app.apply(vocab_core::Command::Submit("runs".into()));
    app.apply(vocab_core::Command::Submit("Run".into()));
    drop(app);

    let app = started_app(store);
    let state = app.machine.state();
    assert_eq!(state.attempts, 2);
    assert_eq!(state.correct, 1);
    assert_eq!(state.cursor, Some(0));
    assert_eq!(state.order, vec![0, 1, 2]);
    assert_eq!(app.machine.phase(), Phase::Presenting);
}

/// A filter chosen before a restart is still active afterwards.
#[test]
fn filter_survives_restart() {
    let store = shared_store();
    let mut app = started_app(store.clone());
    app.apply(vocab_core::Command::SetFilter("Verbs".into()));
    app.apply(vocab_core::Command::Skip);
    drop(app);

    let app = started_app(store);
    let state = app.machine.state();
    assert_eq!(state.filter_section, "Verbs");
    assert_eq!(state.pool, vec![0, 2]);
    assert_eq!(state.cursor, Some(1));
    assert_eq!(app.machine.current_card().unwrap().en, "look after");
}

/// Correct answer, delayed advance, then the next card.
#[tokio::test(start_paused = true)]
async fn correct_answer_advances_after_delay() {
    let mut app = started_app(shared_store());
    let mut out = Vec::new();
    let (mut client, server) = tokio::io::duplex(1024);

    let driver = async move {
        client.write_all(b"He RUNS\nrun\n").await.unwrap();
        tokio::time::sleep(DELAY + Duration::from_millis(500)).await;
        client.write_all(b":quit\n").await.unwrap();
    };

    let (result, ()) = tokio::join!(
        session_loop(&mut app, DELAY, BufReader::new(server), &mut out),
        driver
    );
    result.unwrap();

    let out = text(out);
    assert!(out.contains(CORRECT_MESSAGE));
    assert!(out.contains("She ate two ______."));
    assert_eq!(app.machine.state().cursor, Some(1));
    assert_eq!(app.machine.state().attempts, 2);
    assert_eq!(app.machine.state().correct, 1);

    let saved = app.progress.load(3).unwrap();
    assert_eq!(saved.cursor, Some(1));
}

/// Skipping while an advance is pending moves exactly one card.
#[tokio::test(start_paused = true)]
async fn skip_cancels_pending_advance() {
    let mut app = started_app(shared_store());
    let mut out = Vec::new();
    let (mut client, server) = tokio::io::duplex(1024);

    let driver = async move {
        client.write_all(b"run\n:skip\n").await.unwrap();
        tokio::time::sleep(DELAY * 3).await;
        client.write_all(b":quit\n").await.unwrap();
    };

    let (result, ()) = tokio::join!(
        session_loop(&mut app, DELAY, BufReader::new(server), &mut out),
        driver
    );
    result.unwrap();

    assert_eq!(app.machine.state().cursor, Some(1));
    assert_eq!(app.machine.phase(), Phase::Presenting);
    assert_eq!(app.machine.pending_advance(), None);
}

#[tokio::test]
async fn reset_requires_confirmation() {
    let store = shared_store();
    let mut app = started_app(store.clone());
    let mut out = Vec::new();

    let input: &[u8] = b"apple\n:reset\nn\n";
    session_loop(&mut app, DELAY, input, &mut out).await.unwrap();
    assert!(text(out).contains("reset cancelled"));
    assert_eq!(app.machine.state().attempts, 1);

    let mut out = Vec::new();
    let input: &[u8] = b":skip\n:reset\ny\n";
    session_loop(&mut app, DELAY, input, &mut out).await.unwrap();

    let state = app.machine.state();
    assert_eq!(state.attempts, 0);
    assert_eq!(state.correct, 0);
    assert_eq!(state.cursor, Some(0));

    let saved = app.progress.load(3).unwrap();
    assert_eq!(saved.attempts, 0);
    assert_eq!(saved.cursor, Some(0));
}

#[tokio::test]
async fn popup_off_hides_example_after_correct() {
    let store = shared_store();
    let mut app = started_app(store.clone());
    let mut out = Vec::new();

    let input: &[u8] = b":popup off\nrun\n";
    session_loop(&mut app, DELAY, input, &mut out).await.unwrap();
    let out = text(out);
    assert!(out.contains(CORRECT_MESSAGE));
    assert!(!out.contains("runs"));

    let app = started_app(store);
    assert!(!app.show_popup);
}

#[tokio::test]
async fn hint_and_reveal_show_answer() {
    let mut app = started_app(shared_store());
    let mut out = Vec::new();

    let input: &[u8] = b":hint\n:reveal\n";
    session_loop(&mut app, DELAY, input, &mut out).await.unwrap();
    let out = text(out);
    assert!(out.contains("英語: run"));
    assert!(out.contains("runs"));
    assert_eq!(app.machine.state().attempts, 0);
}

#[tokio::test]
async fn unknown_section_shows_empty_message() {
    let mut app = started_app(shared_store());
    let mut out = Vec::new();

    let input: &[u8] = b":filter Adverbs\nrun\n";
    session_loop(&mut app, DELAY, input, &mut out).await.unwrap();

    assert!(text(out).contains(vocab_core::EMPTY_POOL_MESSAGE));
    assert_eq!(app.machine.phase(), Phase::Empty);
    assert_eq!(app.machine.state().attempts, 0);
}

/// A failed load reports once and leaves earlier progress alone.
#[tokio::test]
async fn load_failure_keeps_saved_progress() {
    let store = shared_store();
    let mut app = started_app(store.clone());
    app.apply(vocab_core::Command::Skip);
    let saved = store.get(PROGRESS_KEY).unwrap();
    drop(app);

    let mut app = AppState::failed(SessionMachine::new(Vec::new()), store.clone(), "HTTP 404");
    app.start();
    let mut out = Vec::new();
    let input: &[u8] = b"run\n:skip\n:reset\n:quit\n:skip\n";
    session_loop(&mut app, DELAY, input, &mut out).await.unwrap();

    assert_eq!(text(out).matches(LOAD_ERROR_MESSAGE).count(), 1);
    assert_eq!(store.get(PROGRESS_KEY).unwrap(), saved);
}
