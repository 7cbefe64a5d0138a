//! Common test utilities for trainer integration tests.

pub mod fixtures;

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use vocab_core::SessionMachine;
use vocab_trainer::db::SqliteStore;
use vocab_trainer::state::AppState;

pub const DELAY: Duration = Duration::from_millis(1000);

/// Shared in-memory database, so several app instances can see the same
/// saved progress.
pub fn shared_store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open_in_memory().expect("in-memory database"))
}

/// A started app over the fixture vocabulary with a seeded shuffle.
pub fn started_app(store: Arc<SqliteStore>) -> AppState<Arc<SqliteStore>> {
    let machine = SessionMachine::with_rng(fixtures::entries(), StdRng::seed_from_u64(42));
    let mut app = AppState::new(machine, store);
    app.start();
    app
}

pub fn text(out: Vec<u8>) -> String {
    String::from_utf8(out).expect("utf-8 output")
}
