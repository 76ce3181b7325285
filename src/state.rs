use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::quiz::{Attempt, SubmitTrigger};
use crate::store::Store;

/// Shared application state: the persistent store plus the in-memory map of
/// active attempts, keyed by enrollment number. Attempts are transient;
/// only the final result record is persisted.
#[derive(Debug)]
pub struct AppState {
    pub store: Store,
    pub attempts: Mutex<HashMap<String, Attempt>>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(store: Store) -> SharedState {
        Arc::new(AppState {
            store,
            attempts: Mutex::new(HashMap::new()),
        })
    }
}

/// Once-a-second sweep that force-submits attempts whose countdown has
/// reached zero. Expiry is also checked on every request touching an
/// attempt, so the sweep only matters for students who walked away.
pub async fn expiry_sweep(state: SharedState) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
    loop {
        interval.tick().await;
        let now = Utc::now();
        let mut attempts = state.attempts.lock().unwrap();
        for attempt in attempts.values_mut() {
            if attempt.is_expired(now) {
                if let Some(result) = attempt.submit(SubmitTrigger::TimerExpired, now) {
                    if let Err(e) = state.store.append_result(result) {
                        tracing::error!("Could not persist expired attempt: {e}");
                        // The next sweep retries the submission.
                        attempt.revert_submission();
                    }
                }
            }
        }
    }
}
