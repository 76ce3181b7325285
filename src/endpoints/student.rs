//! Quiz-taking endpoints. Every handler settles an overdue countdown before
//! acting, so an expired attempt submits on touch even if the background
//! sweep has not reached it yet.

use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{Response, StatusCode},
};
use chrono::{DateTime, Utc};

use crate::{
    endpoints::{json, message},
    model::request::ClientRequest,
    quiz::{Attempt, AttemptError, SubmitTrigger},
    state::SharedState,
    store::Store,
};

const NO_ACTIVE_QUIZ: &str = "No active quiz for this enrollment.";

/// Force-submits an attempt whose deadline has passed and persists the
/// result. Safe to call on any attempt; the submitted flag makes it a no-op
/// once a submission has landed.
fn settle_expiry(attempt: &mut Attempt, store: &Store, now: DateTime<Utc>) {
    if attempt.is_expired(now) {
        if let Some(result) = attempt.submit(SubmitTrigger::TimerExpired, now) {
            if let Err(e) = store.append_result(result) {
                tracing::error!("Could not persist expired attempt: {e}");
                attempt.revert_submission();
            }
        }
    }
}

fn attempt_error(e: AttemptError) -> Response<Body> {
    let status = match e {
        AttemptError::AlreadySubmitted => StatusCode::CONFLICT,
        AttemptError::OptionOutOfRange => StatusCode::BAD_REQUEST,
    };
    message(status, &e.to_string())
}

/// Current question, recorded answers, remaining time, and the result line
/// once the attempt is finished.
pub async fn quiz_view(
    State(state): State<SharedState>,
    Path(enroll): Path<String>,
) -> Response<Body> {
    let now = Utc::now();
    let mut attempts = state.attempts.lock().unwrap();
    let Some(attempt) = attempts.get_mut(&enroll) else {
        return message(StatusCode::NOT_FOUND, NO_ACTIVE_QUIZ);
    };
    settle_expiry(attempt, &state.store, now);
    json(StatusCode::OK, &attempt.view(now))
}

/// Sets or replaces the answer for the current question.
pub async fn select_answer(
    State(state): State<SharedState>,
    Path(enroll): Path<String>,
    Json(client_req): Json<ClientRequest>,
) -> Response<Body> {
    let Some(option) = client_req.answer else {
        return message(StatusCode::BAD_REQUEST, "Bad Request.");
    };

    let now = Utc::now();
    let mut attempts = state.attempts.lock().unwrap();
    let Some(attempt) = attempts.get_mut(&enroll) else {
        return message(StatusCode::NOT_FOUND, NO_ACTIVE_QUIZ);
    };
    settle_expiry(attempt, &state.store, now);

    match attempt.select_answer(option) {
        Ok(()) => json(StatusCode::OK, &attempt.view(now)),
        Err(e) => attempt_error(e),
    }
}

pub async fn previous_question(
    State(state): State<SharedState>,
    Path(enroll): Path<String>,
) -> Response<Body> {
    let now = Utc::now();
    let mut attempts = state.attempts.lock().unwrap();
    let Some(attempt) = attempts.get_mut(&enroll) else {
        return message(StatusCode::NOT_FOUND, NO_ACTIVE_QUIZ);
    };
    settle_expiry(attempt, &state.store, now);

    match attempt.previous() {
        Ok(()) => json(StatusCode::OK, &attempt.view(now)),
        Err(e) => attempt_error(e),
    }
}

pub async fn next_question(
    State(state): State<SharedState>,
    Path(enroll): Path<String>,
) -> Response<Body> {
    let now = Utc::now();
    let mut attempts = state.attempts.lock().unwrap();
    let Some(attempt) = attempts.get_mut(&enroll) else {
        return message(StatusCode::NOT_FOUND, NO_ACTIVE_QUIZ);
    };
    settle_expiry(attempt, &state.store, now);

    match attempt.next() {
        Ok(()) => json(StatusCode::OK, &attempt.view(now)),
        Err(e) => attempt_error(e),
    }
}

/// Explicit submission. Responds with the final view whether this call
/// performed the submission or a timer/visibility trigger already had.
pub async fn submit_quiz(
    State(state): State<SharedState>,
    Path(enroll): Path<String>,
) -> Response<Body> {
    submit_with(state, enroll, SubmitTrigger::Manual).await
}

/// The client reports that the quiz window lost foreground visibility.
/// Treated as a disqualification condition: the attempt is force-submitted,
/// though recorded answers still score.
pub async fn report_visibility_loss(
    State(state): State<SharedState>,
    Path(enroll): Path<String>,
) -> Response<Body> {
    submit_with(state, enroll, SubmitTrigger::VisibilityLost).await
}

async fn submit_with(
    state: SharedState,
    enroll: String,
    trigger: SubmitTrigger,
) -> Response<Body> {
    let now = Utc::now();
    let mut attempts = state.attempts.lock().unwrap();
    let Some(attempt) = attempts.get_mut(&enroll) else {
        return message(StatusCode::NOT_FOUND, NO_ACTIVE_QUIZ);
    };
    settle_expiry(attempt, &state.store, now);

    if let Some(result) = attempt.submit(trigger, now) {
        if let Err(e) = state.store.append_result(result) {
            tracing::error!("Could not persist quiz result: {e}");
            // Reopen the attempt so a later trigger can submit again;
            // otherwise the result record would be lost for good.
            attempt.revert_submission();
            return message(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error.");
        }
    }
    json(StatusCode::OK, &attempt.view(now))
}
