//! Endpoint handlers and the router. Handlers are grouped by role: the
//! public registration endpoint lives here, the quiz-taking endpoints in
//! `student`, and the password-gated console endpoints in `teacher`.

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{Response, StatusCode, header::CONTENT_TYPE},
    middleware::from_fn,
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;

use crate::{
    model::question::default_questions,
    model::request::ClientRequest,
    quiz::Attempt,
    registration::{self, RegistrationError},
    security,
    state::SharedState,
};

pub mod student;
pub mod teacher;

pub(crate) fn message(status: StatusCode, text: &str) -> Response<Body> {
    Response::builder()
        .status(status)
        .body(text.to_string().into())
        .unwrap()
}

pub(crate) fn json<T: Serialize>(status: StatusCode, value: &T) -> Response<Body> {
    let body = serde_json::to_string(value).unwrap();
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

/// Builds the full route table. Layers work outward like an onion: the
/// teacher layer is gated by the password middleware, the quiz and
/// registration layers are open.
pub fn router(state: SharedState) -> Router {
    let app = Router::new()
        .route("/api/teacher/add_question", post(teacher::add_question))
        .route("/api/teacher/questions", get(teacher::list_questions))
        .route("/api/teacher/students", get(teacher::list_students))
        .route("/api/teacher/results", get(teacher::results))
        .route("/api/teacher/results/export", get(teacher::export_results))
        .layer(from_fn(security::handle_teacher_auth));

    // The quiz layer. Attempts are keyed by the enrollment number issued at
    // registration; there is no way to start one except through /api/register.
    let app = app
        .route("/api/quiz/{enroll}", get(student::quiz_view))
        .route("/api/quiz/{enroll}/answer", post(student::select_answer))
        .route("/api/quiz/{enroll}/previous", post(student::previous_question))
        .route("/api/quiz/{enroll}/next", post(student::next_question))
        .route("/api/quiz/{enroll}/submit", post(student::submit_quiz))
        .route(
            "/api/quiz/{enroll}/visibility",
            post(student::report_visibility_loss),
        );

    app.route("/api/register", post(register))
        .route("/api/teacher/login", post(teacher::login))
        .with_state(state)
}

/// Registers a student and starts their quiz attempt in one step. The
/// question set is resolved here: the authored bank when it has questions,
/// otherwise the built-in default set.
pub async fn register(
    State(state): State<SharedState>,
    Json(client_req): Json<ClientRequest>,
) -> Response<Body> {
    let Some((name, enroll, email)) = client_req.get_registration() else {
        return message(
            StatusCode::BAD_REQUEST,
            &RegistrationError::MissingFields.to_string(),
        );
    };

    // Held for the whole registration so the roster check and the append
    // cannot interleave with another registration.
    let mut attempts = state.attempts.lock().unwrap();

    let student = match registration::register(&state.store, &name, &enroll, &email) {
        Ok(student) => student,
        Err(RegistrationError::Store(e)) => {
            tracing::error!("{e}");
            return message(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error.");
        }
        Err(e @ RegistrationError::Duplicate) => {
            return message(StatusCode::CONFLICT, &e.to_string());
        }
        Err(e @ RegistrationError::CapacityFull) => {
            return message(StatusCode::FORBIDDEN, &e.to_string());
        }
        Err(e) => return message(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    let questions = match state.store.questions() {
        Ok(questions) => questions,
        Err(e) => {
            tracing::error!("{e}");
            return message(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error.");
        }
    };
    let questions = if questions.is_empty() {
        default_questions()
    } else {
        questions
    };

    let now = Utc::now();
    let attempt = Attempt::start(student.clone(), questions, now);
    let view = attempt.view(now);
    attempts.insert(student.enroll.clone(), attempt);

    json(
        StatusCode::OK,
        &serde_json::json!({
            "message": "Login successful! Starting quiz...",
            "quiz": view,
        }),
    )
}
