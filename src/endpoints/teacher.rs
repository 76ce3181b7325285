//! Teacher-console endpoints: the password probe, question authoring, and
//! the read views over students and results.

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Response, StatusCode, header::CONTENT_TYPE},
};

use crate::{
    OK_JSON,
    endpoints::{json, message},
    model::{question::Question, request::ClientRequest},
    report, security,
    state::SharedState,
};

/// Password probe for the console UI. The real gate is the middleware
/// layer; this only lets the frontend verify a password before storing it.
pub async fn login(Json(client_req): Json<ClientRequest>) -> Response<Body> {
    match client_req.password {
        Some(password) if security::password_matches(&password) => Response::builder()
            .status(StatusCode::OK)
            .body(OK_JSON.into())
            .unwrap(),
        _ => message(StatusCode::UNAUTHORIZED, "Incorrect password! Access denied."),
    }
}

/// Appends a question to the bank. An incomplete form rejects the whole
/// question; no partial write occurs.
pub async fn add_question(
    State(state): State<SharedState>,
    Json(client_req): Json<ClientRequest>,
) -> Response<Body> {
    let Some((question, options, answer, marks)) = client_req.get_new_question() else {
        return message(StatusCode::BAD_REQUEST, "Please fill all fields correctly!");
    };

    let question = match Question::from_form(&question, &options, answer, marks) {
        Ok(question) => question,
        Err(e) => return message(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    if let Err(e) = state.store.append_question(question) {
        tracing::error!("{e}");
        return message(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error.");
    }

    tracing::info!("Question added to the bank");
    message(StatusCode::OK, "Question added successfully!")
}

/// The authored question bank, for the console dashboard.
pub async fn list_questions(State(state): State<SharedState>) -> Response<Body> {
    match state.store.questions() {
        Ok(questions) => json(StatusCode::OK, &questions),
        Err(e) => {
            tracing::error!("{e}");
            message(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error.")
        }
    }
}

pub async fn list_students(State(state): State<SharedState>) -> Response<Body> {
    match state.store.students() {
        Ok(students) => json(StatusCode::OK, &students),
        Err(e) => {
            tracing::error!("{e}");
            message(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error.")
        }
    }
}

/// Count, average percentage, and the full listing sorted descending by
/// percentage.
pub async fn results(State(state): State<SharedState>) -> Response<Body> {
    match state.store.results() {
        Ok(results) => json(StatusCode::OK, &report::summarize(&results)),
        Err(e) => {
            tracing::error!("{e}");
            message(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error.")
        }
    }
}

/// CSV download of the result log. Refused while the log is empty.
pub async fn export_results(State(state): State<SharedState>) -> Response<Body> {
    let results = match state.store.results() {
        Ok(results) => results,
        Err(e) => {
            tracing::error!("{e}");
            return message(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error.");
        }
    };

    match report::results_csv(&results) {
        Some(csv) => Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "text/csv; charset=utf-8")
            .header(
                "content-disposition",
                "attachment; filename=\"quiz_results.csv\"",
            )
            .body(csv.into())
            .unwrap(),
        None => message(StatusCode::NOT_FOUND, "No results available to download."),
    }
}
