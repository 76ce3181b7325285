//! The teacher-console gate. A single shared password compared in
//! plaintext; this is a low-assurance UI gate for a classroom session, not
//! an authentication system, and it protects nothing outside this process.

use axum::{
    body::Body,
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

pub const TEACHER_PASSWORD: &str = "UPLHOD123";

pub fn password_matches(candidate: &str) -> bool {
    candidate == TEACHER_PASSWORD
}

/// Layer over every `/api/teacher/*` route except the login probe. The
/// password travels in the Authorization header.
pub async fn handle_teacher_auth(request: axum::http::Request<Body>, next: Next) -> Response<Body> {
    let Some(auth_header) = request.headers().get(&AUTHORIZATION) else {
        return Response::builder()
            .status(StatusCode::UNAUTHORIZED)
            .body("Incorrect password! Access denied.".into())
            .unwrap();
    };

    match auth_header.to_str() {
        Ok(candidate) if password_matches(candidate) => next.run(request).await,
        _ => Response::builder()
            .status(StatusCode::UNAUTHORIZED)
            .body("Incorrect password! Access denied.".into())
            .unwrap(),
    }
}
