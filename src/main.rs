use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Method;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use crate::state::AppState;
use crate::store::Store;

mod config;
mod endpoints;
mod model;
mod quiz;
mod registration;
mod report;
mod security;
mod state;
mod store;

const OK_JSON: &'static str = r#"{ "message": "OK" }"#;

#[tokio::main]
async fn main() {
    // Begin logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).unwrap();

    let config = config::load();

    // Create the CORS layer so the quiz frontend can be served from anywhere
    // Allow GET, POST, and OPTIONS methods
    // Allow Auth and content-type headers
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_origin(AllowOrigin::any());

    // Open the key-value store, aborting start-up if the directory is unusable
    let store = match Store::open(&config.data_dir) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("{}", e);
            return;
        }
    };

    info!("Store opened at {}", config.data_dir);

    let state = AppState::new(store);

    // Spawn the persistent countdown sweep so abandoned attempts still
    // submit when their time runs out
    tokio::spawn(state::expiry_sweep(state.clone()));

    let app = endpoints::router(state).layer(cors);

    // Serve the application, aborting start-up on an unusable bind address
    let addr = match config.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("{}", e);
            return;
        }
    };
    info!("Listening on {}", addr);
    let server = axum_server::bind(addr);
    server.serve(app.into_make_service()).await.unwrap();
}
