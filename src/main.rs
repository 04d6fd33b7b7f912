use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sketchguess_rs::{api, websocket, words::WordStore, AppState};

const DEFAULT_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_WORD_LIST: &str = "word-list.csv";

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sketchguess=info,sketchguess_rs=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load the word source once; the server is useless without it.
    let word_list =
        std::env::var("SKETCHGUESS_WORD_LIST").unwrap_or_else(|_| DEFAULT_WORD_LIST.into());
    let word_store = match WordStore::load(&word_list) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("unable to load word list {}: {}", word_list, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Loaded {} words from {}", word_store.len(), word_list);

    let state = AppState::new(word_store);

    // Build router
    let app = Router::new()
        .route("/healthz", get(api::healthz))
        .route("/words", get(api::get_random_words))
        .route("/ws/:room_id", get(websocket::handler::ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Bind to address
    let addr: SocketAddr = std::env::var("SKETCHGUESS_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.into())
        .parse()
        .expect("invalid listen address");
    tracing::info!("🎨 Sketchguess server running on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
