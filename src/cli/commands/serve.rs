//! HTTP API server for integration with external UIs.
//!
//! The chat UI itself is out of scope; this exposes the answer pipeline as
//! JSON endpoints. Conversations are isolated per caller-supplied session
//! id, while the index and API clients are shared read-only.

use crate::assistant::Assistant;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::rag::{Conversation, Turn};
use crate::vector_store::VectorStore;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    assistant: Assistant,
    sessions: Mutex<HashMap<String, Conversation>>,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'hoidap doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let assistant = Assistant::open(&settings)?;

    let state = Arc::new(AppState {
        assistant,
        sessions: Mutex::new(HashMap::new()),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/ask", post(ask))
        .route("/chat", post(chat))
        .route("/chat/reset", post(chat_reset))
        .route("/sources", get(list_sources))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("hoidap API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Ask (one-shot)", "POST /ask");
    Output::kv("Chat (session)", "POST /chat");
    Output::kv("Reset session", "POST /chat/reset");
    Output::kv("List Sources", "GET  /sources");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AskRequest {
    question: String,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
    sources: Vec<SourceInfo>,
}

#[derive(Serialize)]
struct SourceInfo {
    source: String,
    score: f32,
    content: String,
}

#[derive(Deserialize)]
struct ChatRequest {
    session_id: String,
    message: String,
}

#[derive(Serialize)]
struct ChatResponse {
    answer: String,
    turns: usize,
}

#[derive(Deserialize)]
struct ResetRequest {
    session_id: String,
}

#[derive(Serialize)]
struct SourcesResponse {
    sources: Vec<IndexedSourceInfo>,
    total_chunks: u32,
}

#[derive(Serialize)]
struct IndexedSourceInfo {
    source: String,
    chunk_count: u32,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// One-shot question answering, no session state.
///
/// Failures follow the answer contract: a 200 response whose answer text
/// starts with the warning marker, not a structured error object.
async fn ask(State(state): State<Arc<AppState>>, Json(req): Json<AskRequest>) -> impl IntoResponse {
    let mut conversation = Conversation::new();
    conversation.push(Turn::user(&req.question));

    match state.assistant.ask(&conversation, &req.question).await {
        Ok(response) => Json(AskResponse {
            answer: response.answer,
            sources: response
                .sources
                .into_iter()
                .map(|s| SourceInfo {
                    source: s.chunk.source,
                    score: s.score,
                    content: s.chunk.content,
                })
                .collect(),
        })
        .into_response(),
        Err(e) => Json(AskResponse {
            answer: crate::rag::answer::error_message(&e),
            sources: Vec::new(),
        })
        .into_response(),
    }
}

/// Session-scoped chat. Conversations are keyed by session id and created
/// on first use; a failed generation still records the turn and the
/// session continues.
async fn chat(State(state): State<Arc<AppState>>, Json(req): Json<ChatRequest>) -> impl IntoResponse {
    let mut sessions = state.sessions.lock().await;
    let conversation = sessions.entry(req.session_id.clone()).or_default();

    let answer = state.assistant.respond(conversation, &req.message).await;
    let turns = conversation.len();

    Json(ChatResponse { answer, turns }).into_response()
}

/// Clear a session's conversation entirely.
async fn chat_reset(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResetRequest>,
) -> impl IntoResponse {
    let mut sessions = state.sessions.lock().await;
    if let Some(conversation) = sessions.get_mut(&req.session_id) {
        conversation.clear();
    }

    Json(serde_json::json!({ "status": "reset" }))
}

async fn list_sources(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.assistant.store().list_sources().await {
        Ok(sources) => {
            let total_chunks = sources.iter().map(|s| s.chunk_count).sum();
            Json(SourcesResponse {
                sources: sources
                    .into_iter()
                    .map(|s| IndexedSourceInfo {
                        source: s.source,
                        chunk_count: s.chunk_count,
                    })
                    .collect(),
                total_chunks,
            })
            .into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}
