//! Servidor web Axum para demonstração do reconhecimento de entidades
//! estruturadas: recebe texto via JSON e devolve os registros reconhecidos.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use ree_core::{recognize, Culture, EntityKind, ModelResult};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

#[derive(Deserialize)]
struct RecognizeRequest {
    text: String,
    kind: EntityKind,
    #[serde(default)]
    culture: Option<Culture>,
}

#[derive(Serialize)]
struct RecognizeResponse {
    results: Vec<ModelResult>,
    total: usize,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/recognize", post(recognize_handler))
        .route("/demo-texts", get(demo_texts_handler))
        .layer(cors);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("🚀 Servidor REE iniciado em http://localhost:3000");
    axum::serve(listener, app).await.unwrap();
}

/// Página mínima com instruções de uso da API
async fn index_handler() -> impl IntoResponse {
    Html(
        "<h1>ree-web</h1>\
         <p>POST /recognize com JSON <code>{\"text\": \"...\", \"kind\": \"number\", \"culture\": \"portuguese\"}</code></p>\
         <p>GET /demo-texts para exemplos.</p>",
    )
}

/// Reconhecimento via HTTP POST
async fn recognize_handler(Json(req): Json<RecognizeRequest>) -> impl IntoResponse {
    if req.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Texto vazio"})),
        )
            .into_response();
    }

    let culture = req.culture.unwrap_or(Culture::Portuguese);
    info!(kind = ?req.kind, chars = req.text.len(), "reconhecendo");

    let results = recognize(&req.text, req.kind, culture);
    let total = results.len();

    Json(RecognizeResponse { results, total }).into_response()
}

/// Textos de demonstração por família de entidade
async fn demo_texts_handler() -> impl IntoResponse {
    let texts: Vec<serde_json::Value> = demo_texts()
        .iter()
        .map(|(kind, text)| {
            serde_json::json!({
                "kind": kind,
                "text": text
            })
        })
        .collect();
    Json(texts)
}

fn demo_texts() -> Vec<(&'static str, &'static str)> {
    vec![
        ("number", "Comprei duzentos e cinco livros por 1.234,56 reais e li 3/4 deles."),
        ("number", "I have two dollars and 3 cents, plus pages 2-4 to read."),
        ("ordinal", "Ela chegou em 12º lugar, mas ele foi o penúltimo."),
        ("ordinal", "Take the second to last seat, then the twenty-first."),
        ("phone_number", "Ligue (11) 98765-4321 ou use a máscara XXX-XXX-1234."),
        ("email", "Escreva para contato@exemplo.com.br com cópia para dev@test.org."),
        ("url", "Veja https://exemplo.org/docs ou www.test.com para detalhes."),
        ("ip", "O servidor 192.168.0.1 responde; 999.1.1.1 não é um IP válido."),
    ]
}
