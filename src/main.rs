// src/main.rs
use actix_files::Files;
use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use anyhow::Context;
use log::info;
use std::sync::Arc;

use veritas_lens::services::{GeminiAnalyzer, PromptProfile};
use veritas_lens::{AppState, api_scope};

struct ServerConfig {
    api_key: String,
    model: Option<String>,
    bind_addr: String,
}

impl ServerConfig {
    fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            api_key: std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY must be set")?,
            model: std::env::var("GEMINI_MODEL").ok(),
            bind_addr: std::env::var("VERITAS_BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        })
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting Veritas Lens service...");

    let config = ServerConfig::from_env()?;
    let profile = PromptProfile::forensic_v1(config.model.clone());
    info!("using model {} (profile {})", profile.model, profile.version);

    let analyzer = Arc::new(GeminiAnalyzer::new(config.api_key.clone(), profile));
    let app_state = AppState::new(analyzer);

    info!("Starting HTTP server on {}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .service(api_scope())
            .route("/health", web::get().to(health_check))
            .service(Files::new("/", "./static").index_file("index.html"))
    })
    .bind(&config.bind_addr)?
    .run()
    .await?;

    Ok(())
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "veritas-lens",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
