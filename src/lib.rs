// src/lib.rs
pub mod errors;
pub mod handlers;
pub mod models;
pub mod report;
pub mod services;
pub mod workflow;

use crate::services::{ForensicAnalyzer, ImageEncoder, MAX_UPLOAD_BYTES};
use crate::workflow::WorkflowController;
use actix_web::{Scope, web};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct AppState {
    controller: Arc<Mutex<WorkflowController>>,
    pub analyzer: Arc<dyn ForensicAnalyzer>,
    pub encoder: Arc<ImageEncoder>,
}

impl AppState {
    pub fn new(analyzer: Arc<dyn ForensicAnalyzer>) -> Self {
        Self {
            controller: Arc::new(Mutex::new(WorkflowController::new())),
            analyzer,
            encoder: Arc::new(ImageEncoder::new()),
        }
    }

    /// The workflow lock is only ever held across synchronous sections,
    /// never across an await.
    pub fn controller(&self) -> MutexGuard<'_, WorkflowController> {
        self.controller.lock().expect("workflow state lock poisoned")
    }
}

/// API route table, shared by the binary and the integration tests.
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        // Data URIs inflate ~4/3 over the raw 10 MiB ceiling.
        .app_data(web::JsonConfig::default().limit(MAX_UPLOAD_BYTES * 2))
        .route("/analyze", web::post().to(handlers::analyze_upload))
        .route("/analyze/encoded", web::post().to(handlers::analyze_encoded))
        .route("/status", web::get().to(handlers::get_status))
        .route("/report", web::get().to(handlers::get_report))
        .route("/preview/{token}", web::get().to(handlers::get_preview))
        .route("/reset", web::post().to(handlers::reset))
}
