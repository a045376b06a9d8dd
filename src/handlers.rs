// src/handlers.rs
use crate::errors::VeritasError;
use crate::models::UploadedImage;
use crate::report::render_report;
use crate::services::{MAX_UPLOAD_BYTES, RejectReason, strip_data_uri_prefix, validate_candidate};
use crate::AppState;
use actix_multipart::Multipart;
use actix_web::{Error, HttpResponse, web};
use bytes::BytesMut;
use futures_util::TryStreamExt;
use log::{error, info};
use serde::Deserialize;
use uuid::Uuid;

/// Submission body for clients that already hold a data URI (the canvas /
/// file-reader path).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedSubmission {
    pub data_uri: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

pub async fn analyze_upload(
    mut payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let mut field = match payload.try_next().await? {
        Some(field) => field,
        None => return Err(VeritasError::Validation("No file provided".to_string()).into()),
    };

    let filename = field
        .content_disposition()
        .get_filename()
        .unwrap_or("upload")
        .to_string();

    let mime_type = field
        .content_type()
        .map(|ct| ct.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let mut buf = BytesMut::new();
    while let Some(chunk) = field.try_next().await? {
        // Stop buffering as soon as the ceiling is passed; the rejection is
        // the same one the size validation produces.
        if buf.len() + chunk.len() > MAX_UPLOAD_BYTES {
            return Err(VeritasError::from(RejectReason::FileTooLarge).into());
        }
        buf.extend_from_slice(&chunk);
    }

    info!("received upload '{}' ({}, {} bytes)", filename, mime_type, buf.len());

    run_workflow(data, buf.to_vec(), mime_type).await
}

pub async fn analyze_encoded(
    body: web::Json<EncodedSubmission>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let submission = body.into_inner();
    let (declared, base64_body) = strip_data_uri_prefix(&submission.data_uri);

    let mime_type = submission
        .mime_type
        .clone()
        .or_else(|| declared.map(str::to_string))
        .unwrap_or_else(|| "application/octet-stream".to_string());

    // The exact byte count exists only after decoding; gate on the length
    // the base64 body implies.
    let estimated_size = base64_body.len() / 4 * 3;
    validate_candidate(&mime_type, estimated_size).map_err(VeritasError::from)?;

    let bytes = data.encoder.decode_base64(base64_body).map_err(|err| {
        error!("data URI decode failed: {}", err);
        err
    })?;

    run_workflow(data, bytes, mime_type).await
}

/// Drives one accepted candidate through the whole workflow: validation,
/// acceptance, encoding, the remote call, and the rendered report.
async fn run_workflow(
    data: web::Data<AppState>,
    bytes: Vec<u8>,
    mime_type: String,
) -> Result<HttpResponse, Error> {
    // Rejections here never touch the controller; the status flag stays
    // exactly where it was.
    validate_candidate(&mime_type, bytes.len()).map_err(VeritasError::from)?;

    let image = UploadedImage::new(bytes, mime_type.clone());

    // Accept -> encode -> mark analyzing all happen under one lock; only
    // the remote call suspends.
    let (attempt, encoded) = {
        let mut wf = data.controller();
        let attempt = wf.begin(image)?;

        let encode_result = wf
            .image()
            .ok_or_else(|| VeritasError::ReadFailure("upload buffer missing".to_string()))
            .and_then(|img| data.encoder.encode(&img.data));

        match encode_result {
            Ok(encoded) => {
                wf.mark_analyzing(attempt);
                (attempt, encoded)
            }
            Err(err) => {
                error!("file read failed: {}", err);
                wf.fail_read(attempt);
                return Err(err.into());
            }
        }
    };

    info!(
        "analyzing {} image ({}x{})",
        mime_type, encoded.width, encoded.height
    );

    let outcome = data.analyzer.analyze(&encoded.base64, &mime_type).await;

    let mut wf = data.controller();
    match outcome {
        Ok(result) => {
            let report = render_report(&result, wf.preview_url());
            if !wf.complete(attempt, result) {
                // A reset landed while the request was in flight; the newer
                // state stays untouched.
                return Err(VeritasError::AttemptSuperseded.into());
            }
            Ok(HttpResponse::Ok().json(report))
        }
        Err(err) => {
            error!("forensic analysis failed: {}", err);
            wf.fail_analysis(attempt);
            Err(err.into())
        }
    }
}

pub async fn get_status(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(data.controller().snapshot())
}

pub async fn get_report(data: web::Data<AppState>) -> Result<HttpResponse, Error> {
    let wf = data.controller();
    match wf.result() {
        Some(result) => {
            let report = render_report(result, wf.preview_url());
            Ok(HttpResponse::Ok().json(report))
        }
        None => Err(VeritasError::NotFound("no completed analysis".to_string()).into()),
    }
}

pub async fn get_preview(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let token = path.into_inner();
    let wf = data.controller();
    match wf.preview(&token) {
        Some((mime, bytes)) => Ok(HttpResponse::Ok()
            .content_type(mime.to_string())
            .body(bytes.to_vec())),
        None => Err(VeritasError::NotFound("unknown preview token".to_string()).into()),
    }
}

pub async fn reset(data: web::Data<AppState>) -> HttpResponse {
    let mut wf = data.controller();
    wf.reset();
    info!("workflow reset to IDLE");
    HttpResponse::Ok().json(wf.snapshot())
}
