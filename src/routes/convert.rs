//! CDR → PNG conversion endpoint.
//!
//! Accepts one CorelDRAW file via multipart/form-data, stages it under a
//! fresh uuid, runs headless Inkscape with a bounded wait, and returns the
//! rendered PNG. Staging files are removed on every exit path by the job's
//! `Drop` impl, so no request leaves anything behind in the staging
//! directories.

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use tracing::{debug, info, warn};

use crate::error::ServerError;
use crate::models::ConversionJob;
use crate::state::AppState;

/// Register conversion routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/convert", post(convert))
}

/// Convert an uploaded CDR document (`POST /convert`).
///
/// Request: multipart form with a single `file` field holding the document.
/// No content sniffing is performed; the staged copy is renamed to `.cdr`
/// so Inkscape's input-format detection does the rest.
///
/// Responses:
/// - 200, `image/png` body on success
/// - 400 `{"error": "No file uploaded"}` / `{"error": "No file selected"}`
/// - 500 with a failure-specific message (converter error, timeout,
///   missing output, or unexpected server error)
///
/// Every failure is terminal for the request; nothing is retried.
pub async fn convert(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ServerError> {
    debug!("received conversion request");

    // A request that is not well-formed multipart cannot carry a file part;
    // it gets the same JSON error as a multipart request without one, never
    // the extractor's plain-text rejection.
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!(error = %rejection, "request body is not multipart/form-data");
            return Err(ServerError::BadRequest("No file uploaded".into()));
        }
    };

    // Pull out the `file` part, ignoring any other fields. The size cap is
    // enforced while streaming chunks so an oversized upload is rejected
    // before it is fully buffered.
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to read multipart field: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(ServerError::BadRequest("No file selected".into()));
        }

        let mut data: Vec<u8> = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ServerError::BadRequest(format!("Failed to read file chunk: {e}")))?
        {
            data.extend_from_slice(&chunk);
            if data.len() > state.config.max_upload_bytes() {
                return Err(ServerError::BadRequest(format!(
                    "File too large: exceeds maximum of {}MB",
                    state.config.max_upload_size_mb
                )));
            }
        }

        debug!(
            file_name = %file_name,
            size_bytes = data.len(),
            "received file upload"
        );
        upload = Some((file_name, data));
        break;
    }

    let Some((file_name, data)) = upload else {
        return Err(ServerError::BadRequest("No file uploaded".into()));
    };

    let mut job = ConversionJob::new(&state.config.upload_dir, &state.config.output_dir);

    tokio::fs::write(job.input_path(), &data).await?;
    info!(
        job_id = %job.id(),
        original_name = %file_name,
        path = %job.input_path().display(),
        "file saved"
    );

    job.mark_running();
    info!(job_id = %job.id(), "starting inkscape conversion");
    let outcome = state
        .converter
        .rasterize(job.input_path(), job.output_path())
        .await?;

    if outcome.timed_out {
        job.mark_failed();
        warn!(job_id = %job.id(), killed = outcome.killed, "conversion timed out");
        return Err(ServerError::ConversionTimeout);
    }
    if !outcome.success() {
        job.mark_failed();
        warn!(
            job_id = %job.id(),
            exit_code = ?outcome.exit_code,
            "inkscape failed"
        );
        return Err(ServerError::ConversionFailed);
    }

    // Inkscape can exit zero without producing output in edge cases; report
    // that distinctly from a converter-reported failure. A stat error here
    // is not "missing output" and propagates as a server error instead.
    if !tokio::fs::try_exists(job.output_path()).await? {
        job.mark_failed();
        warn!(job_id = %job.id(), "inkscape exited cleanly but wrote no output");
        return Err(ServerError::OutputMissing);
    }

    // Read before the job drops and deletes the file.
    let png = tokio::fs::read(job.output_path()).await?;
    job.mark_succeeded();
    info!(
        job_id = %job.id(),
        status = ?job.status(),
        png_bytes = png.len(),
        "conversion successful"
    );

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "image/png")],
        png,
    )
        .into_response())
}

// ── Tests ────────────────────────────────────────────────────────────────────
