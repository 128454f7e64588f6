use crate::error::{Result, ServiceError};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use dossier::{CoverLetterRequest, CvRequest, InvalidPayloadError};
use serde_json::Value;

/// A body that is empty or not JSON carries no `data` at all.
fn parse_body(body: &[u8]) -> std::result::Result<Value, dossier::Error> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Request body is not JSON: {}", e);
        InvalidPayloadError::MissingData.into()
    })
}

fn pdf_response(pdf: Vec<u8>, filename: &str) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, format!("inline; filename=\"{}\"", filename)),
        ],
        pdf,
    )
}

#[tracing::instrument(skip_all)]
pub async fn render_cv(State(state): State<AppState>, body: Bytes) -> Result<impl IntoResponse> {
    let request = CvRequest::from_envelope(&parse_body(&body)?).map_err(dossier::Error::from)?;
    tracing::info!("CV render request for '{}'", request.data.full_name);

    let _permit = state
        .render_permits
        .acquire()
        .await
        .map_err(|_| ServiceError::ServiceOverloaded)?;
    let pdf = state.renderer.render_cv(&request).await?;

    tracing::info!("CV rendered ({} bytes)", pdf.len());
    Ok(pdf_response(pdf, "cv.pdf"))
}

#[tracing::instrument(skip_all)]
pub async fn render_cover_letter(State(state): State<AppState>, body: Bytes) -> Result<impl IntoResponse> {
    let request = CoverLetterRequest::from_envelope(&parse_body(&body)?).map_err(dossier::Error::from)?;
    tracing::info!("Cover letter render request for '{}'", request.data.applicant.full_name);

    let _permit = state
        .render_permits
        .acquire()
        .await
        .map_err(|_| ServiceError::ServiceOverloaded)?;
    let pdf = state.renderer.render_cover_letter(&request).await?;

    tracing::info!("Cover letter rendered ({} bytes)", pdf.len());
    Ok(pdf_response(pdf, "cover-letter.pdf"))
}
