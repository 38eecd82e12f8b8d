use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};

use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::{fields, parser, pipeline};

pub async fn submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    // Media types are case-insensitive.
    if !content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("multipart/form-data")) {
        return Err(AppError::BadRequest(
            "Expected a multipart/form-data body".to_string(),
        ));
    }

    let raw = parser::parse_multipart(&headers, body)
        .await
        .map_err(AppError::BadRequest)?;

    let submission = fields::validate(raw).map_err(|problems| {
        tracing::debug!("Rejected submission: {:?}", problems);
        AppError::BadRequest(problems.join("; "))
    })?;

    pipeline::run(&state, submission).await?;

    Ok(StatusCode::OK)
}
