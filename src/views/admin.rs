use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::error::AppError;
use crate::models::Marker;
use crate::state::SharedState;

const MAP_CENTER: (f64, f64) = (20.5937, 78.9629);
const MAP_ZOOM: u8 = 4;

#[derive(Template)]
#[template(path = "admin/map.html")]
struct MapTemplate {
    markers_json: String,
    maps_api_key: String,
    center_lat: f64,
    center_lng: f64,
    zoom: u8,
}

pub async fn map_page(State(state): State<SharedState>) -> Result<impl IntoResponse, AppError> {
    let submissions = state.store.list_recent_first().await?;
    let markers: Vec<Marker> = submissions.iter().map(Marker::from).collect();

    let template = MapTemplate {
        markers_json: markers_json(&markers)?,
        maps_api_key: state.config.maps_api_key.clone(),
        center_lat: MAP_CENTER.0,
        center_lng: MAP_CENTER.1,
        zoom: MAP_ZOOM,
    };
    Ok(Html(template.render()?))
}

/// Serialize markers for embedding inside a `<script>` element.
///
/// Characters that could close the element or break the JS string grammar are
/// written as unicode escapes; the JSON value is unchanged.
pub fn markers_json(markers: &[Marker]) -> Result<String, AppError> {
    let json = serde_json::to_string(markers)
        .map_err(|e| AppError::Internal(format!("Failed to serialize markers: {e}")))?;

    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    Ok(out)
}
