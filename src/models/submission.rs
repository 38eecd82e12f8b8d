use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub contact_handle: String,
    pub photo_url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

/// A validated submission whose photo has already reached the upload sink.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub contact_handle: String,
    pub photo_url: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Map-facing projection of a [`Submission`]. Serialized into the admin page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "whatsapp")]
    pub contact_handle: String,
    #[serde(rename = "photoUrl")]
    pub photo_url: String,
}

impl From<&Submission> for Marker {
    fn from(sub: &Submission) -> Self {
        Marker {
            lat: sub.latitude,
            lng: sub.longitude,
            contact_handle: sub.contact_handle.clone(),
            photo_url: sub.photo_url.clone(),
        }
    }
}
