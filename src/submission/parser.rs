use std::collections::HashMap;

use axum::http::HeaderMap;
use bytes::Bytes;

/// Multipart field carrying the image.
pub const PHOTO_FIELD: &str = "photo";

/// A submission body as it arrived, before any validation.
#[derive(Debug, Default)]
pub struct RawForm {
    pub fields: HashMap<String, String>,
    pub photo: Option<RawFile>,
}

#[derive(Debug)]
pub struct RawFile {
    pub bytes: Bytes,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

impl RawForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Parse multipart form data using multer.
///
/// Text parts land in `fields`; the `photo` part is kept as raw bytes. Other
/// file parts are skipped without being read.
pub async fn parse_multipart(headers: &HeaderMap, body: Bytes) -> Result<RawForm, String> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut form = RawForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == PHOTO_FIELD {
            if form.photo.is_some() {
                return Err("Only one photo may be attached".to_string());
            }
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(|m| m.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| format!("Photo read error: {e}"))?;
            form.photo = Some(RawFile {
                bytes,
                file_name,
                content_type,
            });
        } else if field.file_name().is_some() {
            continue;
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| format!("Field read error: {e}"))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}
