use crate::upload::{Photo, PhotoFormat};

use super::parser::RawForm;

/// Accepted names for the contact handle, in lookup order.
const CONTACT_FIELDS: [&str; 2] = ["contactHandle", "whatsapp"];

/// A submission that passed validation. Nothing has been uploaded or stored yet.
#[derive(Debug, Clone)]
pub struct ValidatedSubmission {
    pub contact_handle: String,
    pub latitude: f64,
    pub longitude: f64,
    pub photo: Photo,
}

/// Turn a raw form into a typed submission, collecting every problem found.
pub fn validate(form: RawForm) -> Result<ValidatedSubmission, Vec<String>> {
    let mut problems = Vec::new();

    let contact_handle = CONTACT_FIELDS
        .iter()
        .find_map(|name| form.field(name))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    if contact_handle.is_none() {
        problems.push("Missing required field: contactHandle".to_string());
    }

    let latitude = parse_coordinate(&form, "latitude", 90.0, &mut problems);
    let longitude = parse_coordinate(&form, "longitude", 180.0, &mut problems);

    let photo = match form.photo {
        None => {
            problems.push("Missing required photo".to_string());
            None
        }
        Some(file) if file.bytes.is_empty() => {
            problems.push("Photo is empty".to_string());
            None
        }
        Some(file) => {
            let format = file
                .content_type
                .as_deref()
                .and_then(PhotoFormat::from_content_type)
                .or_else(|| file.file_name.as_deref().and_then(PhotoFormat::from_file_name));
            match format {
                Some(format) => Some(Photo {
                    file_name: file
                        .file_name
                        .filter(|n| !n.trim().is_empty())
                        .unwrap_or_else(|| format!("photo.{}", format.extension())),
                    bytes: file.bytes,
                    format,
                }),
                None => {
                    problems.push("Photo must be a JPG or PNG image".to_string());
                    None
                }
            }
        }
    };

    match (contact_handle, latitude, longitude, photo) {
        (Some(contact_handle), Some(latitude), Some(longitude), Some(photo)) if problems.is_empty() => {
            Ok(ValidatedSubmission {
                contact_handle,
                latitude,
                longitude,
                photo,
            })
        }
        _ => Err(problems),
    }
}

fn parse_coordinate(form: &RawForm, name: &str, limit: f64, problems: &mut Vec<String>) -> Option<f64> {
    let Some(raw) = form.field(name).map(str::trim).filter(|s| !s.is_empty()) else {
        problems.push(format!("Missing required field: {name}"));
        return None;
    };

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.abs() <= limit => Some(value),
        Ok(_) => {
            problems.push(format!("{name} out of range: must be between -{limit} and {limit}"));
            None
        }
        Err(_) => {
            problems.push(format!("Invalid number format: {name}"));
            None
        }
    }
}
