use crate::error::AppError;
use crate::models::{NewSubmission, Submission};
use crate::state::SharedState;

use super::fields::ValidatedSubmission;

/// Upload the photo, then store the record pointing at it.
///
/// If the insert fails the uploaded asset is deleted again before the error is
/// returned, so a failed submission leaves nothing behind in either place.
pub async fn run(
    state: &SharedState,
    submission: ValidatedSubmission,
) -> Result<Submission, AppError> {
    let uploaded = state.uploader.upload(&submission.photo).await?;

    let new = NewSubmission {
        contact_handle: submission.contact_handle,
        photo_url: uploaded.url,
        latitude: submission.latitude,
        longitude: submission.longitude,
    };

    match state.store.insert(&new).await {
        Ok(stored) => {
            tracing::info!("Stored submission {} ({})", stored.id, uploaded.asset_id);
            Ok(stored)
        }
        Err(e) => {
            tracing::warn!("Insert failed, removing uploaded photo {}", uploaded.asset_id);
            if let Err(cleanup) = state.uploader.delete(&uploaded.asset_id).await {
                tracing::error!(
                    "Failed to remove orphaned photo {}: {cleanup}",
                    uploaded.asset_id
                );
            }
            Err(e)
        }
    }
}
