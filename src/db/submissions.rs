use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NewSubmission, Submission};

pub async fn create(pool: &PgPool, new: &NewSubmission) -> Result<Submission, sqlx::Error> {
    sqlx::query_as::<_, Submission>(
        "INSERT INTO submissions (id, contact_handle, photo_url, latitude, longitude)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&new.contact_handle)
    .bind(&new.photo_url)
    .bind(new.latitude)
    .bind(new.longitude)
    .fetch_one(pool)
    .await
}

/// All submissions, most recent first. Ids are v7 so they break ties within a timestamp.
pub async fn list_recent_first(pool: &PgPool) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(
        "SELECT * FROM submissions ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await
}
