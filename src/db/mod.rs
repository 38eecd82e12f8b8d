pub mod submissions;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{NewSubmission, Submission};

/// Append-only storage for submissions. Handlers only ever insert or read.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn insert(&self, new: &NewSubmission) -> Result<Submission, AppError>;
    async fn list_recent_first(&self) -> Result<Vec<Submission>, AppError>;
}

pub struct PgSubmissionStore {
    pool: PgPool,
}

impl PgSubmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionStore for PgSubmissionStore {
    async fn insert(&self, new: &NewSubmission) -> Result<Submission, AppError> {
        Ok(submissions::create(&self.pool, new).await?)
    }

    async fn list_recent_first(&self) -> Result<Vec<Submission>, AppError> {
        Ok(submissions::list_recent_first(&self.pool).await?)
    }
}
