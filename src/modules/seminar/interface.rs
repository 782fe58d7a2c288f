use async_trait::async_trait;

use super::model::Seminar;
use crate::error::Result;

#[async_trait]
pub trait SeminarRepository: Send + Sync {
    async fn create(&self, seminar: &Seminar) -> Result<()>;

    async fn update(&self, seminar: &Seminar) -> Result<()>;

    /// Returns false when no seminar has this id.
    async fn delete(&self, id: &str) -> Result<bool>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Seminar>>;

    /// All seminars ordered by date and time.
    async fn list(&self) -> Result<Vec<Seminar>>;
}
