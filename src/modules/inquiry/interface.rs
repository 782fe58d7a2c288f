use async_trait::async_trait;

use super::model::{Inquiry, InquiryStatus};
use crate::error::Result;

#[async_trait]
pub trait InquiryRepository: Send + Sync {
    async fn create(&self, inquiry: &Inquiry) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Inquiry>>;

    /// Newest first.
    async fn list(&self) -> Result<Vec<Inquiry>>;

    /// Any status may follow any other.
    async fn update_status(&self, id: &str, status: InquiryStatus) -> Result<()>;
}
