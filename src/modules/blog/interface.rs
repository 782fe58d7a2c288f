use async_trait::async_trait;

use super::model::Blog;
use crate::error::Result;

#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// A duplicate slug is a conflict.
    async fn create(&self, blog: &Blog) -> Result<()>;

    /// A slug taken by another post is a conflict.
    async fn update(&self, blog: &Blog) -> Result<()>;

    /// Returns false when no post has this id.
    async fn delete(&self, id: &str) -> Result<bool>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Blog>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Blog>>;

    /// Newest first; drafts are skipped when `published_only` is set.
    async fn list(&self, published_only: bool) -> Result<Vec<Blog>>;
}
