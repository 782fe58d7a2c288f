use async_trait::async_trait;
use sqlx::{MySql, Pool};

use super::interface::BlogRepository;
use super::model::Blog;
use crate::error::{conflict_on_duplicate, Result};

const DUPLICATE_SLUG: &str = "A post with this slug already exists";

pub struct BlogCrud {
    pool: Pool<MySql>,
}

impl BlogCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlogRepository for BlogCrud {
    async fn create(&self, blog: &Blog) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO blogs (id, title, slug, excerpt, content, cover_image_url, author_name,
                               published, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&blog.id)
        .bind(&blog.title)
        .bind(&blog.slug)
        .bind(&blog.excerpt)
        .bind(&blog.content)
        .bind(&blog.cover_image_url)
        .bind(&blog.author_name)
        .bind(blog.published)
        .bind(blog.created_at)
        .bind(blog.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, DUPLICATE_SLUG))?;

        Ok(())
    }

    async fn update(&self, blog: &Blog) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE blogs
            SET title = ?, slug = ?, excerpt = ?, content = ?, cover_image_url = ?,
                author_name = ?, published = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&blog.title)
        .bind(&blog.slug)
        .bind(&blog.excerpt)
        .bind(&blog.content)
        .bind(&blog.cover_image_url)
        .bind(&blog.author_name)
        .bind(blog.published)
        .bind(blog.updated_at)
        .bind(&blog.id)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, DUPLICATE_SLUG))?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Blog>> {
        let blog = sqlx::query_as::<_, Blog>("SELECT * FROM blogs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(blog)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Blog>> {
        let blog = sqlx::query_as::<_, Blog>("SELECT * FROM blogs WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(blog)
    }

    async fn list(&self, published_only: bool) -> Result<Vec<Blog>> {
        let sql = if published_only {
            "SELECT * FROM blogs WHERE published = TRUE ORDER BY created_at DESC"
        } else {
            "SELECT * FROM blogs ORDER BY created_at DESC"
        };
        let blogs = sqlx::query_as::<_, Blog>(sql).fetch_all(&self.pool).await?;
        Ok(blogs)
    }
}
