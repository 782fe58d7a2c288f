use async_trait::async_trait;
use sqlx::{MySql, Pool};

use super::interface::SeminarRepository;
use super::model::Seminar;
use crate::error::{conflict_on_duplicate, Result};

pub struct SeminarCrud {
    pool: Pool<MySql>,
}

impl SeminarCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SeminarRepository for SeminarCrud {
    async fn create(&self, seminar: &Seminar) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO seminars (id, title, description, date, time, duration_minutes, location,
                                  price, capacity, status, image_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&seminar.id)
        .bind(&seminar.title)
        .bind(&seminar.description)
        .bind(seminar.date)
        .bind(seminar.time)
        .bind(seminar.duration_minutes)
        .bind(&seminar.location)
        .bind(seminar.price)
        .bind(seminar.capacity)
        .bind(seminar.status.as_str())
        .bind(&seminar.image_url)
        .bind(seminar.created_at)
        .bind(seminar.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, "Seminar already exists"))?;

        Ok(())
    }

    async fn update(&self, seminar: &Seminar) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE seminars
            SET title = ?, description = ?, date = ?, time = ?, duration_minutes = ?,
                location = ?, price = ?, capacity = ?, status = ?, image_url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&seminar.title)
        .bind(&seminar.description)
        .bind(seminar.date)
        .bind(seminar.time)
        .bind(seminar.duration_minutes)
        .bind(&seminar.location)
        .bind(seminar.price)
        .bind(seminar.capacity)
        .bind(seminar.status.as_str())
        .bind(&seminar.image_url)
        .bind(seminar.updated_at)
        .bind(&seminar.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM seminars WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Seminar>> {
        let seminar = sqlx::query_as::<_, Seminar>("SELECT * FROM seminars WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(seminar)
    }

    async fn list(&self) -> Result<Vec<Seminar>> {
        let seminars = sqlx::query_as::<_, Seminar>("SELECT * FROM seminars ORDER BY date, time")
            .fetch_all(&self.pool)
            .await?;
        Ok(seminars)
    }
}
