use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySql, Pool};

use super::interface::InquiryRepository;
use super::model::{Inquiry, InquiryStatus};
use crate::error::Result;

pub struct InquiryCrud {
    pool: Pool<MySql>,
}

impl InquiryCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InquiryRepository for InquiryCrud {
    async fn create(&self, inquiry: &Inquiry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO inquiries (id, name, email, phone, inquiry_type, subject, message,
                                   status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&inquiry.id)
        .bind(&inquiry.name)
        .bind(&inquiry.email)
        .bind(&inquiry.phone)
        .bind(inquiry.inquiry_type.as_str())
        .bind(&inquiry.subject)
        .bind(&inquiry.message)
        .bind(inquiry.status.as_str())
        .bind(inquiry.created_at)
        .bind(inquiry.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Inquiry>> {
        let inquiry = sqlx::query_as::<_, Inquiry>("SELECT * FROM inquiries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(inquiry)
    }

    async fn list(&self) -> Result<Vec<Inquiry>> {
        let inquiries =
            sqlx::query_as::<_, Inquiry>("SELECT * FROM inquiries ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(inquiries)
    }

    async fn update_status(&self, id: &str, status: InquiryStatus) -> Result<()> {
        sqlx::query("UPDATE inquiries SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
