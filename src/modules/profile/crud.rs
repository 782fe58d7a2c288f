use async_trait::async_trait;
use sqlx::{MySql, Pool};

use super::interface::ProfileRepository;
use super::model::{Child, Profile};
use crate::error::Result;

pub struct ProfileCrud {
    pool: Pool<MySql>,
}

impl ProfileCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for ProfileCrud {
    async fn find_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT user_id, address, city, pincode, education, relation,
                   counterpart_name, counterpart_phone, updated_at
            FROM profiles WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn find_children(&self, user_id: &str) -> Result<Vec<Child>> {
        let children = sqlx::query_as::<_, Child>(
            "SELECT * FROM children WHERE user_id = ? ORDER BY created_at, name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(children)
    }

    async fn save(&self, profile: &Profile, children: &[Child]) -> Result<()> {
        let details = &profile.details;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, address, city, pincode, education, relation,
                                  counterpart_name, counterpart_phone, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                address = VALUES(address),
                city = VALUES(city),
                pincode = VALUES(pincode),
                education = VALUES(education),
                relation = VALUES(relation),
                counterpart_name = VALUES(counterpart_name),
                counterpart_phone = VALUES(counterpart_phone),
                updated_at = VALUES(updated_at)
            "#,
        )
        .bind(&profile.user_id)
        .bind(&details.address)
        .bind(&details.city)
        .bind(&details.pincode)
        .bind(&details.education)
        .bind(&details.relation)
        .bind(&details.counterpart_name)
        .bind(&details.counterpart_phone)
        .bind(profile.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM children WHERE user_id = ?")
            .bind(&profile.user_id)
            .execute(&mut *tx)
            .await?;

        for child in children {
            sqlx::query(
                r#"
                INSERT INTO children (id, user_id, name, age, gender, class_name, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&child.id)
            .bind(&child.user_id)
            .bind(&child.name)
            .bind(child.age)
            .bind(&child.gender)
            .bind(&child.class_name)
            .bind(child.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
