use sqlx::{PgPool, Postgres, Transaction};

use crate::auth::repo_types::{NewUser, User};

impl User {
    /// Find a user by id.
    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, image_url, bio, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Find a user by username.
    pub async fn find_by_username(db: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, image_url, bio, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    pub async fn insert_tx(
        tx: &mut Transaction<'_, Postgres>,
        new: &NewUser,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, image_url, bio)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, image_url, bio, created_at
            "#,
        )
        .bind(&new.username)
        .bind(&new.password_hash)
        .bind(&new.image_url)
        .bind(&new.bio)
        .fetch_one(&mut **tx)
        .await
    }

    /// Remove the user and everything it owns. Returns false if no such user.
    pub async fn delete_cascade_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query("DELETE FROM recipes WHERE user_id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(deleted.rows_affected() > 0)
    }
}
