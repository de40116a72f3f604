use sqlx::{PgPool, Postgres, Transaction};

use crate::recipes::repo_types::{NewRecipe, RecipeWithOwner};

const SELECT_WITH_OWNER: &str = r#"
    SELECT r.id, r.title, r.instructions, r.minutes_to_complete, r.user_id, r.created_at,
           u.username AS owner_username,
           u.image_url AS owner_image_url,
           u.bio AS owner_bio
      FROM recipes r
      JOIN users u ON u.id = r.user_id
"#;

pub async fn list_all(db: &PgPool) -> Result<Vec<RecipeWithOwner>, sqlx::Error> {
    let sql = format!("{SELECT_WITH_OWNER} ORDER BY r.id ASC");
    sqlx::query_as::<_, RecipeWithOwner>(&sql).fetch_all(db).await
}

/// Insert a recipe and read it back with its owner, inside the caller's transaction.
pub async fn insert_tx(
    tx: &mut Transaction<'_, Postgres>,
    new: &NewRecipe,
) -> Result<RecipeWithOwner, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO recipes (title, instructions, minutes_to_complete, user_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(&new.title)
    .bind(&new.instructions)
    .bind(new.minutes_to_complete)
    .bind(new.user_id)
    .fetch_one(&mut **tx)
    .await?;

    let sql = format!("{SELECT_WITH_OWNER} WHERE r.id = $1");
    sqlx::query_as::<_, RecipeWithOwner>(&sql)
        .bind(id)
        .fetch_one(&mut **tx)
        .await
}
