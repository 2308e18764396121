use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Admin;

// ==============================================================================
// Admin Account Queries
// ==============================================================================

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Admin>, sqlx::Error> {
    sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_active_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<Admin>, sqlx::Error> {
    sqlx::query_as::<_, Admin>(
        "SELECT * FROM admins WHERE username = $1 AND is_active = TRUE",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn find_active_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<Admin>, sqlx::Error> {
    sqlx::query_as::<_, Admin>(
        "SELECT * FROM admins WHERE email = $1 AND is_active = TRUE",
    )
    .bind(email.trim().to_lowercase())
    .fetch_optional(pool)
    .await
}

/// Existence check used by registration to keep username/email unique
/// before hitting the DB constraints.
pub async fn exists_by_username_or_email(
    pool: &PgPool,
    username: &str,
    email: &str,
) -> Result<bool, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM admins WHERE username = $1 OR email = $2",
    )
    .bind(username)
    .bind(email.trim().to_lowercase())
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn insert_admin(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
    full_name: &str,
) -> Result<Admin, sqlx::Error> {
    sqlx::query_as::<_, Admin>(
        r#"
        INSERT INTO admins (username, email, password_hash, full_name)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(username)
    .bind(email.trim().to_lowercase())
    .bind(password_hash)
    .bind(full_name)
    .fetch_one(pool)
    .await
}

pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE admins SET last_login = NOW() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Persist the reset-code triplet exactly as held on the model, keeping
/// the both-set-or-both-null invariant in one statement.
pub async fn save_reset_fields(pool: &PgPool, admin: &Admin) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE admins
        SET reset_code = $2,
            reset_code_expires_at = $3,
            reset_code_attempts = $4
        WHERE id = $1
        "#,
    )
    .bind(admin.id)
    .bind(&admin.reset_code)
    .bind(admin.reset_code_expires_at)
    .bind(admin.reset_code_attempts)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_password(
    pool: &PgPool,
    id: Uuid,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE admins SET password_hash = $2 WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
    Ok(())
}
