use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::education::UpdateCategoryRequest;
use crate::models::{EducationCategory, EducationSubcategory};

// ==============================================================================
// Education Category Queries
// ==============================================================================

pub async fn list_published(pool: &PgPool) -> Result<Vec<EducationCategory>, sqlx::Error> {
    sqlx::query_as::<_, EducationCategory>(
        r#"
        SELECT * FROM education_categories
        WHERE is_published = TRUE
        ORDER BY sort_order ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<EducationCategory>, sqlx::Error> {
    sqlx::query_as::<_, EducationCategory>(
        "SELECT * FROM education_categories ORDER BY sort_order ASC",
    )
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<EducationCategory>, sqlx::Error> {
    sqlx::query_as::<_, EducationCategory>(
        "SELECT * FROM education_categories WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_slug(
    pool: &PgPool,
    slug: &str,
) -> Result<Option<EducationCategory>, sqlx::Error> {
    sqlx::query_as::<_, EducationCategory>(
        "SELECT * FROM education_categories WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await
}

pub async fn find_published_by_slug(
    pool: &PgPool,
    slug: &str,
) -> Result<Option<EducationCategory>, sqlx::Error> {
    sqlx::query_as::<_, EducationCategory>(
        "SELECT * FROM education_categories WHERE slug = $1 AND is_published = TRUE",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await
}

pub async fn insert_category(
    pool: &PgPool,
    title: &str,
    slug: &str,
    description: Option<&str>,
    icon: Option<&str>,
    sort_order: i32,
) -> Result<EducationCategory, sqlx::Error> {
    sqlx::query_as::<_, EducationCategory>(
        r#"
        INSERT INTO education_categories (title, slug, description, icon, sort_order, subcategories)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(title)
    .bind(slug)
    .bind(description)
    .bind(icon)
    .bind(sort_order)
    .bind(Json(Vec::<EducationSubcategory>::new()))
    .fetch_one(pool)
    .await
}

pub async fn update_category_meta(
    pool: &PgPool,
    id: Uuid,
    req: &UpdateCategoryRequest,
) -> Result<Option<EducationCategory>, sqlx::Error> {
    let mut query_builder: QueryBuilder<Postgres> =
        QueryBuilder::new("UPDATE education_categories SET ");

    let mut separated = query_builder.separated(", ");
    let mut has_updates = false;

    if let Some(title) = &req.title {
        separated.push("title = ");
        separated.push_bind_unseparated(title.clone());
        has_updates = true;
    }
    if let Some(slug) = &req.slug {
        separated.push("slug = ");
        separated.push_bind_unseparated(slug.to_lowercase());
        has_updates = true;
    }
    if let Some(description) = &req.description {
        separated.push("description = ");
        separated.push_bind_unseparated(description.clone());
        has_updates = true;
    }
    if let Some(icon) = &req.icon {
        separated.push("icon = ");
        separated.push_bind_unseparated(icon.clone());
        has_updates = true;
    }
    if let Some(sort_order) = req.sort_order {
        separated.push("sort_order = ");
        separated.push_bind_unseparated(sort_order);
        has_updates = true;
    }
    if let Some(is_published) = req.is_published {
        separated.push("is_published = ");
        separated.push_bind_unseparated(is_published);
        has_updates = true;
    }

    if !has_updates {
        return find_by_id(pool, id).await;
    }

    query_builder.push(", updated_at = NOW() WHERE id = ");
    query_builder.push_bind(id);
    query_builder.push(" RETURNING *");

    query_builder
        .build_query_as::<EducationCategory>()
        .fetch_optional(pool)
        .await
}

/// All subtree edits (subcategories, articles, view counters) are a
/// whole-document write of the JSONB column.
pub async fn save_subcategories(
    pool: &PgPool,
    id: Uuid,
    subcategories: &[EducationSubcategory],
) -> Result<Option<EducationCategory>, sqlx::Error> {
    sqlx::query_as::<_, EducationCategory>(
        r#"
        UPDATE education_categories
        SET subcategories = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(Json(subcategories.to_vec()))
    .fetch_optional(pool)
    .await
}

pub async fn delete_category(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM education_categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
