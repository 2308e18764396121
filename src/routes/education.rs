use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AdminAuth;
use crate::db::education_queries;
use crate::errors::AppError;
use crate::models::education::{
    slugify, AddArticleRequest, AddSubcategoryRequest, ArticleSearchHit, BreadcrumbEntry,
    CreateCategoryRequest, UpdateArticleRequest, UpdateCategoryRequest, UpdateSubcategoryRequest,
};
use crate::models::{EducationArticle, EducationCategory, EducationSubcategory};
use crate::state::AppState;

const SEARCH_RESULT_LIMIT: usize = 20;

pub fn router() -> Router<AppState> {
    Router::new()
        // Public routes
        .route("/categories", get(list_categories))
        .route("/categories/:slug", get(get_category_by_slug))
        .route(
            "/articles/:category_slug/:subcategory_slug/:article_slug",
            get(get_article_by_slug),
        )
        .route("/search", get(search_articles))
        // Admin routes
        .route("/admin/categories", get(admin_list_categories))
        .route("/admin/categories", post(create_category))
        .route("/admin/categories/:id", put(update_category))
        .route("/admin/categories/:id", delete(delete_category))
        .route(
            "/admin/categories/:category_id/subcategories",
            post(add_subcategory),
        )
        .route(
            "/admin/categories/:category_id/subcategories/:subcategory_id",
            put(update_subcategory),
        )
        .route(
            "/admin/categories/:category_id/subcategories/:subcategory_id",
            delete(delete_subcategory),
        )
        .route(
            "/admin/categories/:category_id/subcategories/:subcategory_id/articles",
            post(add_article),
        )
        .route(
            "/admin/categories/:category_id/subcategories/:subcategory_id/articles/:article_id",
            put(update_article),
        )
        .route(
            "/admin/categories/:category_id/subcategories/:subcategory_id/articles/:article_id",
            delete(delete_article),
        )
}

// ==============================================================================
// Response DTOs
// ==============================================================================

#[derive(Debug, Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: Vec<EducationCategory>,
}

#[derive(Debug, Serialize)]
struct CategoryResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    category: EducationCategory,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    success: bool,
    message: String,
}

#[derive(Debug, Serialize)]
struct Breadcrumb {
    category: BreadcrumbEntry,
    subcategory: BreadcrumbEntry,
}

#[derive(Debug, Serialize)]
struct ArticleResponse {
    success: bool,
    article: EducationArticle,
    breadcrumb: Breadcrumb,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    success: bool,
    results: Vec<ArticleSearchHit>,
}

// ==============================================================================
// Public Handlers
// ==============================================================================

async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let categories = education_queries::list_published(&state.pool)
        .await?
        .into_iter()
        .map(EducationCategory::into_published_view)
        .collect();

    Ok(Json(CategoriesResponse { success: true, categories }))
}

async fn get_category_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryResponse>, AppError> {
    let category = education_queries::find_published_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    Ok(Json(CategoryResponse {
        success: true,
        message: None,
        category: category.into_published_view(),
    }))
}

/// Fetching an article counts as a view; the counter lives inside the
/// category document, so the whole subtree is written back.
async fn get_article_by_slug(
    State(state): State<AppState>,
    Path((category_slug, subcategory_slug, article_slug)): Path<(String, String, String)>,
) -> Result<Json<ArticleResponse>, AppError> {
    let category = education_queries::find_by_slug(&state.pool, &category_slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    let mut subcategories = category.subcategories.0.clone();

    let subcategory = subcategories
        .iter_mut()
        .find(|sub| sub.slug == subcategory_slug)
        .ok_or_else(|| AppError::NotFound("Subcategory not found".into()))?;
    let sub_breadcrumb = BreadcrumbEntry {
        title: subcategory.title.clone(),
        slug: subcategory.slug.clone(),
    };

    let article = subcategory
        .articles
        .iter_mut()
        .find(|art| art.slug == article_slug)
        .ok_or_else(|| AppError::NotFound("Article not found".into()))?;

    article.views += 1;
    let article = article.clone();

    education_queries::save_subcategories(&state.pool, category.id, &subcategories).await?;

    Ok(Json(ArticleResponse {
        success: true,
        article,
        breadcrumb: Breadcrumb {
            category: BreadcrumbEntry {
                title: category.title,
                slug: category.slug,
            },
            subcategory: sub_breadcrumb,
        },
    }))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

async fn search_articles(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = params.q.unwrap_or_default().trim().to_lowercase();
    if query.len() < 2 {
        return Ok(Json(SearchResponse { success: true, results: vec![] }));
    }

    let categories = education_queries::list_published(&state.pool).await?;

    let mut results = Vec::new();
    'outer: for category in &categories {
        for sub in &category.subcategories.0 {
            for article in &sub.articles {
                if !article.is_published {
                    continue;
                }
                let matches = article.title.to_lowercase().contains(&query)
                    || article.content.to_lowercase().contains(&query)
                    || article
                        .tags
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(&query));
                if matches {
                    results.push(ArticleSearchHit {
                        article: article.clone(),
                        category: BreadcrumbEntry {
                            title: category.title.clone(),
                            slug: category.slug.clone(),
                        },
                        subcategory: BreadcrumbEntry {
                            title: sub.title.clone(),
                            slug: sub.slug.clone(),
                        },
                    });
                    if results.len() >= SEARCH_RESULT_LIMIT {
                        break 'outer;
                    }
                }
            }
        }
    }

    Ok(Json(SearchResponse { success: true, results }))
}

// ==============================================================================
// Admin Handlers - Categories
// ==============================================================================

async fn admin_list_categories(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let categories = education_queries::list_all(&state.pool).await?;
    Ok(Json(CategoriesResponse { success: true, categories }))
}

async fn create_category(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }

    let slug = req
        .slug
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| slugify(&req.title));

    let category = education_queries::insert_category(
        &state.pool,
        req.title.trim(),
        &slug,
        req.description.as_deref(),
        req.icon.as_deref(),
        req.sort_order.unwrap_or(0),
    )
    .await?;

    info!("📚 Education category '{}' created", category.title);

    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse {
            success: true,
            message: Some("Category created successfully".into()),
            category,
        }),
    ))
}

async fn update_category(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    let category = education_queries::update_category_meta(&state.pool, id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    Ok(Json(CategoryResponse {
        success: true,
        message: Some("Category updated successfully".into()),
        category,
    }))
}

async fn delete_category(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    if !education_queries::delete_category(&state.pool, id).await? {
        return Err(AppError::NotFound("Category not found".into()));
    }

    Ok(Json(MessageResponse {
        success: true,
        message: "Category deleted successfully".into(),
    }))
}

// ==============================================================================
// Admin Handlers - Subcategories
// ==============================================================================

async fn load_category(
    state: &AppState,
    category_id: Uuid,
) -> Result<EducationCategory, AppError> {
    education_queries::find_by_id(&state.pool, category_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))
}

async fn add_subcategory(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
    Json(req): Json<AddSubcategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }

    let category = load_category(&state, category_id).await?;
    let mut subcategories = category.subcategories.0;

    subcategories.push(EducationSubcategory {
        id: Uuid::new_v4(),
        title: req.title.trim().to_string(),
        slug: req
            .slug
            .map(|s| s.to_lowercase())
            .unwrap_or_else(|| slugify(&req.title)),
        description: req.description,
        icon: req.icon,
        sort_order: req.sort_order.unwrap_or(0),
        is_published: true,
        articles: vec![],
    });

    let category = education_queries::save_subcategories(&state.pool, category_id, &subcategories)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse {
            success: true,
            message: Some("Subcategory added successfully".into()),
            category,
        }),
    ))
}

async fn update_subcategory(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Path((category_id, subcategory_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateSubcategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    let category = load_category(&state, category_id).await?;
    let mut subcategories = category.subcategories.0;

    let subcategory = subcategories
        .iter_mut()
        .find(|sub| sub.id == subcategory_id)
        .ok_or_else(|| AppError::NotFound("Subcategory not found".into()))?;

    if let Some(title) = req.title {
        subcategory.title = title;
    }
    if let Some(slug) = req.slug {
        subcategory.slug = slug.to_lowercase();
    }
    if let Some(description) = req.description {
        subcategory.description = Some(description);
    }
    if let Some(icon) = req.icon {
        subcategory.icon = Some(icon);
    }
    if let Some(sort_order) = req.sort_order {
        subcategory.sort_order = sort_order;
    }
    if let Some(is_published) = req.is_published {
        subcategory.is_published = is_published;
    }

    let category = education_queries::save_subcategories(&state.pool, category_id, &subcategories)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    Ok(Json(CategoryResponse {
        success: true,
        message: Some("Subcategory updated successfully".into()),
        category,
    }))
}

async fn delete_subcategory(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Path((category_id, subcategory_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CategoryResponse>, AppError> {
    let category = load_category(&state, category_id).await?;
    let mut subcategories = category.subcategories.0;

    let before = subcategories.len();
    subcategories.retain(|sub| sub.id != subcategory_id);
    if subcategories.len() == before {
        return Err(AppError::NotFound("Subcategory not found".into()));
    }

    let category = education_queries::save_subcategories(&state.pool, category_id, &subcategories)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    Ok(Json(CategoryResponse {
        success: true,
        message: Some("Subcategory deleted successfully".into()),
        category,
    }))
}

// ==============================================================================
// Admin Handlers - Articles
// ==============================================================================

async fn add_article(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Path((category_id, subcategory_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<AddArticleRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    if req.title.trim().is_empty() || req.content.trim().is_empty() {
        return Err(AppError::Validation("Title and content are required".into()));
    }

    let category = load_category(&state, category_id).await?;
    let mut subcategories = category.subcategories.0;

    let subcategory = subcategories
        .iter_mut()
        .find(|sub| sub.id == subcategory_id)
        .ok_or_else(|| AppError::NotFound("Subcategory not found".into()))?;

    subcategory.articles.push(EducationArticle {
        id: Uuid::new_v4(),
        title: req.title.trim().to_string(),
        question: req.question,
        content: req.content,
        slug: req
            .slug
            .map(|s| s.to_lowercase())
            .unwrap_or_else(|| slugify(&req.title)),
        sort_order: req.sort_order.unwrap_or(0),
        is_published: true,
        views: 0,
        tags: req.tags.unwrap_or_default(),
    });

    let category = education_queries::save_subcategories(&state.pool, category_id, &subcategories)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse {
            success: true,
            message: Some("Article added successfully".into()),
            category,
        }),
    ))
}

async fn update_article(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Path((category_id, subcategory_id, article_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(req): Json<UpdateArticleRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    let category = load_category(&state, category_id).await?;
    let mut subcategories = category.subcategories.0;

    let subcategory = subcategories
        .iter_mut()
        .find(|sub| sub.id == subcategory_id)
        .ok_or_else(|| AppError::NotFound("Subcategory not found".into()))?;

    let article = subcategory
        .articles
        .iter_mut()
        .find(|art| art.id == article_id)
        .ok_or_else(|| AppError::NotFound("Article not found".into()))?;

    if let Some(title) = req.title {
        article.title = title;
    }
    if let Some(question) = req.question {
        article.question = Some(question);
    }
    if let Some(content) = req.content {
        article.content = content;
    }
    if let Some(slug) = req.slug {
        article.slug = slug.to_lowercase();
    }
    if let Some(sort_order) = req.sort_order {
        article.sort_order = sort_order;
    }
    if let Some(is_published) = req.is_published {
        article.is_published = is_published;
    }
    if let Some(tags) = req.tags {
        article.tags = tags;
    }

    let category = education_queries::save_subcategories(&state.pool, category_id, &subcategories)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    Ok(Json(CategoryResponse {
        success: true,
        message: Some("Article updated successfully".into()),
        category,
    }))
}

async fn delete_article(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Path((category_id, subcategory_id, article_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<CategoryResponse>, AppError> {
    let category = load_category(&state, category_id).await?;
    let mut subcategories = category.subcategories.0;

    let subcategory = subcategories
        .iter_mut()
        .find(|sub| sub.id == subcategory_id)
        .ok_or_else(|| AppError::NotFound("Subcategory not found".into()))?;

    let before = subcategory.articles.len();
    subcategory.articles.retain(|art| art.id != article_id);
    if subcategory.articles.len() == before {
        return Err(AppError::NotFound("Article not found".into()));
    }

    let category = education_queries::save_subcategories(&state.pool, category_id, &subcategories)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    Ok(Json(CategoryResponse {
        success: true,
        message: Some("Article deleted successfully".into()),
        category,
    }))
}
