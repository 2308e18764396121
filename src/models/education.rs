use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

// ==============================================================================
// Education CMS Models
// ==============================================================================
//
// A category owns its whole subtree (subcategories and their articles) as a
// single JSONB document, so edits are read-modify-write on one row.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationArticle {
    pub id: Uuid,
    pub title: String,
    pub question: Option<String>,
    pub content: String,
    pub slug: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_published")]
    pub is_published: bool,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationSubcategory {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_published")]
    pub is_published: bool,
    #[serde(default)]
    pub articles: Vec<EducationArticle>,
}

fn default_published() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EducationCategory {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub is_published: bool,
    pub subcategories: Json<Vec<EducationSubcategory>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EducationCategory {
    /// Drop unpublished subcategories/articles and sort every level by
    /// its order field. Used for all public reads.
    pub fn into_published_view(mut self) -> Self {
        let mut subcategories: Vec<EducationSubcategory> = self
            .subcategories
            .0
            .into_iter()
            .filter(|sub| sub.is_published)
            .map(|mut sub| {
                sub.articles.retain(|art| art.is_published);
                sub.articles.sort_by_key(|art| art.sort_order);
                sub
            })
            .collect();
        subcategories.sort_by_key(|sub| sub.sort_order);
        self.subcategories = Json(subcategories);
        self
    }
}

/// Lower-cased title with whitespace runs replaced by dashes; the
/// fallback when no explicit slug is supplied.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

// ==============================================================================
// Request DTOs
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryRequest {
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCategoryRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddSubcategoryRequest {
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSubcategoryRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddArticleRequest {
    pub title: String,
    pub question: Option<String>,
    pub content: String,
    pub slug: Option<String>,
    pub sort_order: Option<i32>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub question: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
    pub sort_order: Option<i32>,
    pub is_published: Option<bool>,
    pub tags: Option<Vec<String>>,
}

// ==============================================================================
// Search
// ==============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct BreadcrumbEntry {
    pub title: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleSearchHit {
    #[serde(flatten)]
    pub article: EducationArticle,
    pub category: BreadcrumbEntry,
    pub subcategory: BreadcrumbEntry,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_collapses_whitespace() {
        assert_eq!(slugify("Stock  Market   Basics"), "stock-market-basics");
        assert_eq!(slugify("What is an IPO"), "what-is-an-ipo");
    }

    #[test]
    fn test_published_view_filters_and_sorts() {
        let category = EducationCategory {
            id: Uuid::new_v4(),
            title: "Basics".into(),
            slug: "basics".into(),
            description: None,
            icon: None,
            sort_order: 0,
            is_published: true,
            subcategories: Json(vec![
                EducationSubcategory {
                    id: Uuid::new_v4(),
                    title: "Second".into(),
                    slug: "second".into(),
                    description: None,
                    icon: None,
                    sort_order: 2,
                    is_published: true,
                    articles: vec![],
                },
                EducationSubcategory {
                    id: Uuid::new_v4(),
                    title: "Hidden".into(),
                    slug: "hidden".into(),
                    description: None,
                    icon: None,
                    sort_order: 0,
                    is_published: false,
                    articles: vec![],
                },
                EducationSubcategory {
                    id: Uuid::new_v4(),
                    title: "First".into(),
                    slug: "first".into(),
                    description: None,
                    icon: None,
                    sort_order: 1,
                    is_published: true,
                    articles: vec![
                        EducationArticle {
                            id: Uuid::new_v4(),
                            title: "Draft".into(),
                            question: None,
                            content: "draft".into(),
                            slug: "draft".into(),
                            sort_order: 0,
                            is_published: false,
                            views: 0,
                            tags: vec![],
                        },
                        EducationArticle {
                            id: Uuid::new_v4(),
                            title: "Live".into(),
                            question: None,
                            content: "live".into(),
                            slug: "live".into(),
                            sort_order: 1,
                            is_published: true,
                            views: 0,
                            tags: vec![],
                        },
                    ],
                },
            ]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let view = category.into_published_view();
        let subs = &view.subcategories.0;
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].slug, "first");
        assert_eq!(subs[1].slug, "second");
        assert_eq!(subs[0].articles.len(), 1);
        assert_eq!(subs[0].articles[0].slug, "live");
    }
}
