//! Catalog models: categories, genres, and titles

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Category entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Genre entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Public representation of a category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub name: String,
    pub slug: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        CategoryResponse {
            name: category.name,
            slug: category.slug,
        }
    }
}

/// Public representation of a genre
#[derive(Debug, Clone, Serialize)]
pub struct GenreResponse {
    pub name: String,
    pub slug: String,
}

impl From<Genre> for GenreResponse {
    fn from(genre: Genre) -> Self {
        GenreResponse {
            name: genre.name,
            slug: genre.slug,
        }
    }
}

/// Request for category creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: String,
}

/// Request for genre creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGenreRequest {
    pub name: String,
    pub slug: String,
}

/// Query parameters for category/genre listing
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    /// Substring match against the name
    pub search: Option<String>,
}

/// Public representation of a title with its computed rating
///
/// The rating is always the average of the title's review scores computed at
/// query time; a title without reviews reads as 0.
#[derive(Debug, Clone, Serialize)]
pub struct TitleResponse {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub genre: Vec<GenreResponse>,
    pub category: Option<CategoryResponse>,
    pub rating: f64,
}

/// Request for title creation; category and genres are referenced by slug
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTitleRequest {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
    pub category: Option<String>,
}

/// Request for title update
///
/// `description` and `category` are nullable columns, so the request has to
/// distinguish a field that was absent (leave as-is) from one sent as an
/// explicit `null` (clear it). The outer `Option` tracks presence, the inner
/// one carries the value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTitleRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub genre: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Query parameters for title listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleQuery {
    /// Filter by category slug
    pub category: Option<String>,
    /// Filter by genre slug
    pub genre: Option<String>,
    /// Substring match against the title name
    pub name: Option<String>,
    /// Filter by exact release year
    pub year: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_distinguishes_absent_from_null() {
        let absent: UpdateTitleRequest = serde_json::from_str(r#"{"name": "Dune"}"#).unwrap();
        assert_eq!(absent.description, None);
        assert_eq!(absent.category, None);

        let cleared: UpdateTitleRequest =
            serde_json::from_str(r#"{"description": null, "category": null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));
        assert_eq!(cleared.category, Some(None));

        let set: UpdateTitleRequest =
            serde_json::from_str(r#"{"description": "Spice opera", "category": "books"}"#)
                .unwrap();
        assert_eq!(set.description, Some(Some("Spice opera".to_string())));
        assert_eq!(set.category, Some(Some("books".to_string())));
    }
}
