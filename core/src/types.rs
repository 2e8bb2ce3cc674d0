use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::rating::average_rating;

/// Permission level attached to every user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    /// May delete any recipe.
    Administrator,
    /// May only delete recipes they authored.
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "Administrator",
            Role::User => "User",
        }
    }

    /// Parse a stored role. Anything that is not exactly "Administrator" is an
    /// ordinary user.
    pub fn from_db(s: &str) -> Self {
        match s {
            "Administrator" => Role::Administrator,
            _ => Role::User,
        }
    }
}

/// The authenticated caller, resolved once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub category_id: i64,
    pub energy: f64,
    pub carbohydrate: f64,
    pub protein: f64,
    pub ingredients: String,
    pub method: String,
    pub tips: String,
    /// Public URL of the uploaded thumbnail, if any
    pub thumbnail: Option<String>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A recipe ready to be persisted. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub title: String,
    pub slug: String,
    pub category_id: i64,
    pub energy: f64,
    pub carbohydrate: f64,
    pub protein: f64,
    pub ingredients: String,
    pub method: String,
    pub tips: String,
    pub thumbnail: Option<String>,
    pub author_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub id: i64,
    pub recipe_id: i64,
    pub user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Rating {
    pub id: i64,
    pub recipe_id: i64,
    pub user_id: Uuid,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

/// Listing entry: a recipe with its category attached.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RecipeWithCategory {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub category: Category,
}

/// Everything the store loads for a detail fetch, before aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRecipe {
    pub recipe: Recipe,
    pub category: Category,
    pub comments: Vec<Comment>,
    pub ratings: Vec<Rating>,
}

/// Detail payload returned by `GET /v1/recipes/{slug}`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub category: Category,
    pub comments: Vec<Comment>,
    pub ratings: Vec<Rating>,
    /// Mean rating rounded to one decimal; null when the recipe has no ratings
    pub ratings_avg: Option<f64>,
}

impl From<LoadedRecipe> for RecipeDetail {
    fn from(loaded: LoadedRecipe) -> Self {
        let values: Vec<i32> = loaded.ratings.iter().map(|r| r.rating).collect();
        let ratings_avg = average_rating(&values);

        RecipeDetail {
            recipe: loaded.recipe,
            category: loaded.category,
            comments: loaded.comments,
            ratings: loaded.ratings,
            ratings_avg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_recipe() -> Recipe {
        Recipe {
            id: 7,
            title: "Fried Rice".to_string(),
            slug: "fried-rice".to_string(),
            category_id: 1,
            energy: 520.0,
            carbohydrate: 70.5,
            protein: 14.0,
            ingredients: "rice, egg".to_string(),
            method: "fry".to_string(),
            tips: "use day-old rice".to_string(),
            thumbnail: None,
            author_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    fn sample_category() -> Category {
        Category {
            id: 1,
            name: "Main".to_string(),
            created_at: Utc::now(),
        }
    }

    fn rating(recipe_id: i64, value: i32) -> Rating {
        Rating {
            id: i64::from(value),
            recipe_id,
            user_id: Uuid::new_v4(),
            rating: value,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_from_db() {
        assert_eq!(Role::from_db("Administrator"), Role::Administrator);
        assert_eq!(Role::from_db("User"), Role::User);
        assert_eq!(Role::from_db("administrator"), Role::User);
        assert_eq!(Role::from_db(""), Role::User);
    }

    #[test]
    fn test_detail_aggregates_ratings() {
        let detail = RecipeDetail::from(LoadedRecipe {
            recipe: sample_recipe(),
            category: sample_category(),
            comments: vec![],
            ratings: vec![rating(7, 4), rating(7, 5)],
        });
        assert_eq!(detail.ratings_avg, Some(4.5));
        assert_eq!(detail.ratings.len(), 2);
    }

    #[test]
    fn test_detail_without_ratings_serializes_null_average() {
        let detail = RecipeDetail::from(LoadedRecipe {
            recipe: sample_recipe(),
            category: sample_category(),
            comments: vec![],
            ratings: vec![],
        });
        let json = serde_json::to_value(&detail).unwrap();
        assert!(json["ratings_avg"].is_null());
        // Recipe fields are flattened into the top level
        assert_eq!(json["slug"], "fried-rice");
        assert_eq!(json["category"]["name"], "Main");
    }
}
