//! Diesel row types and their conversions into the domain types of `dapur_core`.

use chrono::{DateTime, Utc};
use dapur_core::{Category, Comment, NewRecipe, Rating, Recipe, Role, User};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            role: Role::from_db(&self.role),
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUserRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession<'a> {
    pub user_id: Uuid,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategoryRow<'a> {
    pub name: &'a str,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeRow {
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
    pub thumbnail: Option<String>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Recipe {
            id: row.id,
            title: row.title,
            slug: row.slug,
            category_id: row.category_id,
            energy: row.energy,
            carbohydrate: row.carbohydrate,
            protein: row.protein,
            ingredients: row.ingredients,
            method: row.method,
            tips: row.tips,
            thumbnail: row.thumbnail,
            author_id: row.author_id,
            created_at: row.created_at,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipeRow<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub category_id: i64,
    pub energy: f64,
    pub carbohydrate: f64,
    pub protein: f64,
    pub ingredients: &'a str,
    pub method: &'a str,
    pub tips: &'a str,
    pub thumbnail: Option<&'a str>,
    pub author_id: Uuid,
}

impl<'a> From<&'a NewRecipe> for NewRecipeRow<'a> {
    fn from(recipe: &'a NewRecipe) -> Self {
        NewRecipeRow {
            title: &recipe.title,
            slug: &recipe.slug,
            category_id: recipe.category_id,
            energy: recipe.energy,
            carbohydrate: recipe.carbohydrate,
            protein: recipe.protein,
            ingredients: &recipe.ingredients,
            method: &recipe.method,
            tips: &recipe.tips,
            thumbnail: recipe.thumbnail.as_deref(),
            author_id: recipe.author_id,
        }
    }
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    pub id: i64,
    pub recipe_id: i64,
    pub user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            recipe_id: row.recipe_id,
            user_id: row.user_id,
            body: row.body,
            created_at: row.created_at,
        }
    }
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::ratings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RatingRow {
    pub id: i64,
    pub recipe_id: i64,
    pub user_id: Uuid,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

impl From<RatingRow> for Rating {
    fn from(row: RatingRow) -> Self {
        Rating {
            id: row.id,
            recipe_id: row.recipe_id,
            user_id: row.user_id,
            rating: row.rating,
            created_at: row.created_at,
        }
    }
}
