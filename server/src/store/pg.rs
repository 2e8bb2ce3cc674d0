use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dapur_core::{
    Category, Comment, LoadedRecipe, NewRecipe, Rating, Recipe, RecipeWithCategory, Role, User,
};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use super::{Credentials, RecipeStore, StoreError, UserStore};
use crate::db::DbPool;
use crate::models::{
    CategoryRow, CommentRow, NewCategoryRow, NewRecipeRow, NewSession, NewUserRow, RatingRow,
    RecipeRow, UserRow,
};
use crate::schema::{categories, comments, ratings, recipes, sessions, users};
use crate::username_matches;

/// Diesel-backed store over the Postgres pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        PgStore { pool }
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, StoreError> {
        self.pool
            .get()
            .map_err(|e| StoreError::Connection(e.to_string()))
    }
}

#[async_trait]
impl RecipeStore for PgStore {
    async fn list_recipes(&self) -> Result<Vec<RecipeWithCategory>, StoreError> {
        let mut conn = self.conn()?;

        let rows: Vec<(RecipeRow, CategoryRow)> = recipes::table
            .inner_join(categories::table)
            .order((recipes::created_at.desc(), recipes::id.desc()))
            .select((RecipeRow::as_select(), CategoryRow::as_select()))
            .load(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(recipe, category)| RecipeWithCategory {
                recipe: recipe.into(),
                category: category.into(),
            })
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut conn = self.conn()?;

        let rows: Vec<CategoryRow> = categories::table
            .order(categories::name.asc())
            .select(CategoryRow::as_select())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn category_exists(&self, id: i64) -> Result<bool, StoreError> {
        let mut conn = self.conn()?;

        let exists = diesel::select(diesel::dsl::exists(categories::table.find(id)))
            .get_result::<bool>(&mut conn)?;

        Ok(exists)
    }

    async fn create_category(&self, name: &str) -> Result<Category, StoreError> {
        let mut conn = self.conn()?;

        let row: CategoryRow = diesel::insert_into(categories::table)
            .values(&NewCategoryRow { name })
            .returning(CategoryRow::as_returning())
            .get_result(&mut conn)?;

        Ok(row.into())
    }

    async fn insert_recipe(&self, recipe: NewRecipe) -> Result<Recipe, StoreError> {
        let mut conn = self.conn()?;

        let result = diesel::insert_into(recipes::table)
            .values(&NewRecipeRow::from(&recipe))
            .returning(RecipeRow::as_returning())
            .get_result::<RecipeRow>(&mut conn);

        match result {
            Ok(row) => Ok(row.into()),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(StoreError::SlugTaken(recipe.slug))
            }
            Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
                Err(StoreError::UnknownCategory(recipe.category_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_recipe(&self, slug: &str) -> Result<Option<Recipe>, StoreError> {
        let mut conn = self.conn()?;

        let row: Option<RecipeRow> = recipes::table
            .filter(recipes::slug.eq(slug))
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Recipe::from))
    }

    async fn load_recipe(&self, slug: &str) -> Result<Option<LoadedRecipe>, StoreError> {
        let mut conn = self.conn()?;

        let found: Option<(RecipeRow, CategoryRow)> = recipes::table
            .inner_join(categories::table)
            .filter(recipes::slug.eq(slug))
            .select((RecipeRow::as_select(), CategoryRow::as_select()))
            .first(&mut conn)
            .optional()?;

        let Some((recipe, category)) = found else {
            return Ok(None);
        };

        let comment_rows: Vec<CommentRow> = comments::table
            .filter(comments::recipe_id.eq(recipe.id))
            .order((comments::created_at.asc(), comments::id.asc()))
            .select(CommentRow::as_select())
            .load(&mut conn)?;

        let rating_rows: Vec<RatingRow> = ratings::table
            .filter(ratings::recipe_id.eq(recipe.id))
            .order((ratings::created_at.asc(), ratings::id.asc()))
            .select(RatingRow::as_select())
            .load(&mut conn)?;

        Ok(Some(LoadedRecipe {
            recipe: recipe.into(),
            category: category.into(),
            comments: comment_rows.into_iter().map(Comment::from).collect(),
            ratings: rating_rows.into_iter().map(Rating::from).collect(),
        }))
    }

    async fn delete_recipe(&self, id: i64) -> Result<bool, StoreError> {
        let mut conn = self.conn()?;

        // comments and ratings go with it through ON DELETE CASCADE
        let deleted = diesel::delete(recipes::table.find(id)).execute(&mut conn)?;

        Ok(deleted > 0)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, StoreError> {
        let mut conn = self.conn()?;

        let new_user = NewUserRow {
            username,
            password_hash,
            role: role.as_str(),
        };

        match diesel::insert_into(users::table)
            .values(&new_user)
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
        {
            Ok(row) => Ok(row.into_user()),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(StoreError::UsernameTaken(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_credentials(&self, username: &str) -> Result<Option<Credentials>, StoreError> {
        let mut conn = self.conn()?;

        let row: Option<UserRow> = users::table
            .filter(username_matches!(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(|row| {
            let password_hash = row.password_hash.clone();
            Credentials {
                user: row.into_user(),
                password_hash,
            }
        }))
    }

    async fn create_session(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn()?;

        let new_session = NewSession {
            user_id,
            token_hash,
            expires_at,
        };

        conn.transaction(|conn| {
            let pruned =
                diesel::delete(sessions::table.filter(sessions::expires_at.le(Utc::now())))
                    .execute(conn)?;
            if pruned > 0 {
                tracing::debug!(pruned, "removed expired sessions");
            }

            diesel::insert_into(sessions::table)
                .values(&new_session)
                .execute(conn)?;
            Ok::<_, DieselError>(())
        })?;

        Ok(())
    }

    async fn user_for_token_hash(&self, token_hash: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.conn()?;

        let row: Option<UserRow> = sessions::table
            .inner_join(users::table)
            .filter(sessions::token_hash.eq(token_hash))
            .filter(sessions::expires_at.gt(Utc::now()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(UserRow::into_user))
    }
}
