use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dapur_core::{
    Category, Comment, LoadedRecipe, NewRecipe, Rating, Recipe, RecipeWithCategory, Role, User,
};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use super::{Credentials, RecipeStore, StoreError, UserStore};

struct StoredSession {
    user_id: Uuid,
    token_hash: String,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    categories: Vec<Category>,
    recipes: Vec<Recipe>,
    comments: Vec<Comment>,
    ratings: Vec<Rating>,
    users: Vec<Credentials>,
    sessions: Vec<StoredSession>,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn category(&self, id: i64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }
}

/// In-process store with the same observable behaviour as [`super::PgStore`]:
/// unique slugs, case-insensitive usernames and cascading recipe deletes.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach a comment to a recipe. The HTTP surface has no path for this.
    pub fn add_comment(&self, recipe_id: i64, user_id: Uuid, body: &str) -> Comment {
        let mut state = self.write();
        let comment = Comment {
            id: state.next_id(),
            recipe_id,
            user_id,
            body: body.to_string(),
            created_at: Utc::now(),
        };
        state.comments.push(comment.clone());
        comment
    }

    /// Attach a rating to a recipe. The HTTP surface has no path for this.
    pub fn add_rating(&self, recipe_id: i64, user_id: Uuid, rating: i32) -> Rating {
        let mut state = self.write();
        let rating = Rating {
            id: state.next_id(),
            recipe_id,
            user_id,
            rating,
            created_at: Utc::now(),
        };
        state.ratings.push(rating.clone());
        rating
    }

    pub fn comment_count(&self) -> usize {
        self.read().comments.len()
    }

    pub fn rating_count(&self) -> usize {
        self.read().ratings.len()
    }

    pub fn session_count(&self) -> usize {
        self.read().sessions.len()
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn list_recipes(&self) -> Result<Vec<RecipeWithCategory>, StoreError> {
        let state = self.read();

        let mut listed: Vec<RecipeWithCategory> = state
            .recipes
            .iter()
            .filter_map(|recipe| {
                state.category(recipe.category_id).map(|category| RecipeWithCategory {
                    recipe: recipe.clone(),
                    category: category.clone(),
                })
            })
            .collect();
        listed.sort_by(|a, b| {
            b.recipe
                .created_at
                .cmp(&a.recipe.created_at)
                .then(b.recipe.id.cmp(&a.recipe.id))
        });

        Ok(listed)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut categories = self.read().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn category_exists(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.read().category(id).is_some())
    }

    async fn create_category(&self, name: &str) -> Result<Category, StoreError> {
        let mut state = self.write();
        let category = Category {
            id: state.next_id(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn insert_recipe(&self, new: NewRecipe) -> Result<Recipe, StoreError> {
        let mut state = self.write();

        if state.recipes.iter().any(|r| r.slug == new.slug) {
            return Err(StoreError::SlugTaken(new.slug));
        }
        if state.category(new.category_id).is_none() {
            return Err(StoreError::UnknownCategory(new.category_id));
        }

        let recipe = Recipe {
            id: state.next_id(),
            title: new.title,
            slug: new.slug,
            category_id: new.category_id,
            energy: new.energy,
            carbohydrate: new.carbohydrate,
            protein: new.protein,
            ingredients: new.ingredients,
            method: new.method,
            tips: new.tips,
            thumbnail: new.thumbnail,
            author_id: new.author_id,
            created_at: Utc::now(),
        };
        state.recipes.push(recipe.clone());

        Ok(recipe)
    }

    async fn find_recipe(&self, slug: &str) -> Result<Option<Recipe>, StoreError> {
        Ok(self.read().recipes.iter().find(|r| r.slug == slug).cloned())
    }

    async fn load_recipe(&self, slug: &str) -> Result<Option<LoadedRecipe>, StoreError> {
        let state = self.read();

        let Some(recipe) = state.recipes.iter().find(|r| r.slug == slug) else {
            return Ok(None);
        };
        let Some(category) = state.category(recipe.category_id) else {
            return Ok(None);
        };

        Ok(Some(LoadedRecipe {
            recipe: recipe.clone(),
            category: category.clone(),
            comments: state
                .comments
                .iter()
                .filter(|c| c.recipe_id == recipe.id)
                .cloned()
                .collect(),
            ratings: state
                .ratings
                .iter()
                .filter(|r| r.recipe_id == recipe.id)
                .cloned()
                .collect(),
        }))
    }

    async fn delete_recipe(&self, id: i64) -> Result<bool, StoreError> {
        let mut state = self.write();

        let before = state.recipes.len();
        state.recipes.retain(|r| r.id != id);
        if state.recipes.len() == before {
            return Ok(false);
        }
        state.comments.retain(|c| c.recipe_id != id);
        state.ratings.retain(|r| r.recipe_id != id);

        Ok(true)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, StoreError> {
        let mut state = self.write();

        if state
            .users
            .iter()
            .any(|c| c.user.username.eq_ignore_ascii_case(username))
        {
            return Err(StoreError::UsernameTaken(username.to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            role,
        };
        state.users.push(Credentials {
            user: user.clone(),
            password_hash: password_hash.to_string(),
        });

        Ok(user)
    }

    async fn find_credentials(&self, username: &str) -> Result<Option<Credentials>, StoreError> {
        Ok(self
            .read()
            .users
            .iter()
            .find(|c| c.user.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn create_session(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut state = self.write();
        let now = Utc::now();
        state.sessions.retain(|s| s.expires_at > now);
        state.sessions.push(StoredSession {
            user_id,
            token_hash: token_hash.to_string(),
            expires_at,
        });
        Ok(())
    }

    async fn user_for_token_hash(&self, token_hash: &str) -> Result<Option<User>, StoreError> {
        let state = self.read();
        let now = Utc::now();

        let user = state
            .sessions
            .iter()
            .find(|s| s.token_hash == token_hash && s.expires_at > now)
            .and_then(|s| state.users.iter().find(|c| c.user.id == s.user_id))
            .map(|c| c.user.clone());

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_recipe(slug: &str, category_id: i64, author_id: Uuid) -> NewRecipe {
        NewRecipe {
            title: slug.replace('-', " "),
            slug: slug.to_string(),
            category_id,
            energy: 100.0,
            carbohydrate: 10.0,
            protein: 5.0,
            ingredients: "rice".to_string(),
            method: "cook".to_string(),
            tips: "enjoy".to_string(),
            thumbnail: None,
            author_id,
        }
    }

    #[tokio::test]
    async fn test_listing_is_newest_first() {
        let store = MemoryStore::new();
        let category = store.create_category("Main").await.unwrap();
        let author = Uuid::new_v4();

        store
            .insert_recipe(new_recipe("first", category.id, author))
            .await
            .unwrap();
        store
            .insert_recipe(new_recipe("second", category.id, author))
            .await
            .unwrap();

        let listed = store.list_recipes().await.unwrap();
        let slugs: Vec<&str> = listed.iter().map(|r| r.recipe.slug.as_str()).collect();
        assert_eq!(slugs, vec!["second", "first"]);
        assert_eq!(listed[0].category.name, "Main");
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let store = MemoryStore::new();
        let category = store.create_category("Main").await.unwrap();
        let author = Uuid::new_v4();

        store
            .insert_recipe(new_recipe("fried-rice", category.id, author))
            .await
            .unwrap();
        let err = store
            .insert_recipe(new_recipe("fried-rice", category.id, author))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::SlugTaken(slug) if slug == "fried-rice"));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_comments_and_ratings() {
        let store = MemoryStore::new();
        let category = store.create_category("Main").await.unwrap();
        let author = Uuid::new_v4();
        let keep = store
            .insert_recipe(new_recipe("keep", category.id, author))
            .await
            .unwrap();
        let gone = store
            .insert_recipe(new_recipe("gone", category.id, author))
            .await
            .unwrap();
        store.add_comment(gone.id, author, "tasty");
        store.add_rating(gone.id, author, 5);
        store.add_rating(keep.id, author, 3);

        assert!(store.delete_recipe(gone.id).await.unwrap());
        assert!(!store.delete_recipe(gone.id).await.unwrap());

        assert_eq!(store.comment_count(), 0);
        assert_eq!(store.rating_count(), 1);
        assert!(store.find_recipe("gone").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_usernames_are_case_insensitive() {
        let store = MemoryStore::new();
        store.create_user("Alice", "hash", Role::User).await.unwrap();

        let err = store
            .create_user("alice", "hash", Role::User)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UsernameTaken(_)));

        let found = store.find_credentials("ALICE").await.unwrap().unwrap();
        assert_eq!(found.user.username, "Alice");
    }

    #[tokio::test]
    async fn test_expired_session_resolves_to_nobody() {
        let store = MemoryStore::new();
        let user = store.create_user("bob", "hash", Role::User).await.unwrap();

        store
            .create_session(user.id, "live", Utc::now() + Duration::days(1))
            .await
            .unwrap();
        store
            .create_session(user.id, "stale", Utc::now() - Duration::seconds(1))
            .await
            .unwrap();

        assert_eq!(
            store.user_for_token_hash("live").await.unwrap(),
            Some(user)
        );
        assert_eq!(store.user_for_token_hash("stale").await.unwrap(), None);
        assert_eq!(store.user_for_token_hash("unknown").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_new_session_prunes_expired_ones() {
        let store = MemoryStore::new();
        let user = store.create_user("bob", "hash", Role::User).await.unwrap();

        store
            .create_session(user.id, "stale", Utc::now() - Duration::seconds(1))
            .await
            .unwrap();
        store
            .create_session(user.id, "live", Utc::now() + Duration::days(1))
            .await
            .unwrap();
        store
            .create_session(user.id, "fresh", Utc::now() + Duration::days(1))
            .await
            .unwrap();

        assert_eq!(store.session_count(), 2);
        assert_eq!(
            store.user_for_token_hash("live").await.unwrap(),
            Some(user)
        );
    }
}
