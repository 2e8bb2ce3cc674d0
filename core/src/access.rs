//! Authorization rules for recipe mutations.

use crate::types::{Recipe, Role, User};

/// Only the recipe's author or an administrator may delete it.
pub fn can_delete(user: &User, recipe: &Recipe) -> bool {
    user.role == Role::Administrator || recipe.author_id == user.id
}
