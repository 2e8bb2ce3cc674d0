//! Domain model and rules for the Dapur recipe API.
//!
//! Nothing in this crate touches the database or HTTP; the server crate maps
//! its rows and requests onto these types.

pub mod access;
pub mod error;
pub mod image;
pub mod rating;
pub mod slug;
pub mod types;
pub mod validation;

pub use access::can_delete;
pub use error::ImageError;
pub use rating::average_rating;
pub use slug::slugify;
pub use types::{
    Category, Comment, LoadedRecipe, NewRecipe, Rating, Recipe, RecipeDetail,
    RecipeWithCategory, Role, User,
};
pub use validation::{
    FieldValue, RecipeDraft, RecipeForm, Upload, ValidThumbnail, ValidationErrors,
};
