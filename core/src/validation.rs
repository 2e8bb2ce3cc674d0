//! Recipe form validation.
//!
//! Input arrives either as multipart form fields or as a JSON object. The HTTP
//! layer normalizes both into a [`RecipeForm`]; [`RecipeForm::validate`] then
//! applies the field rules and either yields a [`RecipeDraft`] or a
//! [`ValidationErrors`] map keyed by field name.

use std::collections::{BTreeMap, HashMap};

use image::ImageFormat;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ImageError;
use crate::image::{validate_thumbnail, MAX_THUMBNAIL_KB};
use crate::slug::slugify;
use crate::types::NewRecipe;

pub const MAX_TITLE_CHARS: usize = 255;

const NUMERIC_FIELDS: &[&str] = &["energy", "carbohydrate", "protein"];
const TEXT_FIELDS: &[&str] = &["ingredients", "method", "tips"];

/// Field name to messages, serialized as a JSON object with fields in sorted order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Error, Serialize, ToSchema)]
#[serde(transparent)]
#[error("invalid fields: {}", field_list(.0))]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

fn field_list(errors: &BTreeMap<String, Vec<String>>) -> String {
    errors.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors for a single field.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// A single submitted value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    /// A JSON boolean, array or object. Never acceptable for any field.
    Other,
}

/// An uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
enum ThumbnailInput {
    File(Upload),
    /// Something was submitted under `thumbnail` but it was not a file.
    NotAFile,
}

/// Raw recipe input collected from the request body.
#[derive(Debug, Default, Clone)]
pub struct RecipeForm {
    fields: HashMap<String, FieldValue>,
    thumbnail: Option<ThumbnailInput>,
}

/// A thumbnail that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidThumbnail {
    pub file_name: String,
    pub format: ImageFormat,
    pub data: Vec<u8>,
}

/// A validated recipe, not yet owned by anyone.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDraft {
    pub title: String,
    pub slug: String,
    pub category_id: i64,
    pub energy: f64,
    pub carbohydrate: f64,
    pub protein: f64,
    pub ingredients: String,
    pub method: String,
    pub tips: String,
    pub thumbnail: Option<ValidThumbnail>,
}

impl RecipeDraft {
    /// Attach the author and the stored thumbnail URL.
    pub fn into_new_recipe(self, author_id: Uuid, thumbnail_url: Option<String>) -> NewRecipe {
        NewRecipe {
            title: self.title,
            slug: self.slug,
            category_id: self.category_id,
            energy: self.energy,
            carbohydrate: self.carbohydrate,
            protein: self.protein,
            ingredients: self.ingredients,
            method: self.method,
            tips: self.tips,
            thumbnail: thumbnail_url,
            author_id,
        }
    }
}

/// Human-readable attribute name used in messages ("category_id" -> "category id").
fn attribute(field: &str) -> String {
    field.replace('_', " ")
}

impl RecipeForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a text value. Values are trimmed and empty values are treated as absent.
    pub fn insert_text(&mut self, name: &str, value: &str) {
        let trimmed = value.trim();
        if name == "thumbnail" {
            if !trimmed.is_empty() {
                self.thumbnail = Some(ThumbnailInput::NotAFile);
            }
            return;
        }
        if trimmed.is_empty() {
            self.fields.remove(name);
        } else {
            self.fields
                .insert(name.to_string(), FieldValue::Text(trimmed.to_string()));
        }
    }

    pub fn insert_number(&mut self, name: &str, value: f64) {
        if name == "thumbnail" {
            self.thumbnail = Some(ThumbnailInput::NotAFile);
            return;
        }
        self.fields
            .insert(name.to_string(), FieldValue::Number(value));
    }

    pub fn insert_other(&mut self, name: &str) {
        if name == "thumbnail" {
            self.thumbnail = Some(ThumbnailInput::NotAFile);
            return;
        }
        self.fields.insert(name.to_string(), FieldValue::Other);
    }

    /// Record an uploaded thumbnail. An empty upload (no file chosen) is ignored.
    pub fn set_thumbnail(&mut self, upload: Upload) {
        if upload.file_name.is_empty() && upload.data.is_empty() {
            return;
        }
        self.thumbnail = Some(ThumbnailInput::File(upload));
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// The submitted category id, if it is present and looks like an integer.
    ///
    /// Callers use this to look the category up before calling [`validate`](Self::validate).
    pub fn category_id(&self) -> Option<i64> {
        match self.fields.get("category_id")? {
            FieldValue::Text(s) => s.parse().ok(),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                Some(*n as i64)
            }
            _ => None,
        }
    }

    /// Apply every field rule. `category_exists` is whether [`category_id`](Self::category_id)
    /// names a stored category.
    pub fn validate(self, category_exists: bool) -> Result<RecipeDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = self.required_string("title", &mut errors);
        let title = title.and_then(|title| {
            if title.chars().count() > MAX_TITLE_CHARS {
                errors.add(
                    "title",
                    format!(
                        "The title field must not be greater than {} characters.",
                        MAX_TITLE_CHARS
                    ),
                );
                return None;
            }
            let slug = slugify(&title);
            if slug.is_empty() {
                errors.add(
                    "title",
                    "The title field must contain at least one letter or number.",
                );
                return None;
            }
            Some((title, slug))
        });

        let category_id = if !self.fields.contains_key("category_id") {
            errors.add("category_id", required_message("category_id"));
            None
        } else {
            match self.category_id() {
                Some(id) if category_exists => Some(id),
                _ => {
                    errors.add(
                        "category_id",
                        format!("The selected {} is invalid.", attribute("category_id")),
                    );
                    None
                }
            }
        };

        let mut numbers = [0.0f64; 3];
        let mut numbers_ok = true;
        for (slot, field) in numbers.iter_mut().zip(NUMERIC_FIELDS) {
            match self.required_number(field, &mut errors) {
                Some(n) => *slot = n,
                None => numbers_ok = false,
            }
        }

        let mut texts: [Option<String>; 3] = [None, None, None];
        for (slot, field) in texts.iter_mut().zip(TEXT_FIELDS) {
            *slot = self.required_string(field, &mut errors);
        }

        let thumbnail = match self.thumbnail {
            None => None,
            Some(ThumbnailInput::NotAFile) => {
                errors.add("thumbnail", "The thumbnail field must be an image.");
                None
            }
            Some(ThumbnailInput::File(upload)) => match validate_thumbnail(&upload.data) {
                Ok(format) => Some(ValidThumbnail {
                    file_name: upload.file_name,
                    format,
                    data: upload.data,
                }),
                Err(e) => {
                    errors.add("thumbnail", thumbnail_message(&e));
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        // Every branch above that yields None also records an error
        match (title, category_id, numbers_ok, texts) {
            (
                Some((title, slug)),
                Some(category_id),
                true,
                [Some(ingredients), Some(method), Some(tips)],
            ) => Ok(RecipeDraft {
                title,
                slug,
                category_id,
                energy: numbers[0],
                carbohydrate: numbers[1],
                protein: numbers[2],
                ingredients,
                method,
                tips,
                thumbnail,
            }),
            _ => Err(errors),
        }
    }

    fn required_string(&self, field: &str, errors: &mut ValidationErrors) -> Option<String> {
        match self.fields.get(field) {
            None => {
                errors.add(field, required_message(field));
                None
            }
            Some(FieldValue::Text(s)) => Some(s.clone()),
            Some(_) => {
                errors.add(
                    field,
                    format!("The {} field must be a string.", attribute(field)),
                );
                None
            }
        }
    }

    fn required_number(&self, field: &str, errors: &mut ValidationErrors) -> Option<f64> {
        let parsed = match self.fields.get(field) {
            None => {
                errors.add(field, required_message(field));
                return None;
            }
            Some(FieldValue::Text(s)) => s.parse::<f64>().ok(),
            Some(FieldValue::Number(n)) => Some(*n),
            Some(FieldValue::Other) => None,
        };

        match parsed {
            Some(n) if n.is_finite() => Some(n),
            _ => {
                errors.add(
                    field,
                    format!("The {} field must be a number.", attribute(field)),
                );
                None
            }
        }
    }
}

fn required_message(field: &str) -> String {
    format!("The {} field is required.", attribute(field))
}

fn thumbnail_message(error: &ImageError) -> String {
    match error {
        ImageError::Unreadable(_) | ImageError::NotAnImage => {
            "The thumbnail field must be an image.".to_string()
        }
        ImageError::UnsupportedFormat(_) => {
            "The thumbnail field must be a file of type: jpeg, jpg, png.".to_string()
        }
        ImageError::TooLarge { .. } => format!(
            "The thumbnail field must not be greater than {} kilobytes.",
            MAX_THUMBNAIL_KB
        ),
    }
}
