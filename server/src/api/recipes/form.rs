//! Request body extraction for recipe creation.
//!
//! The form may arrive as `multipart/form-data` (the only way to attach a
//! thumbnail), `application/x-www-form-urlencoded` or `application/json`.
//! Whatever the encoding, the fields end up in a [`RecipeForm`] and are judged
//! by the same rules.

use std::collections::HashMap;

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Form, Json,
};
use dapur_core::{RecipeForm, Upload};
use serde_json::Value;

use crate::error::ApiError;

/// Extractor producing an unvalidated [`RecipeForm`].
pub struct RecipeFormBody(pub RecipeForm);

impl<S> FromRequest<S> for RecipeFormBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let form = if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| malformed(e.status(), e.body_text()))?;
            read_multipart(multipart).await?
        } else if content_type.starts_with("application/json") {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| malformed(e.status(), e.body_text()))?;
            read_json(value)?
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| malformed(e.status(), e.body_text()))?;
            let mut form = RecipeForm::new();
            for (name, value) in &fields {
                form.insert_text(name, value);
            }
            form
        } else {
            // No usable body: every required field is reported missing
            RecipeForm::new()
        };

        Ok(RecipeFormBody(form))
    }
}

fn malformed(status: StatusCode, message: String) -> ApiError {
    ApiError::Malformed { status, message }
}

async fn read_multipart(mut multipart: Multipart) -> Result<RecipeForm, ApiError> {
    let mut form = RecipeForm::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| malformed(e.status(), e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| malformed(e.status(), e.body_text()))?;
                if name == "thumbnail" {
                    form.set_thumbnail(Upload {
                        file_name,
                        data: data.to_vec(),
                    });
                } else {
                    form.insert_other(&name);
                }
            }
            None => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| malformed(e.status(), e.body_text()))?;
                form.insert_text(&name, &text);
            }
        }
    }

    Ok(form)
}

fn read_json(value: Value) -> Result<RecipeForm, ApiError> {
    let Value::Object(fields) = value else {
        return Err(malformed(
            StatusCode::BAD_REQUEST,
            "Request body must be a JSON object".to_string(),
        ));
    };

    let mut form = RecipeForm::new();
    for (name, value) in &fields {
        match value {
            Value::Null => {}
            Value::String(s) => form.insert_text(name, s),
            Value::Number(n) => match n.as_f64() {
                Some(n) => form.insert_number(name, n),
                None => form.insert_other(name),
            },
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => form.insert_other(name),
        }
    }

    Ok(form)
}
