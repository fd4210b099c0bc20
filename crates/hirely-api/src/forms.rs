//! Multipart form decoding for the upload endpoints.

use std::collections::HashMap;

use axum::extract::Multipart;

use hirely_models::{Education, InputError, NewApplication, NewCompany, Upload, UploadKind};

use crate::error::{ApiError, ApiResult};

/// Text fields plus at most one file, keyed by form field name.
#[derive(Debug, Default)]
struct FormParts {
    text: HashMap<String, String>,
    files: HashMap<String, Upload>,
}

impl FormParts {
    async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut parts = FormParts::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("Failed to read {}: {}", name, e)))?;
                    parts
                        .files
                        .insert(name, Upload::new(file_name, content_type, bytes.to_vec()));
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("Failed to read {}: {}", name, e)))?;
                    parts.text.insert(name, value);
                }
            }
        }

        Ok(parts)
    }

    fn text(&self, name: &str) -> String {
        self.text.get(name).map(|v| v.trim().to_string()).unwrap_or_default()
    }

    /// The uploaded file; a missing file becomes an empty upload so the
    /// type check reports it like any other field.
    fn take_file(&mut self, kind: UploadKind) -> Upload {
        self.files
            .remove(kind.field())
            .unwrap_or_else(|| Upload::new("", "", Vec::new()))
    }
}

fn parse_education(raw: &str) -> Option<Education> {
    serde_json::from_value(serde_json::Value::String(raw.to_string())).ok()
}

/// Decode the apply form: name, experience, skills, education and resume.
pub async fn read_application_form(multipart: Multipart) -> ApiResult<(NewApplication, Upload)> {
    let mut parts = FormParts::read(multipart).await?;
    let mut errors = InputError::default();

    let experience = match parts.text("experience").parse::<i32>() {
        Ok(years) => years,
        Err(_) => {
            errors.push("experience", "Experience must be a number");
            0
        }
    };

    let education = match parse_education(&parts.text("education")) {
        Some(education) => education,
        None => {
            errors.push("education", "Education is required");
            Education::Intermediate
        }
    };

    if !errors.is_empty() {
        return Err(errors.into());
    }

    let form = NewApplication {
        name: parts.text("name"),
        experience,
        skills: parts.text("skills"),
        education,
    };
    Ok((form, parts.take_file(UploadKind::Resume)))
}

/// Decode the company form: name and logo.
pub async fn read_company_form(multipart: Multipart) -> ApiResult<(NewCompany, Upload)> {
    let mut parts = FormParts::read(multipart).await?;
    let form = NewCompany {
        name: parts.text("name"),
    };
    Ok((form, parts.take_file(UploadKind::Logo)))
}
