//! File uploads attached to forms.
//!
//! MIME types are checked before anything is written to blob storage.

use std::fmt;

use crate::validation::InputError;

/// Accepted resume formats.
pub const RESUME_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Accepted company logo formats.
pub const LOGO_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/jpg", "image/webp"];

/// What an upload is for, which decides the allowed MIME set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Resume,
    Logo,
}

impl UploadKind {
    pub fn allowed_types(&self) -> &'static [&'static str] {
        match self {
            UploadKind::Resume => RESUME_MIME_TYPES,
            UploadKind::Logo => LOGO_MIME_TYPES,
        }
    }

    /// Form field the upload belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            UploadKind::Resume => "resume",
            UploadKind::Logo => "logo",
        }
    }

    fn type_message(&self) -> &'static str {
        match self {
            UploadKind::Resume => "Only PDF or Word documents are allowed",
            UploadKind::Logo => "Only PNG, JPEG or WEBP images are allowed",
        }
    }

    fn required_message(&self) -> &'static str {
        match self {
            UploadKind::Resume => "Resume is required",
            UploadKind::Logo => "Logo is required",
        }
    }
}

/// An in-memory file submitted with a form.
#[derive(Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Check presence and MIME type for the given purpose.
    pub fn validate(&self, kind: UploadKind) -> Result<(), InputError> {
        if self.bytes.is_empty() {
            return Err(InputError::field(kind.field(), kind.required_message()));
        }
        let content_type = self.essence();
        if !kind.allowed_types().contains(&content_type.as_str()) {
            return Err(InputError::field(kind.field(), kind.type_message()));
        }
        Ok(())
    }

    /// Content type without parameters, lowercased.
    fn essence(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_accepts_pdf_and_docx() {
        let pdf = Upload::new("cv.pdf", "application/pdf", vec![1]);
        assert!(pdf.validate(UploadKind::Resume).is_ok());
        let docx = Upload::new(
            "cv.docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            vec![1],
        );
        assert!(docx.validate(UploadKind::Resume).is_ok());
    }

    #[test]
    fn test_resume_rejects_image() {
        let png = Upload::new("cv.png", "image/png", vec![1]);
        let err = png.validate(UploadKind::Resume).unwrap_err();
        assert_eq!(err.message_for("resume"), Some("Only PDF or Word documents are allowed"));
    }

    #[test]
    fn test_logo_ignores_parameters_and_case() {
        let logo = Upload::new("l.png", "Image/PNG; charset=binary", vec![1]);
        assert!(logo.validate(UploadKind::Logo).is_ok());
    }

    #[test]
    fn test_empty_upload_is_missing() {
        let empty = Upload::new("l.png", "image/png", Vec::new());
        let err = empty.validate(UploadKind::Logo).unwrap_err();
        assert_eq!(err.message_for("logo"), Some("Logo is required"));
    }
}
