//! Blob storage for uploaded files.
//!
//! Resumes and company logos are written through the S3-compatible API of
//! the hosted store and served from its public object URL.

pub mod client;
pub mod error;
pub mod keys;

pub use client::{BlobClient, BlobConfig, BlobStore, StoredObject};
pub use error::{StorageError, StorageResult};
pub use keys::{logo_key, resume_key};
