//! HTTP handlers.

pub mod access;
pub mod applications;
pub mod companies;
pub mod health;
pub mod jobs;
pub mod saved;

pub use access::*;
pub use applications::*;
pub use companies::*;
pub use health::*;
pub use jobs::*;
pub use saved::*;
