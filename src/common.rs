pub mod error;
pub mod pagination;
pub mod serde_helpers;
pub mod validation;
