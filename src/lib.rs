//! Terminal administration client for the store catalog backend.
//!
//! `features` holds one folder per admin area (auth, categories, master data),
//! each split into models, dtos, clients, services and CLI handlers. `core`
//! carries configuration, the error type and the HTTP client; `shared` the
//! cross-feature pieces such as the error banner and confirmation prompts.

pub mod core;
pub mod features;
pub mod shared;
