//! Admin authentication.
//!
//! The session (`{user, token}`) is persisted to a local file and restored by
//! an explicit `AuthContext::bootstrap` at startup; its token becomes the
//! bearer header for every other command.

pub mod dtos;
pub mod handlers;
pub mod model;
pub mod services;
