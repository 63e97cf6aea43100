//! Master data: shared reference lists reused across products.
//!
//! Every kind is a flat list behind its own REST collection
//! (`/colors`, `/sizes`, ...) with the same item shape. Colors additionally
//! carry a `#RRGGBB` hex code.

pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
