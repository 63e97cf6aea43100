//! Category hierarchy management.
//!
//! Categories arrive from the backend as a flat list; the tree and list views
//! are derived from that list on every render and thrown away afterwards.
//!
//! ## Commands
//!
//! | Command | Backend call | Description |
//! |---------|--------------|-------------|
//! | `categories tree` | `GET /categories` | Indented tree with expand/select |
//! | `categories list` | `GET /categories` | Searchable flat table |
//! | `categories show <id>` | `GET /categories/:id` | Detail panel |
//! | `categories create` | `POST /categories` | Create, then reload |
//! | `categories update <id>` | `PUT /categories/:id` | Partial update, then reload |
//! | `categories toggle <id>` | `PUT /categories/:id` | Flip `isActive`, then reload |
//! | `categories delete <id>` | `DELETE /categories/:id` | Confirmed delete, then reload |

pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
