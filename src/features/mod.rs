pub mod auth;
pub mod categories;
pub mod master_data;
