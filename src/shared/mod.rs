pub mod banner;
pub mod confirm;
pub mod constants;
pub mod password;
pub mod types;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;
