use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::features::auth::model::{AuthUser, Session};

/// Request DTO for admin login
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response DTO for `POST /auth/login`
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponseDto {
    pub token: String,
    pub user: AuthUser,
}

impl From<LoginResponseDto> for Session {
    fn from(response: LoginResponseDto) -> Self {
        Self {
            user: response.user,
            token: response.token,
        }
    }
}
