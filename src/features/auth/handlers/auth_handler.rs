use std::io::Write;

use chrono::Utc;
use clap::Args;

use crate::core::error::Result;
use crate::core::http::ApiClient;
use crate::features::auth::dtos::LoginRequestDto;
use crate::features::auth::services::AuthContext;
use crate::shared::banner::ErrorBanner;
use crate::shared::password::PasswordPrompt;

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long, env = "CATALOG_EMAIL")]
    pub email: String,

    /// Prompted for (without echo) when omitted
    #[arg(long, env = "CATALOG_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

pub async fn login(
    auth: &mut AuthContext,
    api: &ApiClient,
    args: LoginArgs,
    prompt: &mut dyn PasswordPrompt,
    out: &mut dyn Write,
) -> Result<bool> {
    let password = match args.password {
        Some(password) => password,
        None => prompt.read_password("Password")?,
    };

    let dto = LoginRequestDto {
        email: args.email,
        password,
    };

    match auth.login(api, dto).await {
        Ok(session) => {
            writeln!(out, "Logged in as {} <{}>", session.user.name, session.user.email)?;
            Ok(true)
        }
        Err(e) => {
            let mut banner = ErrorBanner::new();
            banner.show(&e);
            if let Some(line) = banner.render() {
                writeln!(out, "{}", line)?;
            }
            Ok(false)
        }
    }
}

pub fn logout(auth: &mut AuthContext, out: &mut dyn Write) -> Result<bool> {
    if auth.logout()? {
        writeln!(out, "Logged out")?;
    } else {
        writeln!(out, "Not logged in")?;
    }
    Ok(true)
}

pub fn whoami(auth: &AuthContext, out: &mut dyn Write) -> Result<bool> {
    let Some(session) = auth.session() else {
        writeln!(out, "Not logged in")?;
        return Ok(false);
    };

    writeln!(out, "{} <{}>", session.user.name, session.user.email)?;
    if let Some(role) = &session.user.role {
        writeln!(out, "Role:    {}", role)?;
    }
    if let Some(expires_at) = session.expires_at() {
        let minutes = (expires_at - Utc::now()).num_minutes();
        writeln!(
            out,
            "Expires: {} ({} min left)",
            expires_at.format("%Y-%m-%d %H:%M UTC"),
            minutes
        )?;
    }
    writeln!(out, "Session: {}", auth.path().display())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::password::LinePassword;
    use crate::shared::test_helpers::{spawn_mock_backend, test_api_client, TEST_PASSWORD};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_login_reads_password_from_input_then_whoami() {
        let backend = spawn_mock_backend(Vec::new()).await;
        let dir = TempDir::new().unwrap();
        let mut auth = AuthContext::bootstrap(dir.path().join("session.json")).unwrap();

        let input = format!("{}\n", TEST_PASSWORD);
        let mut shown = Vec::new();
        let mut prompt = LinePassword::new(input.as_bytes(), &mut shown);
        let mut out = Vec::new();
        let ok = login(
            &mut auth,
            &test_api_client(&backend.base_url),
            LoginArgs {
                email: "admin@example.com".to_string(),
                password: None,
            },
            &mut prompt,
            &mut out,
        )
        .await
        .unwrap();

        assert!(ok);
        assert_eq!(String::from_utf8(shown).unwrap(), "Password: ");
        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed, "Logged in as Store Admin <admin@example.com>\n");

        let mut out = Vec::new();
        assert!(whoami(&auth, &mut out).unwrap());
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("Store Admin <admin@example.com>\nRole:    admin\n"));
        assert!(printed.contains("Expires:"));
    }

    #[tokio::test]
    async fn test_failed_login_prints_banner() {
        let backend = spawn_mock_backend(Vec::new()).await;
        let dir = TempDir::new().unwrap();
        let mut auth = AuthContext::bootstrap(dir.path().join("session.json")).unwrap();

        let mut prompt = LinePassword::new("".as_bytes(), Vec::new());
        let mut out = Vec::new();
        let ok = login(
            &mut auth,
            &test_api_client(&backend.base_url),
            LoginArgs {
                email: "admin@example.com".to_string(),
                password: Some("wrong".to_string()),
            },
            &mut prompt,
            &mut out,
        )
        .await
        .unwrap();

        assert!(!ok);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[error] Invalid credentials  (dismiss: x)\n"
        );
    }

    #[test]
    fn test_logout_and_whoami_without_session() {
        let dir = TempDir::new().unwrap();
        let mut auth = AuthContext::bootstrap(dir.path().join("session.json")).unwrap();

        let mut out = Vec::new();
        assert!(logout(&mut auth, &mut out).unwrap());
        assert!(!whoami(&auth, &mut out).unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), "Not logged in\nNot logged in\n");
    }
}
