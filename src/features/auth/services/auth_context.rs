use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::http::ApiClient;
use crate::features::auth::dtos::{LoginRequestDto, LoginResponseDto};
use crate::features::auth::model::{AuthUser, Session};

const LOGIN_PATH: &str = "auth/login";

/// Owner of the current session.
///
/// The session file is read once in `bootstrap`; afterwards the in-memory
/// value is authoritative and every change is written straight back.
#[derive(Debug)]
pub struct AuthContext {
    path: PathBuf,
    session: Option<Session>,
}

impl AuthContext {
    /// Load the persisted session, discarding it if it is unreadable or expired
    pub fn bootstrap(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut context = Self {
            session: read_session(&path)?,
            path,
        };

        if let Some(session) = &context.session {
            if session.is_expired(Utc::now()) {
                tracing::info!("Stored session for {} has expired", session.user.email);
                context.clear()?;
            } else {
                tracing::debug!("Restored session for {}", session.user.email);
            }
        }

        Ok(context)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn require_session(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| AppError::Unauthorized("You are not logged in.".to_string()))
    }

    /// Authenticate against the backend and persist the new session
    pub async fn login(&mut self, api: &ApiClient, dto: LoginRequestDto) -> Result<&Session> {
        let dto = LoginRequestDto {
            email: dto.email.trim().to_lowercase(),
            ..dto
        };
        dto.validate()?;

        let response: LoginResponseDto = api.post(LOGIN_PATH, &dto).await?;
        let session = Session::from(response);

        write_session(&self.path, &session)?;
        tracing::info!("Logged in as {}", session.user.email);
        Ok(&*self.session.insert(session))
    }

    /// Forget the session in memory and on disk; returns whether one existed
    pub fn logout(&mut self) -> Result<bool> {
        let had_session = self.session.is_some();
        self.clear()?;
        if had_session {
            tracing::info!("Logged out");
        }
        Ok(had_session)
    }

    fn clear(&mut self) -> Result<()> {
        self.session = None;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn read_session(path: &Path) -> Result<Option<Session>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_str(&contents) {
        Ok(session) => Ok(Some(session)),
        Err(e) => {
            tracing::warn!("Ignoring unreadable session file {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

fn write_session(path: &Path, session: &Session) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;

    // `mode` only applies when the file is created
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(&serde_json::to_vec_pretty(session)?)?;
    Ok(())
}
