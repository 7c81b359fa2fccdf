//! Persisted client credentials.
//!
//! The session lives in a small key-value JSON file holding two string
//! values: `token` and `user` (itself a JSON-encoded [`SessionUser`]). The
//! store is consulted before every request so a token written by another
//! process is picked up without restarting.

use garage_core::SessionUser;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub trait CredentialStore: Send + Sync {
    fn token(&self) -> Option<String>;

    fn user(&self) -> Option<SessionUser>;

    /// Both values are present; pages behind the session guard render.
    fn is_authenticated(&self) -> bool {
        self.token().is_some() && self.user().is_some()
    }
}

/// `Authorization` header value for the current token, if any.
pub fn authorization_header(store: &dyn CredentialStore) -> Option<String> {
    store
        .token()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .map(|t| format!("Token {}", t))
}

/// Credential store backed by a JSON key-value file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, token: &str, user: &SessionUser) -> Result<(), CredentialError> {
        let mut values = self.load()?;
        values.insert(TOKEN_KEY.to_string(), token.to_string());
        values.insert(USER_KEY.to_string(), serde_json::to_string(user)?);
        self.write(&values)
    }

    pub fn clear(&self) -> Result<(), CredentialError> {
        let mut values = self.load()?;
        values.remove(TOKEN_KEY);
        values.remove(USER_KEY);
        self.write(&values)
    }

    fn load(&self) -> Result<HashMap<String, String>, CredentialError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write(&self, values: &HashMap<String, String>) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(values)?)?;
        Ok(())
    }

    fn value(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(mut values) => values.remove(key).filter(|v| !v.trim().is_empty()),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "Unreadable credentials file");
                None
            }
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn token(&self) -> Option<String> {
        self.value(TOKEN_KEY)
    }

    fn user(&self) -> Option<SessionUser> {
        let raw = self.value(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!(error = %err, "Persisted user is not valid JSON");
                None
            }
        }
    }
}

/// In-process credential store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
    user: RwLock<Option<SessionUser>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(token: impl Into<String>, user: SessionUser) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
            user: RwLock::new(Some(user)),
        }
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }

    pub fn set_user(&self, user: Option<SessionUser>) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = user;
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn user(&self) -> Option<SessionUser> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garage_core::UserRole;

    fn admin() -> SessionUser {
        SessionUser {
            id: "u1".to_string(),
            name: "Admin".to_string(),
            email: "admin@garage.test".to_string(),
            role: UserRole::Admin,
        }
    }

    #[test]
    fn header_uses_token_prefix() {
        let store = MemoryCredentialStore::with_session("abc123", admin());
        assert_eq!(
            authorization_header(&store),
            Some("Token abc123".to_string())
        );
    }

    #[test]
    fn blank_token_means_no_header() {
        let store = MemoryCredentialStore::new();
        store.set_token(Some("   ".to_string()));
        assert_eq!(authorization_header(&store), None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("session/credentials.json"));
        assert!(store.token().is_none());

        store.save("tok", &admin()).unwrap();
        assert_eq!(store.token(), Some("tok".to_string()));
        assert_eq!(store.user(), Some(admin()));
        assert!(store.is_authenticated());

        // The user value is stored as an encoded string, not a nested object.
        let raw = std::fs::read_to_string(store.path()).unwrap();
        let values: HashMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert!(values["user"].contains("admin@garage.test"));

        store.clear().unwrap();
        assert!(store.token().is_none());
        assert!(store.user().is_none());
    }

    #[test]
    fn corrupt_user_is_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, r#"{"token":"t","user":"not json"}"#).unwrap();
        let store = FileCredentialStore::new(&path);
        assert_eq!(store.token(), Some("t".to_string()));
        assert!(store.user().is_none());
        assert!(!store.is_authenticated());
    }
}
