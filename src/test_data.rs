//! Test data management
//!
//! Credential sets for the login scenarios, loaded from
//! `config/test_data.yaml` when present. Passwords never appear in Debug
//! output or logs.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TEST_DATA_PATH: &str = "config/test_data.yaml";

#[derive(Debug, Error)]
pub enum TestDataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// Keep passwords out of logs and failure reports.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TestData {
    pub valid_credentials: Credentials,
    pub invalid_credentials: Vec<Credentials>,
    pub users: HashMap<String, UserProfile>,
}

impl Default for TestData {
    fn default() -> Self {
        Self {
            valid_credentials: Credentials::new("test.user@example.com", "TestPassword123!"),
            invalid_credentials: vec![
                Credentials::new("invalid.user@example.com", "WrongPassword"),
                Credentials::new("nonexistent@example.com", "AnotherWrongPassword"),
                Credentials::new("test.user@example.com", ""),
                Credentials::new("invalid-email-format", "ValidPassword123!"),
                Credentials::new("test@", "ValidPassword123!"),
                Credentials::new("@example.com", "ValidPassword123!"),
            ],
            users: HashMap::new(),
        }
    }
}

impl TestData {
    /// Load from an explicit path (must exist), or the default path when
    /// present, falling back to built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, TestDataError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_TEST_DATA_PATH);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, TestDataError> {
        let raw = std::fs::read_to_string(path).map_err(|source| TestDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| TestDataError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn valid(&self) -> &Credentials {
        &self.valid_credentials
    }

    /// First invalid pair with a well-formed email but wrong password.
    pub fn wrong_password(&self) -> Credentials {
        self.invalid_credentials
            .iter()
            .find(|c| c.email.contains('@') && c.email.contains('.') && !c.password.is_empty())
            .cloned()
            .unwrap_or_else(|| Credentials::new("invalid.user@example.com", "WrongPassword"))
    }

    /// First invalid pair whose email is not a well-formed address.
    pub fn malformed_email(&self) -> Credentials {
        self.invalid_credentials
            .iter()
            .find(|c| !c.email.contains('@') || !c.email.contains('.'))
            .cloned()
            .unwrap_or_else(|| Credentials::new("invalid-email-format", "ValidPassword123!"))
    }

    pub fn user(&self, role: &str) -> Option<&UserProfile> {
        self.users.get(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_passwords() {
        let creds = Credentials::new("a@b.com", "hunter2");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("a@b.com"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn selectors_pick_sensible_invalid_pairs() {
        let data = TestData::default();
        let wrong = data.wrong_password();
        assert!(wrong.email.contains('@'));
        assert!(!wrong.password.is_empty());

        let malformed = data.malformed_email();
        assert!(!malformed.email.contains('@') || !malformed.email.contains('.'));
    }

    #[test]
    fn yaml_overrides_defaults() {
        let yaml = r#"
valid_credentials:
  email: coach@club.example
  password: S3cret!
users:
  coach:
    email: coach@club.example
    password: S3cret!
    role: coach
"#;
        let data: TestData = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(data.valid().email, "coach@club.example");
        assert_eq!(data.user("coach").unwrap().role, "coach");
        // Defaulted section stays populated.
        assert!(!data.invalid_credentials.is_empty());
    }
}
