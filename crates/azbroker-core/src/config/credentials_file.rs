//! Credentials file reader
//!
//! Reads service principal secrets from an INI-style file, one section per
//! subscription:
//!
//! ```text
//! [2bc0d1a4-...-subscription]
//! tenant_id = "..."
//! client_id = "..."
//! client_secret = "..."
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::options::ConnectionOptions;
use super::traits::{ConfigError, ConfigResult, CredentialSource};

/// Keys copied from the selected section
const CREDENTIAL_KEYS: &[&str] = &["tenant_id", "client_id", "client_secret"];

/// Default location of the credentials file (`~/.azure/credentials`)
pub fn default_credentials_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".azure")
        .join("credentials")
}

/// One `[section]` of the credentials file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialSection {
    pub name: String,
    pub values: HashMap<String, String>,
}

/// Credential source backed by an INI-style file
#[derive(Debug, Clone, Default)]
pub struct FileCredentials {
    /// Used when the options carry no `credentials_file`
    fallback_path: Option<PathBuf>,
}

impl FileCredentials {
    /// Reader falling back to `~/.azure/credentials`
    pub fn new() -> Self {
        Self { fallback_path: None }
    }

    /// Reader falling back to a specific path
    pub fn with_fallback_path(path: impl Into<PathBuf>) -> Self {
        Self {
            fallback_path: Some(path.into()),
        }
    }

    /// The file that will be read for these options
    pub fn path_for(&self, options: &ConnectionOptions) -> PathBuf {
        options
            .credentials_file
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| self.fallback_path.clone())
            .unwrap_or_else(default_credentials_path)
    }

    /// Parse the sections of a credentials file, in file order
    pub fn parse(content: &str) -> Vec<CredentialSection> {
        let mut sections: Vec<CredentialSection> = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                sections.push(CredentialSection {
                    name: name.trim().to_string(),
                    values: HashMap::new(),
                });
                continue;
            }

            // Keys before the first section have nowhere to go
            let Some(section) = sections.last_mut() else {
                continue;
            };
            if let Some((k, v)) = line.split_once('=') {
                let value = v.trim().trim_matches('"').trim_matches('\'');
                section.values.insert(k.trim().to_string(), value.to_string());
            }
        }

        sections
    }

    /// Pick the section for a subscription
    ///
    /// The named subscription wins when present. Without one, a file with a
    /// single section is unambiguous; anything else is an error.
    fn select<'a>(
        path: &Path,
        sections: &'a [CredentialSection],
        subscription_id: Option<&str>,
    ) -> ConfigResult<Option<&'a CredentialSection>> {
        if let Some(id) = subscription_id {
            if let Some(section) = sections.iter().find(|s| s.name == id) {
                return Ok(Some(section));
            }
        }

        match sections.len() {
            0 => Ok(None),
            1 => Ok(sections.first()),
            n => Err(ConfigError::Malformed {
                path: path.display().to_string(),
                message: format!(
                    "{} subscriptions found and none matches {:?}; set subscription_id to choose one",
                    n,
                    subscription_id.unwrap_or("<unset>")
                ),
            }),
        }
    }
}

impl CredentialSource for FileCredentials {
    fn name(&self) -> &str {
        "file"
    }

    fn describe(&self, options: &ConnectionOptions) -> String {
        self.path_for(options).display().to_string()
    }

    fn load(&self, options: &ConnectionOptions) -> ConfigResult<HashMap<String, String>> {
        let path = self.path_for(options);
        if !path.is_file() {
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(&path)?;
        let sections = Self::parse(&content);

        let mut fields = HashMap::new();
        if let Some(section) = Self::select(&path, &sections, options.effective_subscription_id())? {
            fields.insert("subscription_id".to_string(), section.name.clone());
            for key in CREDENTIAL_KEYS {
                if let Some(value) = section.values.get(*key) {
                    fields.insert(key.to_string(), value.clone());
                }
            }
        }

        Ok(fields)
    }
}
