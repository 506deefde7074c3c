use crate::error::{GroupSyncError, Result, UpdateError};
use reqwest::Url;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_SHARED_CONFIG: &str = ".env.shared";
pub const DEFAULT_SECRET_CONFIG: &str = ".env.secret";

pub const ROOT_URL: &str = "ROOT_URL";
pub const API_ACCESS_TOKEN_PATH: &str = "API_ACCESS_TOKEN_PATH";
pub const API_COMPUTER_GROUP_PATH: &str = "API_COMPUTER_GROUP_PATH";
pub const CLIENT_ID: &str = "CLIENT_ID";
pub const CLIENT_SECRET: &str = "CLIENT_SECRET";
pub const HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Merged key/value settings. Secret entries win over non-secret ones.
#[derive(Debug, Clone, Default)]
pub struct Config {
    values: HashMap<String, String>,
}

impl Config {
    pub fn from_sources(
        non_secret: HashMap<String, String>,
        secret: HashMap<String, String>,
    ) -> Self {
        let mut values = non_secret;
        values.extend(secret);
        Config { values }
    }

    /// Reads both files without touching the process environment.
    /// A file that does not exist contributes nothing.
    pub fn load(non_secret: impl AsRef<Path>, secret: impl AsRef<Path>) -> Result<Self> {
        let shared = read_source(non_secret.as_ref())?;
        let secret = read_source(secret.as_ref())?;
        Ok(Self::from_sources(shared, secret))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Blank values count as missing. The value itself is returned untrimmed.
    pub fn require(&self, key: &str) -> Result<&str> {
        match self.get(key) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(GroupSyncError::MissingConfigKey(key.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn read_source(path: &Path) -> Result<HashMap<String, String>> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => {
            log::debug!("Config source {} not present, skipping", path.display());
            return Ok(HashMap::new());
        }
        Err(e) => {
            return Err(GroupSyncError::ConfigSource {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        }
    };

    let mut values = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| GroupSyncError::ConfigSource {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        values.insert(key, value);
    }
    Ok(values)
}

/// The required settings, resolved once so a missing key fails before any request.
#[derive(Clone)]
pub struct ApiSettings {
    pub root_url: String,
    pub token_path: String,
    pub group_path: String,
    pub client_id: String,
    pub client_secret: String,
    pub timeout: Duration,
}

impl ApiSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = match config.get(HTTP_TIMEOUT_SECS).map(str::trim) {
            None | Some("") => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(GroupSyncError::InvalidConfig {
                        key: HTTP_TIMEOUT_SECS.to_string(),
                        reason: format!("expected a positive number of seconds, got '{}'", raw),
                    })
                }
            },
        };

        let root_url = config.require(ROOT_URL)?.trim().to_string();
        match Url::parse(&root_url) {
            Ok(url) if !url.cannot_be_a_base() => {}
            Ok(_) => {
                return Err(GroupSyncError::InvalidConfig {
                    key: ROOT_URL.to_string(),
                    reason: format!("'{}' cannot carry a path", root_url),
                })
            }
            Err(e) => {
                return Err(GroupSyncError::InvalidConfig {
                    key: ROOT_URL.to_string(),
                    reason: e.to_string(),
                })
            }
        }

        Ok(ApiSettings {
            root_url,
            token_path: config.require(API_ACCESS_TOKEN_PATH)?.trim().to_string(),
            group_path: config.require(API_COMPUTER_GROUP_PATH)?.trim().to_string(),
            client_id: config.require(CLIENT_ID)?.to_string(),
            client_secret: config.require(CLIENT_SECRET)?.to_string(),
            timeout,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn token_url(&self) -> String {
        join_url(&self.root_url, &[&self.token_path])
    }

    /// The group id is percent-encoded as one path segment.
    pub fn group_url(&self, group_id: &str) -> std::result::Result<Url, UpdateError> {
        if matches!(group_id, "" | "." | "..") {
            return Err(UpdateError::InvalidGroupId(group_id.to_string()));
        }

        let base = join_url(&self.root_url, &[&self.group_path]);
        let mut url = Url::parse(&base).map_err(|e| UpdateError::InvalidUrl {
            url: base.clone(),
            reason: e.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|_| UpdateError::InvalidUrl {
                url: base.clone(),
                reason: "URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .push(group_id);
        Ok(url)
    }
}

impl std::fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSettings")
            .field("root_url", &self.root_url)
            .field("token_path", &self.token_path)
            .field("group_path", &self.group_path)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn join_url(root: &str, segments: &[&str]) -> String {
    let mut url = root.trim_end_matches('/').to_string();
    for segment in segments {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        url.push('/');
        url.push_str(segment);
    }
    url
}
