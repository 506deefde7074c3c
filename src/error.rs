use std::fmt;

#[derive(Debug)]
pub enum AuthError {
    Request(reqwest::Error),
    Status { status: u16, body: String },
    MalformedResponse(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Request(e) if e.is_timeout() => {
                write!(f, "token request timed out: {}", e)
            }
            AuthError::Request(e) => write!(f, "token request failed: {}", e),
            AuthError::Status { status, body } => {
                write!(f, "token endpoint returned status {}: {}", status, body)
            }
            AuthError::MalformedResponse(msg) => {
                write!(f, "malformed token response: {}", msg)
            }
        }
    }
}

#[derive(Debug)]
pub enum UpdateError {
    Payload(String),
    InvalidGroupId(String),
    InvalidUrl { url: String, reason: String },
    Request(reqwest::Error),
    Status { status: u16, body: String },
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateError::Payload(msg) => write!(f, "could not build group document: {}", msg),
            UpdateError::InvalidGroupId(id) => {
                write!(f, "group id '{}' cannot be used as a path segment", id)
            }
            UpdateError::InvalidUrl { url, reason } => {
                write!(f, "invalid group URL {}: {}", url, reason)
            }
            UpdateError::Request(e) if e.is_timeout() => {
                write!(f, "group update request timed out: {}", e)
            }
            UpdateError::Request(e) => write!(f, "group update request failed: {}", e),
            UpdateError::Status { status, body } => {
                write!(f, "group update returned status {}: {}", status, body)
            }
        }
    }
}

#[derive(Debug)]
pub enum GroupSyncError {
    Usage(String),
    MissingConfigKey(String),
    InvalidConfig { key: String, reason: String },
    ConfigSource { path: String, reason: String },
    HttpClient(reqwest::Error),
    Auth(AuthError),
    FileNotFound(String),
    MissingColumn { column: String, path: String },
    CsvError(csv::Error),
    IoError(std::io::Error),
    Update(UpdateError),
}

impl GroupSyncError {
    pub fn exit_code(&self) -> i32 {
        match self {
            GroupSyncError::Usage(_) => 1,
            GroupSyncError::MissingConfigKey(_)
            | GroupSyncError::InvalidConfig { .. }
            | GroupSyncError::ConfigSource { .. } => 2,
            GroupSyncError::Auth(_) => 3,
            GroupSyncError::FileNotFound(_)
            | GroupSyncError::MissingColumn { .. }
            | GroupSyncError::CsvError(_)
            | GroupSyncError::IoError(_) => 4,
            GroupSyncError::HttpClient(_) | GroupSyncError::Update(_) => 5,
        }
    }
}

impl fmt::Display for GroupSyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupSyncError::Usage(msg) => write!(f, "{}", msg),
            GroupSyncError::MissingConfigKey(key) => {
                write!(f, "Missing required configuration key: {}", key)
            }
            GroupSyncError::InvalidConfig { key, reason } => {
                write!(f, "Invalid value for configuration key {}: {}", key, reason)
            }
            GroupSyncError::ConfigSource { path, reason } => {
                write!(f, "Could not read configuration file {}: {}", path, reason)
            }
            GroupSyncError::HttpClient(e) => write!(f, "Could not create HTTP client: {}", e),
            GroupSyncError::Auth(e) => write!(f, "Authentication failed: {}", e),
            GroupSyncError::FileNotFound(path) => write!(f, "File not found: {}", path),
            GroupSyncError::MissingColumn { column, path } => {
                write!(f, "Column '{}' not found in {}", column, path)
            }
            GroupSyncError::CsvError(e) => write!(f, "CSV error: {}", e),
            GroupSyncError::IoError(e) => write!(f, "I/O error: {}", e),
            GroupSyncError::Update(e) => write!(f, "Update failed: {}", e),
        }
    }
}

impl std::error::Error for GroupSyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GroupSyncError::CsvError(e) => Some(e),
            GroupSyncError::IoError(e) => Some(e),
            GroupSyncError::HttpClient(e) => Some(e),
            GroupSyncError::Auth(AuthError::Request(e)) => Some(e),
            GroupSyncError::Update(UpdateError::Request(e)) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for GroupSyncError {
    fn from(err: csv::Error) -> Self {
        GroupSyncError::CsvError(err)
    }
}

impl From<std::io::Error> for GroupSyncError {
    fn from(err: std::io::Error) -> Self {
        GroupSyncError::IoError(err)
    }
}

impl From<AuthError> for GroupSyncError {
    fn from(err: AuthError) -> Self {
        GroupSyncError::Auth(err)
    }
}

impl From<UpdateError> for GroupSyncError {
    fn from(err: UpdateError) -> Self {
        GroupSyncError::Update(err)
    }
}

pub type Result<T> = std::result::Result<T, GroupSyncError>;
