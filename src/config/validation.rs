use super::models::HandleConfig;
use reqwest::header::{HeaderName, HeaderValue};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Marker carried by [`InvalidSettings`]
pub const SETTINGS_INVALID: &str = "settings invalid";

/// One failed configuration check
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("key: path to the private key is empty")]
    MissingKey,

    #[error("key: file '{0}' does not exist")]
    KeyNotFound(String),

    #[error("cert: path to the certificate is empty")]
    MissingCert,

    #[error("cert: file '{0}' does not exist")]
    CertNotFound(String),

    #[error("handle_name: must not be empty")]
    MissingHandleName,

    #[error("handle_url: must not be empty")]
    MissingHandleUrl,

    #[error("api_base_url: must not be empty")]
    MissingApiBaseUrl,

    #[error("{0}: must not be empty")]
    MissingPrefix(&'static str),

    #[error("permissions: must not be empty")]
    MissingPermissions,

    #[error("overwrite: expected 'true', 'false' or empty, got '{0}'")]
    InvalidOverwrite(String),

    #[error("extra_headers: '{0}' is not a valid HTTP header")]
    InvalidHeader(String),
}

impl ValidationError {
    /// Stable numeric code, one per rule
    pub fn code(&self) -> u16 {
        match self {
            ValidationError::MissingKey => 1,
            ValidationError::KeyNotFound(_) => 2,
            ValidationError::MissingCert => 3,
            ValidationError::CertNotFound(_) => 4,
            ValidationError::MissingHandleName => 5,
            ValidationError::MissingHandleUrl => 6,
            ValidationError::MissingApiBaseUrl => 7,
            ValidationError::MissingPrefix(_) => 8,
            ValidationError::MissingPermissions => 9,
            ValidationError::InvalidOverwrite(_) => 10,
            ValidationError::InvalidHeader(_) => 11,
        }
    }
}

/// Failure record as exposed to callers and the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub code: u16,
    pub message: String,
}

impl From<&ValidationError> for ValidationIssue {
    fn from(error: &ValidationError) -> Self {
        Self {
            code: error.code(),
            message: error.to_string(),
        }
    }
}

/// Every failure found in one validation pass, in check order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn issues(&self) -> Vec<ValidationIssue> {
        self.errors.iter().map(ValidationIssue::from).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Convert into an error for callers that branch on a single failure
    pub fn into_result(self) -> Result<(), InvalidSettings> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(InvalidSettings {
                errors: self.errors,
            })
        }
    }

    fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(error) = result {
            self.errors.push(error);
        }
    }
}

/// Aggregate error raised when any check failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {}", SETTINGS_INVALID, join_messages(.errors))]
pub struct InvalidSettings {
    errors: Vec<ValidationError>,
}

impl InvalidSettings {
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Code of the first failed check
    pub fn first_code(&self) -> u16 {
        self.errors.first().map(ValidationError::code).unwrap_or(0)
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Run every check against the configuration
///
/// Checks are independent: a failure in one field never hides failures in
/// another. Only the key and cert checks touch the filesystem.
pub fn validate(config: &HandleConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    report.check(validate_key(&config.key));
    report.check(validate_cert(&config.cert));
    report.check(require(&config.handle_name, ValidationError::MissingHandleName));
    report.check(require(&config.handle_url, ValidationError::MissingHandleUrl));
    report.check(require(&config.api_base_url, ValidationError::MissingApiBaseUrl));
    for component in config.prefix.empty_components() {
        report.errors.push(ValidationError::MissingPrefix(component));
    }
    report.check(require(&config.permissions, ValidationError::MissingPermissions));
    report.check(validate_overwrite(&config.overwrite));
    for (name, value) in &config.extra_headers {
        report.check(validate_header(name, value));
    }

    report
}

fn require(value: &str, missing: ValidationError) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(missing);
    }
    Ok(())
}

fn validate_key(path: &Path) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        return Err(ValidationError::MissingKey);
    }
    if !path.is_file() {
        return Err(ValidationError::KeyNotFound(path.display().to_string()));
    }
    Ok(())
}

fn validate_cert(path: &Path) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        return Err(ValidationError::MissingCert);
    }
    if !path.is_file() {
        return Err(ValidationError::CertNotFound(path.display().to_string()));
    }
    Ok(())
}

/// Case-sensitive: "True" is rejected
fn validate_overwrite(overwrite: &str) -> Result<(), ValidationError> {
    match overwrite {
        "" | "true" | "false" => Ok(()),
        other => Err(ValidationError::InvalidOverwrite(other.to_string())),
    }
}

fn validate_header(name: &str, value: &str) -> Result<(), ValidationError> {
    if HeaderName::from_bytes(name.as_bytes()).is_err() || HeaderValue::from_str(value).is_err()
    {
        return Err(ValidationError::InvalidHeader(name.to_string()));
    }
    Ok(())
}
