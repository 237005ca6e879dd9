// deathcounter-config/src/validation.rs
//! Custom validation functions for configuration.

use std::path::Path;

use validator::ValidationError;

/// Validate that the data file path names a file, not a bare directory.
pub fn validate_data_file(path: &Path) -> Result<(), ValidationError> {
    match path.file_name() {
        Some(name) if !name.is_empty() => Ok(()),
        _ => Err(ValidationError::new("invalid_data_file")),
    }
}

/// Validate log level name.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let re = regex::Regex::new("^(?i)(trace|debug|info|warn|error|off)$")
        .map_err(|_| ValidationError::new("invalid_regex"))?;
    if re.is_match(level) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}
