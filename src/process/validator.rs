use std::collections::HashMap;
use std::path::Path;

use crate::process::error::SubprocessError;

/// Validation of launch parameters, run before any OS resource is allocated.
///
/// Only values the OS could never accept are rejected here. Size limits are
/// left to the OS, which reports them as a spawn failure.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a full command vector: program name plus arguments.
    ///
    /// # Errors
    ///
    /// Returns [`SubprocessError::InvalidConfiguration`] if the vector is
    /// empty or any element fails [`validate_program`](Self::validate_program)
    /// or [`validate_args`](Self::validate_args).
    ///
    /// # Examples
    /// ```rust
    /// use tcrm_subprocess::process::validator::ConfigValidator;
    ///
    /// let command = vec!["echo".to_string(), "hello world".to_string()];
    /// assert!(ConfigValidator::validate_command_line(&command).is_ok());
    /// assert!(ConfigValidator::validate_command_line(&[]).is_err());
    /// ```
    pub fn validate_command_line(command: &[String]) -> Result<(), SubprocessError> {
        let (program, args) = command.split_first().ok_or_else(|| {
            SubprocessError::InvalidConfiguration("Command line cannot be empty".to_string())
        })?;
        Self::validate_program(program)?;
        Self::validate_args(args)
    }

    /// Validates the program name.
    ///
    /// # Errors
    ///
    /// Returns [`SubprocessError::InvalidConfiguration`] if:
    /// - the name is empty or whitespace only
    /// - the name has leading or trailing whitespace
    /// - the name contains a null byte
    ///
    /// # Examples
    /// ```rust
    /// use tcrm_subprocess::process::validator::ConfigValidator;
    ///
    /// assert!(ConfigValidator::validate_program("echo").is_ok());
    /// assert!(ConfigValidator::validate_program(" echo").is_err());
    /// ```
    pub fn validate_program(program: &str) -> Result<(), SubprocessError> {
        if program.trim().is_empty() {
            return Err(SubprocessError::InvalidConfiguration(
                "Command cannot be empty".to_string(),
            ));
        }
        if program.trim() != program {
            return Err(SubprocessError::InvalidConfiguration(
                "Command cannot have leading or trailing whitespace".to_string(),
            ));
        }
        if program.contains('\0') {
            return Err(SubprocessError::InvalidConfiguration(
                "Command contains null characters".to_string(),
            ));
        }
        Ok(())
    }

    /// Validates arguments.
    ///
    /// Empty arguments and arguments with spaces are legal; they are passed
    /// to the child verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`SubprocessError::InvalidConfiguration`] if any argument
    /// contains a null byte. The message names the argument by position.
    pub fn validate_args(args: &[String]) -> Result<(), SubprocessError> {
        for (index, arg) in args.iter().enumerate() {
            if arg.contains('\0') {
                return Err(SubprocessError::InvalidConfiguration(format!(
                    "Argument {} ({} bytes) contains null characters",
                    index + 1,
                    arg.len()
                )));
            }
        }
        Ok(())
    }

    /// Validates the working directory path.
    ///
    /// # Errors
    ///
    /// Returns [`SubprocessError::InvalidConfiguration`] if:
    /// - the directory does not exist
    /// - the path exists but is not a directory
    /// - the path contains a null byte
    ///
    /// # Examples
    /// ```rust
    /// use tcrm_subprocess::process::validator::ConfigValidator;
    /// use std::env;
    ///
    /// let dir = env::temp_dir();
    /// assert!(ConfigValidator::validate_working_dir(dir.to_str().unwrap()).is_ok());
    /// assert!(ConfigValidator::validate_working_dir("/definitely/not/here").is_err());
    /// ```
    pub fn validate_working_dir(dir: &str) -> Result<(), SubprocessError> {
        if dir.contains('\0') {
            return Err(SubprocessError::InvalidConfiguration(
                "Working directory contains null characters".to_string(),
            ));
        }

        let path = Path::new(dir);
        if !path.exists() {
            return Err(SubprocessError::InvalidConfiguration(format!(
                "Working directory '{dir}' does not exist"
            )));
        }
        if !path.is_dir() {
            return Err(SubprocessError::InvalidConfiguration(format!(
                "Working directory '{dir}' is not a directory"
            )));
        }
        Ok(())
    }

    /// Validates environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`SubprocessError::InvalidConfiguration`] if:
    /// - a key is empty or contains `=`
    /// - a key or value contains a null byte
    ///
    /// # Examples
    /// ```rust
    /// use tcrm_subprocess::process::validator::ConfigValidator;
    /// use std::collections::HashMap;
    ///
    /// let mut env = HashMap::new();
    /// env.insert("HELLO".to_string(), "world".to_string());
    /// assert!(ConfigValidator::validate_env_vars(&env).is_ok());
    ///
    /// env.insert("BAD=KEY".to_string(), "value".to_string());
    /// assert!(ConfigValidator::validate_env_vars(&env).is_err());
    /// ```
    pub fn validate_env_vars(env: &HashMap<String, String>) -> Result<(), SubprocessError> {
        for (key, value) in env {
            if key.is_empty() {
                return Err(SubprocessError::InvalidConfiguration(
                    "Environment variable key cannot be empty".to_string(),
                ));
            }
            if key.contains('=') {
                return Err(SubprocessError::InvalidConfiguration(format!(
                    "Environment variable key '{key}' cannot contain '='"
                )));
            }
            if key.contains('\0') || value.contains('\0') {
                return Err(SubprocessError::InvalidConfiguration(format!(
                    "Environment variable '{}' contains null characters",
                    key.escape_debug()
                )));
            }
        }
        Ok(())
    }
}
