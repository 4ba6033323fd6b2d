//! Application error type with process exit codes.
//!
//! Exit codes used by the `jwstmag` binary:
//! - 2: configuration or usage errors (bad config keys, unresolvable
//!   filters, invalid column selections, fit order below 2 in batch mode)
//! - 3: data errors (model grid or observation table unreadable, output
//!   write failure)
//! - 4: fit errors (degenerate independent variable) and internal errors

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Configuration or usage error (exit code 2).
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Data error: unreadable input or unwritable output (exit code 3).
    pub fn data(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Fit or internal error (exit code 4).
    pub fn fit(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_message_only() {
        let err = AppError::config("modelset must be one of Kurucz, Phoenix, blackbody, BOSZ");
        assert_eq!(
            format!("{err}"),
            "modelset must be one of Kurucz, Phoenix, blackbody, BOSZ"
        );
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn constructors_set_exit_codes() {
        assert_eq!(AppError::config("x").exit_code(), 2);
        assert_eq!(AppError::data("x").exit_code(), 3);
        assert_eq!(AppError::fit("x").exit_code(), 4);
    }
}
