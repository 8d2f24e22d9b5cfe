use super::{AppError, ConfigError, ServerError, VolumeError};

impl From<&'static str> for ConfigError {
    fn from(message: &'static str) -> Self {
        ConfigError::TestExpectation { message }
    }
}

impl From<String> for ConfigError {
    fn from(value: String) -> Self {
        ConfigError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for VolumeError {
    fn from(message: &'static str) -> Self {
        VolumeError::TestExpectation { message }
    }
}

impl From<&'static str> for ServerError {
    fn from(message: &'static str) -> Self {
        ServerError::TestExpectation { message }
    }
}

impl From<String> for ServerError {
    fn from(value: String) -> Self {
        ServerError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for AppError {
    fn from(message: &'static str) -> Self {
        AppError::server(message)
    }
}

impl From<String> for AppError {
    fn from(value: String) -> Self {
        AppError::server(value)
    }
}
