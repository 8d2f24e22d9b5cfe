use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("volume must be between 0 and 100, got {value}")]
    OutOfRange { value: i64 },
    #[error("failed to run {program}: {source}")]
    Run {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}")]
    Failed { program: String, status: ExitStatus },
    #[error("failed to parse volume")]
    Unparseable,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
}
