use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported game version")]
    UnsupportedVersion,

    #[error("Module not loaded: {0}")]
    ModuleNotLoaded(String),

    #[error("Failed to read memory at address {address:#x}: {message}")]
    MemoryReadFailed { address: u64, message: String },

    #[error("Failed to write memory at address {address:#x}: {message}")]
    MemoryWriteFailed { address: u64, message: String },

    #[error("Probe mismatch at offset {offset:#x}: expected {expected:#010x}, found {found:#010x}")]
    ProbeMismatch {
        offset: u64,
        expected: u32,
        found: u32,
    },

    #[error("Invalid image header: {0}")]
    InvalidImage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a failed byte-pattern probe
    pub fn is_probe_mismatch(&self) -> bool {
        matches!(self, Error::ProbeMismatch { .. })
    }
}
