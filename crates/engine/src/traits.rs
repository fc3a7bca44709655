/// Result type for capability operations that may be unsupported.
pub type CapResult<T> = Result<T, CapError>;

#[derive(Debug, thiserror::Error)]
pub enum CapError {
    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("dependency missing: {0}")]
    DependencyMissing(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

// ---------------------------------------------------------------------------
// Preference store
// ---------------------------------------------------------------------------

/// Process-external key-value store for adapter preferences (the display
/// theme, most notably). Independent of calculator state – clearing the
/// calculator never touches preferences.
pub trait PrefsStore: Send + Sync {
    fn get(&self, key: &str) -> CapResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> CapResult<()>;
}

// ---------------------------------------------------------------------------
// Clipboard operations
// ---------------------------------------------------------------------------

pub trait ClipboardOps: Send + Sync {
    fn read_text(&self) -> CapResult<String>;
    fn write_text(&self, text: &str) -> CapResult<()>;
}
