use thiserror::Error;

/// Result type alias using ElError
pub type Result<T> = std::result::Result<T, ElError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be logged, asserted on in
/// tests, and used by callers to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElErrorKind {
    // Ordering / lifecycle
    AlreadyExists,
    NotStarted,
    NoSectionSelected,

    // Extraction
    UnknownSource,

    // Integration/IO
    Config,
    Io,

    // Runtime
    Panic,
}

impl ElErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ElErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ElErrorKind::NotStarted => "ERR_NOT_STARTED",
            ElErrorKind::NoSectionSelected => "ERR_NO_SECTION_SELECTED",
            ElErrorKind::UnknownSource => "ERR_UNKNOWN_SOURCE",
            ElErrorKind::Config => "ERR_CONFIG",
            ElErrorKind::Io => "ERR_IO",
            ElErrorKind::Panic => "ERR_PANIC",
        }
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for the instrumentation library and the daily pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElError {
    /// A named resource (e.g. a log sink) was created twice
    #[error("{resource} already exists")]
    AlreadyExists { resource: String },

    /// `start` was called on a section that already has a start time
    #[error("section '{section}' has already started")]
    AlreadyStarted { section: String },

    /// `end` was called on a section that already has an end time
    #[error("section '{section}' has already finished")]
    AlreadyEnded { section: String },

    /// `end` was called on a section that was never started
    #[error("section '{section}' has not been started")]
    NotStarted { section: String },

    /// `start`/`end` was called before any section was selected
    #[error("no section selected")]
    NoSectionSelected,

    /// Extraction dispatch received a source name it does not recognize
    #[error("Unknown source_name: {source_name}")]
    UnknownSource { source_name: String },

    /// Invalid pipeline configuration
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    /// Filesystem failure (config file, log file)
    #[error("I/O error on {path}: {reason}")]
    Io { path: String, reason: String },

    /// A pipeline step panicked; the panic is re-raised after logging
    #[error("panicked: {message}")]
    Panicked { message: String },
}

impl ElError {
    /// Classify this error into the stable kind taxonomy
    pub fn kind(&self) -> ElErrorKind {
        match self {
            ElError::AlreadyExists { .. }
            | ElError::AlreadyStarted { .. }
            | ElError::AlreadyEnded { .. } => ElErrorKind::AlreadyExists,
            ElError::NotStarted { .. } => ElErrorKind::NotStarted,
            ElError::NoSectionSelected => ElErrorKind::NoSectionSelected,
            ElError::UnknownSource { .. } => ElErrorKind::UnknownSource,
            ElError::Config { .. } => ElErrorKind::Config,
            ElError::Io { .. } => ElErrorKind::Io,
            ElError::Panicked { .. } => ElErrorKind::Panic,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    pub(crate) fn io(path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        ElError::Io {
            path: path.as_ref().display().to_string(),
            reason: err.to_string(),
        }
    }
}
