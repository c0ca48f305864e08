use crashdiff_core_types::Path;
use thiserror::Error;

/// Result type alias using the canonical structured error
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (and the orchestration
/// scripts driving many comparisons) can match on without parsing messages.
/// Every kind is terminal for the comparison in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    /// A document cannot be interpreted under the value model at some path
    MalformedInput,
    /// The depth or node-count guard tripped
    TooLarge,

    // Configuration
    /// An ignore rule, comparator or alignment selector is malformed
    InvalidRule,
    /// The configuration document itself could not be read
    InvalidConfig,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::MalformedInput => "ERR_MALFORMED_INPUT",
            ExErrorKind::TooLarge => "ERR_TOO_LARGE",
            ExErrorKind::InvalidRule => "ERR_INVALID_RULE",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus the location the comparison was rejected
/// at: a document path for input errors, a pattern string for rule errors.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<Path>,
    pattern: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            pattern: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the document path the error refers to
    pub fn with_path(mut self, path: Path) -> Self {
        self.path = Some(path);
        self
    }

    /// Add the offending rule pattern
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(pattern) = &self.pattern {
            write!(f, " (pattern: {})", pattern)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Concrete failures raised inside the engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiffError {
    // ===== Input Errors =====
    /// Raw text is not JSON, or a value cannot be walked as expected
    #[error("Malformed input at {path}: {reason}")]
    MalformedInput { path: Path, reason: String },

    /// Nesting deeper than the configured limit
    #[error("Depth limit {max_depth} exceeded at {path}")]
    DepthLimitExceeded { path: Path, max_depth: usize },

    /// More nodes than the configured limit
    #[error("Node limit {max_nodes} exceeded at {path}")]
    NodeLimitExceeded { path: Path, max_nodes: usize },

    // ===== Rule Errors =====
    /// A path pattern failed to compile
    #[error("Invalid path pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A rule compiled but its parameters are unusable
    #[error("Invalid rule for `{pattern}`: {reason}")]
    InvalidRule { pattern: String, reason: String },

    // ===== Configuration Errors =====
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Generic Errors =====
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<DiffError> for ExError {
    fn from(err: DiffError) -> Self {
        match err {
            DiffError::MalformedInput { path, reason } => ExError::new(ExErrorKind::MalformedInput)
                .with_path(path)
                .with_message(reason),

            DiffError::DepthLimitExceeded { path, max_depth } => {
                ExError::new(ExErrorKind::TooLarge)
                    .with_path(path)
                    .with_message(format!("Nesting exceeds max_depth {}", max_depth))
            }

            DiffError::NodeLimitExceeded { path, max_nodes } => {
                ExError::new(ExErrorKind::TooLarge)
                    .with_path(path)
                    .with_message(format!("Document exceeds max_nodes {}", max_nodes))
            }

            DiffError::InvalidPattern { pattern, reason } => ExError::new(ExErrorKind::InvalidRule)
                .with_pattern(pattern)
                .with_message(format!("Invalid path pattern: {}", reason)),

            DiffError::InvalidRule { pattern, reason } => ExError::new(ExErrorKind::InvalidRule)
                .with_pattern(pattern)
                .with_message(reason),

            DiffError::InvalidConfig { reason } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(reason)
            }

            DiffError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error (configuration documents only)
impl From<serde_json::Error> for DiffError {
    fn from(err: serde_json::Error) -> Self {
        DiffError::InvalidConfig {
            reason: format!("JSON: {}", err),
        }
    }
}

/// Conversion from serde_yaml::Error
impl From<serde_yaml::Error> for DiffError {
    fn from(err: serde_yaml::Error) -> Self {
        DiffError::InvalidConfig {
            reason: format!("YAML: {}", err),
        }
    }
}
