use ggrc_core_types::RequestId;
use thiserror::Error;

/// Result type alias using GgrcError
pub type Result<T> = std::result::Result<T, GgrcError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable by the embedding UI for
/// programmatic handling (e.g. choosing which flash message to show).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input / attribute access
    InvalidInput,
    InvalidPath,

    // Snapshot resolution
    /// A snapshot's revision could not be resolved from the cache
    MissingRevision,

    // Persistence round-trips
    SaveFailed,
    RefreshFailed,
    /// Response body did not have the expected collection shape
    MalformedResponse,

    // Integration
    Serialization,
    ExternalService,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidPath => "ERR_INVALID_PATH",
            ExErrorKind::MissingRevision => "ERR_MISSING_REVISION",
            ExErrorKind::SaveFailed => "ERR_SAVE_FAILED",
            ExErrorKind::RefreshFailed => "ERR_REFRESH_FAILED",
            ExErrorKind::MalformedResponse => "ERR_MALFORMED_RESPONSE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// `ExError` is `Clone`: a single failed save is handed to every caller that
/// was queued for the same round.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (snapshot id, instance id, ...)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

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

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
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
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for GGRC client operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GgrcError {
    /// Attribute path is empty or contains an empty segment
    #[error("Invalid attribute path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Attribute path walks through a value that is not an object
    #[error("Attribute '{path}' is not an object")]
    NotAnObject { path: String },

    /// Snapshot has no resolved revision
    #[error("Revision is not defined for snapshot with ID: {snapshot_id}")]
    RevisionNotCached {
        snapshot_id: i64,
        revision_id: Option<i64>,
    },

    /// Server response is missing the expected collection envelope
    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String },

    /// A save round finished without delivering an outcome
    #[error("Save round for {model} dropped its callers")]
    RoundAbandoned { model: String },

    /// Serialization error (JSON/YAML encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<GgrcError> for ExError {
    fn from(err: GgrcError) -> Self {
        match err {
            GgrcError::InvalidPath { path, reason } => ExError::new(ExErrorKind::InvalidPath)
                .with_message(format!("Invalid attribute path '{}': {}", path, reason)),

            GgrcError::NotAnObject { path } => ExError::new(ExErrorKind::InvalidPath)
                .with_message(format!("Attribute '{}' is not an object", path)),

            GgrcError::RevisionNotCached {
                snapshot_id,
                revision_id,
            } => {
                let message = match revision_id {
                    Some(rev) => format!("Revision {} is not in the cache", rev),
                    None => "Snapshot has no revision_id".to_string(),
                };
                ExError::new(ExErrorKind::MissingRevision)
                    .with_op("resolve_revision")
                    .with_entity_id(snapshot_id.to_string())
                    .with_message(message)
            }

            GgrcError::MalformedResponse { reason } => {
                ExError::new(ExErrorKind::MalformedResponse).with_message(reason)
            }

            GgrcError::RoundAbandoned { model } => ExError::new(ExErrorKind::Internal)
                .with_op("deferred_save")
                .with_entity_id(model)
                .with_message("Save round ended without an outcome"),

            GgrcError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            GgrcError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for GgrcError {
    fn from(err: serde_json::Error) -> Self {
        GgrcError::Serialization {
            message: err.to_string(),
        }
    }
}
