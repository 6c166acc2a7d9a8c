use std::fmt;

// =========================================================
// Error status
// =========================================================

/// What went wrong, from the point of view of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeskErrorStatus {
    /// No response was received (network, CORS, request build failure).
    Transport,
    /// A response arrived but the backend rejected the operation.
    Rejected,
    /// A success response is missing fields the client needs.
    Malformed,
}

impl DeskErrorStatus {
    pub fn error_code(&self) -> &'static str {
        match self {
            DeskErrorStatus::Transport => "TRANSPORT_ERROR",
            DeskErrorStatus::Rejected => "REJECTED",
            DeskErrorStatus::Malformed => "MALFORMED_RESPONSE",
        }
    }
}

// =========================================================
// Error context
// =========================================================

/// One step of the operation trail attached to an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    /// Operation name, e.g. "api.solve", "session.login"
    pub operation: String,
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// Core error type
// =========================================================

/// Client-side error.
///
/// - status: transport / rejected / malformed
/// - message: free text; for `Rejected` this is the server-supplied `message`
///   (may be empty when the server gave none)
/// - source: underlying error, for debugging
/// - spans: operation trail
#[derive(Debug)]
pub struct DeskError {
    pub status: DeskErrorStatus,
    pub message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    spans: Vec<ErrorSpan>,
}

impl DeskError {
    pub fn new(status: DeskErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(DeskErrorStatus::Transport, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(DeskErrorStatus::Rejected, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(DeskErrorStatus::Malformed, message)
    }

    // --- Context builders ---

    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.status.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    /// Text for the page's single message slot.
    ///
    /// Server-supplied text wins; transport failures and empty messages show
    /// the page's own fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self.status {
            DeskErrorStatus::Transport => fallback.to_string(),
            DeskErrorStatus::Rejected | DeskErrorStatus::Malformed => {
                if self.message.trim().is_empty() {
                    fallback.to_string()
                } else {
                    self.message.clone()
                }
            }
        }
    }
}

impl fmt::Display for DeskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.error_code())?;
        if !self.message.is_empty() {
            write!(f, " {}", self.message)?;
        }

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for DeskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(e: serde_json::Error) -> Self {
        // Serde diagnostics go to the trail, never to the user-facing message.
        let detail = e.to_string();
        DeskError::malformed("").in_op_with("serde", detail).with_source(e)
    }
}

pub type DeskResult<T> = std::result::Result<T, DeskError>;
