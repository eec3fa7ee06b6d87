use crate::tree::NodeId;
use thiserror::Error;

/// Result type alias using MoError
pub type Result<T> = std::result::Result<T, MoError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// raised by the tree model. Each kind maps to a stable error code that can be
/// used for programmatic error handling, testing, and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Registry lookups
    UnknownClass,
    UnknownAttribute,
    UnknownMember,

    // Construction
    Naming,
    Arity,

    // Dn resolution
    RnMismatch,
    UnresolvedSegment,

    // Tree structure
    ClassNameMismatch,
    Navigation,
    NotFound,

    // Configuration
    InvalidTemplate,
    InvalidRegistry,

    // Wire formats / IO
    Decode,
    Encode,
    Serialization,
    Io,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::UnknownClass => "ERR_UNKNOWN_CLASS",
            ExErrorKind::UnknownAttribute => "ERR_UNKNOWN_ATTRIBUTE",
            ExErrorKind::UnknownMember => "ERR_UNKNOWN_MEMBER",
            ExErrorKind::Naming => "ERR_NAMING",
            ExErrorKind::Arity => "ERR_ARITY",
            ExErrorKind::RnMismatch => "ERR_RN_MISMATCH",
            ExErrorKind::UnresolvedSegment => "ERR_UNRESOLVED_SEGMENT",
            ExErrorKind::ClassNameMismatch => "ERR_CLASS_NAME_MISMATCH",
            ExErrorKind::Navigation => "ERR_NAVIGATION",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidTemplate => "ERR_INVALID_TEMPLATE",
            ExErrorKind::InvalidRegistry => "ERR_INVALID_REGISTRY",
            ExErrorKind::Decode => "ERR_DECODE",
            ExErrorKind::Encode => "ERR_ENCODE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification used by the logging macros plus whatever tree
/// context was available where the error was raised.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    class_name: Option<String>,
    dn: Option<String>,
    attribute: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            class_name: None,
            dn: None,
            attribute: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add class name context
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Add Dn context
    pub fn with_dn(mut self, dn: impl Into<String>) -> Self {
        self.dn = Some(dn.into());
        self
    }

    /// Add attribute name context
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn dn(&self) -> Option<&str> {
        self.dn.as_deref()
    }

    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
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
        if let Some(class_name) = &self.class_name {
            write!(f, " (class: {})", class_name)?;
        }
        if let Some(attribute) = &self.attribute {
            write!(f, " (attribute: {})", attribute)?;
        }
        if let Some(dn) = &self.dn {
            write!(f, " (dn: {})", dn)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for tree construction, naming and serialization
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MoError {
    // ===== Registry lookups =====
    /// Class name has no registry entry
    #[error("Unknown class: {class_name}")]
    UnknownClass { class_name: String },

    /// Attribute is not in the class's permitted set
    #[error("Unknown attribute '{attribute}' for class {class_name}")]
    UnknownAttribute {
        class_name: String,
        attribute: String,
    },

    /// Name is neither a permitted attribute nor a legal child class
    #[error("'{member}' is neither an attribute nor a child class of {class_name}")]
    UnknownMember { class_name: String, member: String },

    // ===== Construction =====
    /// Naming attribute missing, bound twice, or changed after construction
    #[error("Naming error for {class_name}.{attribute}: {reason}")]
    Naming {
        class_name: String,
        attribute: String,
        reason: String,
    },

    /// More positional values than declared naming attributes
    #[error("{class_name} takes at most {expected} positional values, got {got}")]
    Arity {
        class_name: String,
        expected: usize,
        got: usize,
    },

    // ===== Dn resolution =====
    /// Segment does not match the class's Rn template
    #[error("Rn '{rn}' does not match template '{template}' of {class_name}")]
    RnMismatch {
        class_name: String,
        template: String,
        rn: String,
    },

    /// No candidate class matched a Dn segment
    #[error("Cannot resolve segment '{segment}' of '{dn}' under {parent_class}")]
    UnresolvedSegment {
        dn: String,
        segment: String,
        parent_class: String,
    },

    // ===== Tree structure =====
    /// Payload class differs from the node it is being merged into
    #[error("Class name mismatch: node is {expected}, payload is {found}")]
    ClassNameMismatch { expected: String, found: String },

    /// Ancestor walk or detach left the tree
    #[error("Navigation error at {class_name}: {reason}")]
    Navigation { class_name: String, reason: String },

    /// Node id is stale or was never issued by this tree
    #[error("Node not found: {node_id}")]
    NodeNotFound { node_id: NodeId },

    // ===== Configuration =====
    /// Rn template cannot be parsed
    #[error("Invalid Rn template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// Registry metadata is inconsistent
    #[error("Invalid registry: {reason}")]
    InvalidRegistry { reason: String },

    // ===== Wire formats / IO =====
    /// Payload is well-formed text but not a valid tree encoding
    #[error("Cannot decode {format} payload: {message}")]
    Decode {
        format: &'static str,
        message: String,
    },

    /// Writer failure while encoding
    #[error("Cannot encode {format} payload: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Filesystem error while loading configuration
    #[error("IO error on {path}: {message}")]
    Io { path: String, message: String },
}

impl MoError {
    /// Canonical kind of this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            MoError::UnknownClass { .. } => ExErrorKind::UnknownClass,
            MoError::UnknownAttribute { .. } => ExErrorKind::UnknownAttribute,
            MoError::UnknownMember { .. } => ExErrorKind::UnknownMember,
            MoError::Naming { .. } => ExErrorKind::Naming,
            MoError::Arity { .. } => ExErrorKind::Arity,
            MoError::RnMismatch { .. } => ExErrorKind::RnMismatch,
            MoError::UnresolvedSegment { .. } => ExErrorKind::UnresolvedSegment,
            MoError::ClassNameMismatch { .. } => ExErrorKind::ClassNameMismatch,
            MoError::Navigation { .. } => ExErrorKind::Navigation,
            MoError::NodeNotFound { .. } => ExErrorKind::NotFound,
            MoError::InvalidTemplate { .. } => ExErrorKind::InvalidTemplate,
            MoError::InvalidRegistry { .. } => ExErrorKind::InvalidRegistry,
            MoError::Decode { .. } => ExErrorKind::Decode,
            MoError::Encode { .. } => ExErrorKind::Encode,
            MoError::Serialization { .. } => ExErrorKind::Serialization,
            MoError::Io { .. } => ExErrorKind::Io,
        }
    }

    pub(crate) fn naming(
        class_name: impl Into<String>,
        attribute: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        MoError::Naming {
            class_name: class_name.into(),
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn decode(format: &'static str, message: impl Into<String>) -> Self {
        MoError::Decode {
            format,
            message: message.into(),
        }
    }
}

/// Conversion from MoError to ExError
impl From<MoError> for ExError {
    fn from(err: MoError) -> Self {
        let base = ExError::new(err.kind());
        match err {
            MoError::UnknownClass { class_name } => base
                .with_class_name(class_name)
                .with_message("Class not in registry"),

            MoError::UnknownAttribute {
                class_name,
                attribute,
            } => base
                .with_class_name(class_name)
                .with_attribute(attribute)
                .with_message("Attribute not permitted"),

            MoError::UnknownMember { class_name, member } => base
                .with_class_name(class_name)
                .with_attribute(member)
                .with_message("Neither attribute nor child class"),

            MoError::Naming {
                class_name,
                attribute,
                reason,
            } => base
                .with_class_name(class_name)
                .with_attribute(attribute)
                .with_message(reason),

            MoError::Arity {
                class_name,
                expected,
                got,
            } => base.with_class_name(class_name).with_message(format!(
                "Expected at most {} positional values, got {}",
                expected, got
            )),

            MoError::RnMismatch {
                class_name,
                template,
                rn,
            } => base
                .with_class_name(class_name)
                .with_message(format!("Rn '{}' does not match '{}'", rn, template)),

            MoError::UnresolvedSegment {
                dn,
                segment,
                parent_class,
            } => {
                let base = base
                    .with_dn(dn)
                    .with_op("from_dn")
                    .with_message(format!("No child class matches segment '{}'", segment));
                if parent_class.is_empty() {
                    base
                } else {
                    base.with_class_name(parent_class)
                }
            }

            MoError::ClassNameMismatch { expected, found } => base
                .with_class_name(expected)
                .with_message(format!("Payload class is {}", found)),

            MoError::Navigation { class_name, reason } => {
                base.with_class_name(class_name).with_message(reason)
            }

            MoError::NodeNotFound { node_id } => {
                base.with_message(format!("Node {} not found", node_id))
            }

            MoError::InvalidTemplate { template, reason } => {
                base.with_message(format!("Template '{}': {}", template, reason))
            }

            MoError::InvalidRegistry { reason } => base.with_message(reason),

            MoError::Decode { format, message } | MoError::Encode { format, message } => {
                base.with_op(format).with_message(message)
            }

            MoError::Serialization { message } => base.with_message(message),

            MoError::Io { path, message } => {
                base.with_message(format!("{}: {}", path, message))
            }
        }
    }
}

/// Conversion from serde_json::Error to MoError
impl From<serde_json::Error> for MoError {
    fn from(err: serde_json::Error) -> Self {
        MoError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from roxmltree::Error to MoError
impl From<roxmltree::Error> for MoError {
    fn from(err: roxmltree::Error) -> Self {
        MoError::decode("xml", err.to_string())
    }
}
