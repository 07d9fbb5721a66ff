//! Error types for URDF inventory reading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading a URDF document.
#[derive(Debug, Error)]
pub enum UrdfError {
    /// The document is not well-formed XML.
    #[error("malformed URDF XML: {0}")]
    Xml(String),

    /// A required element is absent.
    #[error("<{element}> is required in {context}")]
    MissingElement {
        /// Element that was expected.
        element: &'static str,
        /// Where it was expected.
        context: String,
    },

    /// A required attribute is absent.
    #[error("<{element}> needs a '{attribute}' attribute")]
    MissingAttribute {
        /// Attribute that was expected.
        attribute: &'static str,
        /// Element it belongs on.
        element: String,
    },

    /// An attribute value cannot be read.
    #[error("<{element} {attribute}=...>: {message}")]
    InvalidAttribute {
        /// Offending attribute.
        attribute: &'static str,
        /// Element carrying it.
        element: String,
        /// What is wrong with the value.
        message: String,
    },

    /// A `type` that URDF does not define.
    #[error("unknown joint type '{0}'")]
    UnknownJointType(String),

    /// A joint names a link that is not declared.
    #[error("joint '{joint}' refers to undeclared link '{link}'")]
    UndefinedLink {
        /// The undeclared link.
        link: String,
        /// The joint naming it.
        joint: String,
    },

    /// Two links or two joints share a name.
    #[error("{kind} '{name}' is declared twice")]
    Duplicate {
        /// `"link"` or `"joint"`.
        kind: &'static str,
        /// The repeated name.
        name: String,
    },

    /// A link is the child of two joints, so the links do not form a tree.
    #[error("link '{link}' is the child of both '{first}' and '{second}'")]
    MultipleParents {
        /// The link.
        link: String,
        /// First joint claiming it.
        first: String,
        /// Second joint claiming it.
        second: String,
    },

    /// Following parent joints from this link never reaches the root.
    #[error("joints form a loop through link '{0}'")]
    Loop(String),

    /// Every link has a parent joint.
    #[error("no root link: every link is the child of a joint")]
    NoRootLink,

    /// More than one link has no parent joint.
    #[error("links {0:?} all lack a parent joint; exactly one root is allowed")]
    MultipleRootLinks(Vec<String>),

    /// The file could not be read.
    #[error("cannot read URDF '{}': {source}", path.display())]
    Io {
        /// File that was opened.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
}

impl UrdfError {
    /// Create a missing element error.
    pub fn missing_element(element: &'static str, context: impl Into<String>) -> Self {
        Self::MissingElement {
            element,
            context: context.into(),
        }
    }

    /// Create a missing attribute error.
    pub fn missing_attribute(attribute: &'static str, element: impl Into<String>) -> Self {
        Self::MissingAttribute {
            attribute,
            element: element.into(),
        }
    }

    /// Create an invalid attribute error.
    pub fn invalid_attribute(
        attribute: &'static str,
        element: impl Into<String>,
        message: impl ToString,
    ) -> Self {
        Self::InvalidAttribute {
            attribute,
            element: element.into(),
            message: message.to_string(),
        }
    }

    /// Check if the error comes from the document rather than the file system.
    #[must_use]
    pub fn is_document_error(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }
}

/// Result type for URDF operations.
pub type Result<T> = std::result::Result<T, UrdfError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_culprit() {
        let err = UrdfError::missing_element("parent", "joint 'joint3'");
        assert_eq!(err.to_string(), "<parent> is required in joint 'joint3'");

        let err = UrdfError::invalid_attribute("upper", "limit", "'1,5' is not a number");
        assert!(err.to_string().contains("'1,5' is not a number"));

        let err = UrdfError::MultipleParents {
            link: "link6".into(),
            first: "joint6".into(),
            second: "joint8".into(),
        };
        assert!(err.to_string().contains("'joint6' and 'joint8'"));
    }

    #[test]
    fn test_io_is_not_a_document_error() {
        let err = UrdfError::Io {
            path: "/robots/go2.urdf".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(!err.is_document_error());
        assert!(err.to_string().contains("/robots/go2.urdf"));
        assert!(UrdfError::NoRootLink.is_document_error());
    }
}
