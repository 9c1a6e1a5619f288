//! Structured error types for xlunlock.
//!
//! Every failure aborts the whole transformation; nothing here is retried.
//! ZIP errors are mapped explicitly at each call site because the same
//! `ZipError` means "bad input" while extracting and "internal failure"
//! while rebuilding.

use std::fmt;

/// A well-formedness failure inside one XML part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlError {
    /// Byte offset into the part where the problem was detected.
    pub position: usize,
    pub message: String,
}

impl XmlError {
    pub(crate) fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

impl fmt::Display for XmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.position)
    }
}

impl std::error::Error for XmlError {}

/// All errors surfaced by a protection-removal call.
#[derive(Debug, thiserror::Error)]
pub enum UnlockError {
    /// The input is not a readable ZIP container, or a candidate member
    /// could not be extracted from it.
    #[error("invalid archive{}: {source}", member_suffix(.member))]
    InvalidArchive {
        member: Option<String>,
        #[source]
        source: zip::result::ZipError,
    },

    /// A worksheet or workbook part is not well-formed XML.
    #[error("malformed XML in {part}: {source}")]
    MalformedXml {
        part: String,
        #[source]
        source: XmlError,
    },

    /// Rebuilding the output archive failed.
    #[error("failed to write archive{}: {source}", member_suffix(.member))]
    ArchiveWrite {
        member: Option<String>,
        #[source]
        source: zip::result::ZipError,
    },
}

/// Coarse classification for hosts that map errors onto responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArchive,
    MalformedXml,
    ArchiveWrite,
}

impl ErrorKind {
    /// Whether the failure is caused by the uploaded file rather than by us.
    #[must_use]
    pub fn is_client_error(self) -> bool {
        matches!(self, Self::InvalidArchive | Self::MalformedXml)
    }
}

impl UnlockError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArchive { .. } => ErrorKind::InvalidArchive,
            Self::MalformedXml { .. } => ErrorKind::MalformedXml,
            Self::ArchiveWrite { .. } => ErrorKind::ArchiveWrite,
        }
    }

    pub(crate) fn invalid_archive(source: zip::result::ZipError) -> Self {
        Self::InvalidArchive {
            member: None,
            source,
        }
    }

    pub(crate) fn unreadable_member(member: &str, source: zip::result::ZipError) -> Self {
        Self::InvalidArchive {
            member: Some(member.to_string()),
            source,
        }
    }

    pub(crate) fn archive_write(member: Option<&str>, source: zip::result::ZipError) -> Self {
        Self::ArchiveWrite {
            member: member.map(str::to_string),
            source,
        }
    }
}

fn member_suffix(member: &Option<String>) -> String {
    member
        .as_deref()
        .map(|name| format!(" (member {name})"))
        .unwrap_or_default()
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, UnlockError>;

#[cfg(target_arch = "wasm32")]
impl From<UnlockError> for wasm_bindgen::JsValue {
    fn from(e: UnlockError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
