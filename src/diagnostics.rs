//! Non-fatal conditions reported while processing an index file.
//!
//! Nothing in here aborts a run. Callers log each diagnostic and may count
//! them or stop on a threshold of their own.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Info,
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("\"{}\" doesn't exist or could not be read ({reason}), skipping directory", .path.display())]
    IndexUnreadable { path: PathBuf, reason: String },

    #[error("no contacts section found in {}, face tags will be unavailable", .index.display())]
    NoContacts { index: PathBuf },

    // Picasa keeps plenty of stale entries for deleted files
    #[error("\"{}\" mentioned in the index doesn't exist, skipping", .path.display())]
    MissingImage { path: PathBuf },

    #[error("{} contains unknown face \"{face_id}\" for image \"{image}\", skipping face", .index.display())]
    UnknownFace {
        index: PathBuf,
        image: String,
        face_id: String,
    },

    #[error("{} contains duplicate face \"{face_id}\" for image \"{image}\", skipping face", .index.display())]
    DuplicateFace {
        index: PathBuf,
        image: String,
        face_id: String,
    },

    #[error("no index entry found for file \"{}\", not embedding tags", .path.display())]
    NoIndexEntry { path: PathBuf },

    #[error("could not read dimensions of \"{}\" ({reason}), skipping MWG face regions", .path.display())]
    DimensionsUnavailable { path: PathBuf, reason: String },

    #[error("no useful information found for file \"{}\", not embedding tags", .path.display())]
    NothingToEmbed { path: PathBuf },

    #[error("{tool} failed for \"{}\": {reason}", .path.display())]
    ToolFailed {
        tool: String,
        path: PathBuf,
        reason: String,
    },

    #[error("could not copy \"{}\": {reason}", .path.display())]
    CopyFailed { path: PathBuf, reason: String },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::NoIndexEntry { .. } | Diagnostic::NothingToEmbed { .. } => Severity::Info,
            _ => Severity::Warning,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::IndexUnreadable { .. } => "index_unreadable",
            Diagnostic::NoContacts { .. } => "no_contacts",
            Diagnostic::MissingImage { .. } => "missing_image",
            Diagnostic::UnknownFace { .. } => "unknown_face",
            Diagnostic::DuplicateFace { .. } => "duplicate_face",
            Diagnostic::NoIndexEntry { .. } => "no_index_entry",
            Diagnostic::DimensionsUnavailable { .. } => "dimensions_unavailable",
            Diagnostic::NothingToEmbed { .. } => "nothing_to_embed",
            Diagnostic::ToolFailed { .. } => "tool_failed",
            Diagnostic::CopyFailed { .. } => "copy_failed",
        }
    }

    /// Emit through `tracing` at the level matching the severity.
    pub fn log(&self) {
        match self.severity() {
            Severity::Warning => tracing::warn!(kind = self.kind(), "{}", self),
            Severity::Info => tracing::info!(kind = self.kind(), "{}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let diag = Diagnostic::UnknownFace {
            index: PathBuf::from("/photos/.picasa.ini"),
            image: "a.jpg".to_string(),
            face_id: "abc123".to_string(),
        };
        assert_eq!(
            diag.to_string(),
            "/photos/.picasa.ini contains unknown face \"abc123\" for image \"a.jpg\", skipping face"
        );
        assert_eq!(diag.severity(), Severity::Warning);
    }

    #[test]
    fn test_severity() {
        let info = Diagnostic::NothingToEmbed { path: PathBuf::from("a.jpg") };
        assert_eq!(info.severity(), Severity::Info);

        let warn = Diagnostic::MissingImage { path: PathBuf::from("a.jpg") };
        assert_eq!(warn.severity(), Severity::Warning);
    }

    #[test]
    fn test_serialized_kind_matches() {
        let diag = Diagnostic::NoContacts { index: PathBuf::from("x/.picasa.ini") };
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["kind"], diag.kind());
        assert_eq!(json["index"], "x/.picasa.ini");
    }
}
