//! Markdown documents with YAML front matter
//!
//! Each document is a front matter block of flat scalar fields followed by a
//! Markdown body. Documents reference each other with `[[name]]` wiki links;
//! the links are plain text and are never resolved here.

mod render;
mod writer;

pub use render::{application_document, hardware_document};
pub use writer::{write_atomic, DocumentWriter};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Timestamp layout for the `updated` header field
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid document name {0:?}")]
    InvalidName(String),

    #[error("failed to render front matter: {0}")]
    Render(#[from] serde_yaml::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which directory of the tree a document belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Hardware,
    Application,
}

impl DocumentKind {
    /// Value of the `type` header field
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Hardware => "hardware",
            DocumentKind::Application => "application",
        }
    }

    pub fn directory(&self) -> &'static str {
        match self {
            DocumentKind::Hardware => "Hardware",
            DocumentKind::Application => "Applications",
        }
    }
}

/// A rendered document ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    kind: DocumentKind,
    name: String,
    front_matter: String,
    body: String,
}

impl Document {
    /// Serialize `header` in field declaration order and pair it with `body`
    pub fn new<H: Serialize>(
        kind: DocumentKind,
        name: impl Into<String>,
        header: &H,
        body: String,
    ) -> Result<Self, DocumentError> {
        let name = name.into();
        validate_name(&name)?;
        let front_matter = serde_yaml::to_string(header)?;
        Ok(Self {
            kind,
            name,
            front_matter,
            body,
        })
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn front_matter(&self) -> &str {
        &self.front_matter
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Path relative to the output root, e.g. `Hardware/web-01.md`
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(self.kind.directory()).join(format!("{}.md", self.name))
    }

    /// Full file contents
    pub fn render(&self) -> String {
        format!("---\n{}---\n\n{}", self.front_matter, self.body)
    }
}

/// Wiki-style cross reference to another document
pub fn wiki_link(target: &str) -> String {
    format!("[[{}]]", target)
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

fn validate_name(name: &str) -> Result<(), DocumentError> {
    let invalid = name.is_empty()
        || name == "."
        || name.contains("..")
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if invalid {
        return Err(DocumentError::InvalidName(name.to_string()));
    }
    Ok(())
}
