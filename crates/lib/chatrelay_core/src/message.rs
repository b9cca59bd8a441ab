//! Outbound message model and required-field validation.

use thiserror::Error;

/// Validation failures for an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("'{0}' is required")]
    MissingField(&'static str),
}

/// A file uploaded alongside a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachment {
    /// Original file name as supplied by the uploader.
    pub file_name: Option<String>,
    /// MIME type as supplied by the uploader.
    pub content_type: Option<String>,
    /// Raw file contents.
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// A message ready to be dispatched to the backend.
///
/// Can only be built through [`OutboundMessage::new`], so `sender` and `text`
/// always hold at least one non-whitespace character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    sender: String,
    text: String,
    files: Vec<Attachment>,
}

impl OutboundMessage {
    /// Validates `sender` then `text`, failing on the first missing field.
    pub fn new(
        sender: Option<String>,
        text: Option<String>,
        files: Vec<Attachment>,
    ) -> Result<Self, ValidationError> {
        let sender = require("sender", sender)?;
        let text = require("text", text)?;
        Ok(Self {
            sender,
            text,
            files,
        })
    }

    /// Replaces the attachments; the validated fields are untouched.
    pub fn with_files(mut self, files: Vec<Attachment>) -> Self {
        self.files = files;
        self
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn files(&self) -> &[Attachment] {
        &self.files
    }
}

/// Returns the value untouched when it has non-whitespace content.
pub fn require(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField(field)),
    }
}
