use serde::{Deserialize, Serialize};

use crate::error::NormalizeError;

/// Raw document content as handed over by the storage layer.
/// Read failures are carried as data so one bad document never aborts a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawText {
    Text(String),
    /// bytes that still have to be decoded as UTF-8
    Bytes(Vec<u8>),
    /// the source could not be read; holds the reason
    Unreadable(String),
}

impl RawText {
    pub fn as_text(&self) -> Result<&str, NormalizeError> {
        match self {
            RawText::Text(text) => Ok(text),
            RawText::Bytes(bytes) => std::str::from_utf8(bytes)
                .map_err(|e| NormalizeError::Malformed(e.to_string())),
            RawText::Unreadable(reason) => Err(NormalizeError::Unreadable(reason.clone())),
        }
    }
}

/// One corpus entry
/// `id` is the dense 0-based position assigned at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: usize,
    pub raw: RawText,
}

impl Document {
    pub fn new(id: usize, text: impl Into<String>) -> Self {
        Self { id, raw: RawText::Text(text.into()) }
    }

    pub fn from_bytes(id: usize, bytes: Vec<u8>) -> Self {
        Self { id, raw: RawText::Bytes(bytes) }
    }

    pub fn unreadable(id: usize, reason: impl Into<String>) -> Self {
        Self { id, raw: RawText::Unreadable(reason.into()) }
    }

    /// Documents with ids `0..texts.len()`
    pub fn from_texts<I, S>(texts: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(id, text)| Self::new(id, text))
            .collect()
    }
}
