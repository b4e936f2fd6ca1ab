//! # Associated Data
//!
//! Metadata that is authenticated but not encrypted. The signature covers the
//! serialized bytes verbatim, so every implementation must serialize the same
//! record to the same bytes.
//!
//! ## Canonical form
//!
//! JSON object, fields in the order `topic, key_version, tenant_id,
//! content_type`, absent optionals omitted, `", "` between items, `": "`
//! between key and value, and every character outside `0x20..=0x7E` written
//! as a lowercase `\uXXXX` escape (surrogate pairs above the BMP):
//!
//! ```text
//! {"topic": "demo.messages", "key_version": 0}
//! ```

use crate::errors::EnvelopeError;
use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use std::io::{self, Write};

/// Optional associated-data fields supplied by the caller of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AadExtra {
    /// Tenant the message belongs to.
    pub tenant_id: Option<String>,
    /// MIME type of the plaintext payload.
    pub content_type: Option<String>,
}

impl AadExtra {
    /// Set the tenant id.
    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Set the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Decoded associated data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociatedData {
    /// Logical channel; must equal the envelope's transport topic.
    pub topic: String,
    /// Symmetric key epoch; must equal the envelope's `key_version`.
    pub key_version: u32,
    /// Tenant the message belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    /// MIME type of the plaintext payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl AssociatedData {
    /// Associated data with no optional fields.
    pub fn new(topic: impl Into<String>, key_version: u32) -> Self {
        Self {
            topic: topic.into(),
            key_version,
            tenant_id: None,
            content_type: None,
        }
    }

    /// Associated data carrying the caller's optional fields.
    pub fn with_extra(topic: impl Into<String>, key_version: u32, extra: &AadExtra) -> Self {
        Self {
            topic: topic.into(),
            key_version,
            tenant_id: extra.tenant_id.clone(),
            content_type: extra.content_type.clone(),
        }
    }

    /// Serialize to canonical bytes.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>, EnvelopeError> {
        let mut out = Vec::with_capacity(64 + self.topic.len());
        let mut ser = serde_json::Serializer::with_formatter(&mut out, CanonicalFormatter);
        self.serialize(&mut ser)
            .map_err(|e| EnvelopeError::AssociatedData(e.to_string()))?;
        Ok(out)
    }

    /// Parse associated data from bytes.
    ///
    /// Any valid JSON object with the expected fields is accepted; compact
    /// encodings from other SDKs parse the same as the canonical form.
    pub fn parse(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        serde_json::from_slice(bytes).map_err(|e| EnvelopeError::AssociatedData(e.to_string()))
    }
}

/// `serde_json` formatter producing the canonical spacing and escaping.
struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    // Quotes, backslashes and C0 controls never reach here; serde_json routes
    // them through `write_char_escape`, whose default output is already canonical.
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut start = 0;
        for (idx, ch) in fragment.char_indices() {
            if matches!(ch, ' '..='~') {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..idx])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = idx + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}
