// src/inventory/key.rs

//! Dedup key for software identity
//!
//! Two software entries are the same catalog entry exactly when their
//! (name, version, source) triples match. [`SoftwareKey`] is that triple as
//! a hashable value, used directly as the map/set key by the differ and the
//! membership writer.
//!
//! The key also has a legacy textual form: the three fields joined by a NUL
//! byte, a control character not expected in software metadata. `encode`
//! does not truncate; `decode` truncates each field to its stored maximum
//! (255/255/64 bytes). The two only agree for fields already within their
//! limits, which the catalog resolver enforces at write time. If a field
//! itself contains a NUL byte the textual form does not round-trip; callers
//! must not feed unsanitized fields.

use crate::db::models::{MAX_NAME_LEN, MAX_SOURCE_LEN, MAX_VERSION_LEN, Software, truncate};

/// Field separator for the textual key form
const SEPARATOR: char = '\u{0}';

/// The identity triple of a software entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SoftwareKey {
    pub name: String,
    pub version: String,
    pub source: String,
}

impl SoftwareKey {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            source: source.into(),
        }
    }

    /// Encode the triple as a single NUL-separated string. No truncation.
    pub fn encode(&self) -> String {
        let mut s = String::with_capacity(self.name.len() + self.version.len() + self.source.len() + 2);
        s.push_str(&self.name);
        s.push(SEPARATOR);
        s.push_str(&self.version);
        s.push(SEPARATOR);
        s.push_str(&self.source);
        s
    }

    /// Decode a NUL-separated string back into a triple, truncating each
    /// field to its stored maximum. Returns `None` unless the input has
    /// exactly three fields.
    pub fn decode(s: &str) -> Option<Self> {
        let mut parts = s.split(SEPARATOR);
        let name = parts.next()?;
        let version = parts.next()?;
        let source = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            name: truncate(name, MAX_NAME_LEN).to_string(),
            version: truncate(version, MAX_VERSION_LEN).to_string(),
            source: truncate(source, MAX_SOURCE_LEN).to_string(),
        })
    }

    /// View the triple as an unsaved catalog record
    pub fn to_software(&self) -> Software {
        Software::new(self.name.clone(), self.version.clone(), self.source.clone())
    }
}

impl From<&Software> for SoftwareKey {
    fn from(s: &Software) -> Self {
        Self {
            name: s.name.clone(),
            version: s.version.clone(),
            source: s.source.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_within_limits() {
        let key = SoftwareKey::new("curl", "8.5.0", "apt");
        let decoded = SoftwareKey::decode(&key.encode()).unwrap();
        assert_eq!(decoded, key);
    }

    #[test]
    fn test_decode_truncates_overlong_fields() {
        // Encode does not truncate; decode does. Lossy by design for
        // over-length input, since stored fields are truncated at write
        // time anyway.
        let long_name = "a".repeat(300);
        let long_source = "s".repeat(100);
        let key = SoftwareKey::new(long_name.clone(), "1.0", long_source);

        let encoded = key.encode();
        assert!(encoded.starts_with(&long_name));

        let decoded = SoftwareKey::decode(&encoded).unwrap();
        assert_eq!(decoded.name.len(), 255);
        assert_eq!(decoded.version, "1.0");
        assert_eq!(decoded.source.len(), 64);
        assert_ne!(decoded, key);
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        assert!(SoftwareKey::decode("no separators").is_none());
        assert!(SoftwareKey::decode("one\u{0}separator").is_none());
        assert!(SoftwareKey::decode("a\u{0}b\u{0}c\u{0}d").is_none());
    }

    #[test]
    fn test_separator_in_field_does_not_round_trip() {
        // Known fragility: a NUL byte inside a field shifts the split.
        let key = SoftwareKey::new("bad\u{0}name", "1.0", "apt");
        assert!(SoftwareKey::decode(&key.encode()).is_none());
    }

    #[test]
    fn test_empty_fields_round_trip() {
        let key = SoftwareKey::new("", "", "");
        let decoded = SoftwareKey::decode(&key.encode()).unwrap();
        assert_eq!(decoded, key);
    }

    #[test]
    fn test_key_from_software_ignores_id() {
        let mut software = Software::new("curl", "8.5.0", "apt");
        let without_id = SoftwareKey::from(&software);
        software.id = Some(42);
        let with_id = SoftwareKey::from(&software);
        assert_eq!(without_id, with_id);
    }

    #[test]
    fn test_to_software_is_unsaved() {
        let key = SoftwareKey::new("curl", "8.5.0", "apt");
        let software = key.to_software();
        assert_eq!(software.id, None);
        assert_eq!(software.name, "curl");
    }
}
