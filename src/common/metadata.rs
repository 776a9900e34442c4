use base64::Engine;
use serde::{Deserialize, Serialize, Serializer};

// Metadata
//------------------------------------------------------------------------------

/// One decoder metadata entry as it crosses the connector boundary: the kind name and the
/// JSON rendering of its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub key: String,
    pub value: String,
}

impl Metadata {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

/// Typed value of a decoder metadata entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Int(i64),
    Text(String),
    Bool(bool),
    /// Byte segments, rendered as one base64 string per segment
    Bytes(#[serde(serialize_with = "base64_segments")] Vec<Vec<u8>>),
    Pair(u64, u64),
}

fn base64_segments<S: Serializer>(segs: &[Vec<u8>], s: S) -> Result<S::Ok, S::Error> {
    let engine = base64::engine::general_purpose::STANDARD;
    s.collect_seq(segs.iter().map(|seg| engine.encode(seg)))
}

impl MetadataValue {
    pub fn to_json(&self) -> String {
        // Serializing these shapes cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Metadata kind paired with its value, in the order the decoder reported them.
pub type RawMetadata = Vec<(String, MetadataValue)>;

/// Maps raw decoder metadata into transport entries. Order is kept as given; entries are
/// neither deduplicated, sorted nor filtered.
pub fn convert_metadata<I, K>(raw: I) -> Vec<Metadata>
where
    I: IntoIterator<Item = (K, MetadataValue)>,
    K: Into<String>,
{
    raw.into_iter().map(|(k, v)| Metadata { key: k.into(), value: v.to_json() }).collect()
}
