//! Key Derivation Module
//!
//! Turns an operation namespace plus a parameter set into a stable,
//! bounded-length cache key of the form `{namespace}:{16 hex chars}`.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Number of hex characters of the digest kept in a key.
pub const DIGEST_HEX_LEN: usize = 16;

// == Cache Key ==
/// Opaque, deterministically derived cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The human-readable prefix the key was derived under.
    pub fn namespace(&self) -> &str {
        match self.0.rfind(':') {
            Some(idx) => &self.0[..idx],
            None => &self.0,
        }
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

// == Derive ==
/// Derives a key from any serializable parameter set.
///
/// Fails only when `params` cannot be represented as JSON (for example a map
/// with non-string keys).
pub fn derive_key<P>(namespace: &str, params: &P) -> Result<CacheKey, serde_json::Error>
where
    P: Serialize + ?Sized,
{
    let value = serde_json::to_value(params)?;
    Ok(derive_key_from_value(namespace, &value))
}

/// Derives a key from an already-built JSON parameter set.
pub fn derive_key_from_value(namespace: &str, params: &Value) -> CacheKey {
    let mut canonical = String::new();
    canonicalize(params, &mut canonical);

    let digest = format!("{:x}", md5::compute(canonical.as_bytes()));
    CacheKey(format!("{}:{}", namespace, &digest[..DIGEST_HEX_LEN]))
}

/// Writes `value` as compact JSON with object keys sorted at every depth.
///
/// Sorting is done here rather than relying on serde_json's map ordering,
/// which flips to insertion order when any crate in the build enables
/// `preserve_order`.
fn canonicalize(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut fields: Vec<(&String, &Value)> = map.iter().collect();
            fields.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (name, field)) in fields.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(name, out);
                out.push(':');
                canonicalize(field, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                canonicalize(item, out);
            }
            out.push(']');
        }
        Value::String(s) => write_string(s, out),
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_string(s: &str, out: &mut String) {
    // JSON string escaping keeps the encoding injective
    out.push_str(&Value::from(s).to_string());
}
