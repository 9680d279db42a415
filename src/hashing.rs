//! Hashing System - SHA-256 Fingerprints and Manifests
//!
//! Name fingerprints seed the per-brand variation; manifest and job hashes
//! make every generated package reproducible and auditable.

use sha2::{Digest, Sha256};
use serde::Serialize;
use serde_json::{to_string, Value};

fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Stable 32-bit fingerprint of free text: the first four digest bytes,
/// big-endian.
pub fn name_fingerprint(name: &str) -> u32 {
    let digest = sha256(name.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    to_string(&sort_value(&v))
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_value(v)))
                    .collect(),
            )
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// Compute manifest hash for a package
pub fn compute_manifest_hash<T: Serialize>(manifest: &T) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(manifest)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

/// Compute job hash for audit logging
/// job_hash = sha256(slug:industry:mood:canonical_brief:engine_version)
pub fn compute_job_hash(
    slug: &str,
    industry: &str,
    mood: &str,
    brief: &impl Serialize,
    engine_version: &str,
) -> Result<String, serde_json::Error> {
    let canonical_brief = canonical_json(brief)?;
    let combined = format!(
        "{}:{}:{}:{}:{}",
        slug, industry, mood, canonical_brief, engine_version
    );
    Ok(sha256_hex(combined.as_bytes()))
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}
