//! Cache Envelope Validation
//!
//! Every cache file carries the same envelope:
//!
//! ```text
//! { "version": "1", "hash": "<key>", "timestamp": "<RFC 3339>", "data": ... }
//! ```
//!
//! Reads pass three ordered gates: structure, schema version, age. Each gate
//! returns a [`CacheValidation`]; anything but `Ok` is a miss.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// On-disk envelope. `data` is absent for text artifacts, whose body lives in a sibling file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct CacheEnvelope<T> {
    pub version: String,
    pub hash: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> CacheEnvelope<T> {
    pub fn new(version: &str, hash: &str, timestamp: DateTime<Utc>, data: Option<T>) -> Self {
        Self {
            version: version.to_string(),
            hash: hash.to_string(),
            timestamp,
            data,
        }
    }
}

/// Why an entry was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// Not a well-formed envelope, or the payload did not decode
    Malformed(String),
    /// Envelope belongs to a different key
    HashMismatch { expected: String, found: String },
    /// Written under another schema version
    VersionMismatch { expected: String, found: String },
    /// Older than the namespace TTL
    Expired { age: Duration, ttl: Duration },
    /// Data payload required but absent
    MissingData,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(msg) => write!(f, "malformed envelope: {}", msg),
            Self::HashMismatch { expected, found } => {
                write!(f, "hash mismatch (expected {}, found {})", expected, found)
            }
            Self::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "schema version mismatch (expected {}, found {})",
                    expected, found
                )
            }
            Self::Expired { age, ttl } => write!(f, "expired (age {:?}, ttl {:?})", age, ttl),
            Self::MissingData => write!(f, "envelope has no data"),
        }
    }
}

/// Result of validating a cache entry
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValidation<T> {
    Ok(T),
    Invalid(InvalidReason),
}

impl<T> CacheValidation<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Chain the next gate
    pub fn and_then<U>(self, f: impl FnOnce(T) -> CacheValidation<U>) -> CacheValidation<U> {
        match self {
            Self::Ok(value) => f(value),
            Self::Invalid(reason) => CacheValidation::Invalid(reason),
        }
    }
}

/// Expectations a stored entry must meet
#[derive(Debug, Clone)]
pub struct Gates<'a> {
    pub hash: &'a str,
    pub version: &'a str,
    pub ttl: Duration,
    pub now: DateTime<Utc>,
}

impl Gates<'_> {
    /// Gate 1: structure. Parses the raw bytes and checks the envelope belongs to `hash`.
    pub fn structure<T: DeserializeOwned>(&self, raw: &[u8]) -> CacheValidation<CacheEnvelope<T>> {
        let envelope: CacheEnvelope<T> = match serde_json::from_slice(raw) {
            Ok(envelope) => envelope,
            Err(e) => return CacheValidation::Invalid(InvalidReason::Malformed(e.to_string())),
        };

        if envelope.hash != self.hash {
            return CacheValidation::Invalid(InvalidReason::HashMismatch {
                expected: self.hash.to_string(),
                found: envelope.hash,
            });
        }

        CacheValidation::Ok(envelope)
    }

    /// Gate 2: schema version equality
    pub fn version<T>(&self, envelope: CacheEnvelope<T>) -> CacheValidation<CacheEnvelope<T>> {
        if envelope.version != self.version {
            return CacheValidation::Invalid(InvalidReason::VersionMismatch {
                expected: self.version.to_string(),
                found: envelope.version,
            });
        }
        CacheValidation::Ok(envelope)
    }

    /// Gate 3: age strictly below TTL. Timestamps in the future count as age zero.
    pub fn age<T>(&self, envelope: CacheEnvelope<T>) -> CacheValidation<CacheEnvelope<T>> {
        let age = (self.now - envelope.timestamp)
            .to_std()
            .unwrap_or(Duration::ZERO);

        if age >= self.ttl {
            return CacheValidation::Invalid(InvalidReason::Expired { age, ttl: self.ttl });
        }
        CacheValidation::Ok(envelope)
    }

    /// All three gates, in order
    pub fn check<T: DeserializeOwned>(&self, raw: &[u8]) -> CacheValidation<CacheEnvelope<T>> {
        self.structure(raw)
            .and_then(|envelope| self.version(envelope))
            .and_then(|envelope| self.age(envelope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    const TTL: Duration = Duration::from_secs(3600);

    fn gates(now: DateTime<Utc>) -> Gates<'static> {
        Gates {
            hash: "abc",
            version: "1",
            ttl: TTL,
            now,
        }
    }

    fn encode(version: &str, hash: &str, timestamp: DateTime<Utc>) -> Vec<u8> {
        serde_json::to_vec(&CacheEnvelope::new(
            version,
            hash,
            timestamp,
            Some(vec!["serde".to_string()]),
        ))
        .unwrap()
    }

    #[test]
    fn test_all_gates_pass() {
        let now = Utc::now();
        let raw = encode("1", "abc", now);
        let checked = gates(now).check::<Vec<String>>(&raw);
        assert!(checked.is_ok());
    }

    #[test]
    fn test_ttl_boundary() {
        let written = Utc::now();
        let raw = encode("1", "abc", written);
        let ttl = TimeDelta::from_std(TTL).unwrap();

        let just_inside = written + ttl - TimeDelta::milliseconds(1);
        assert!(gates(just_inside).check::<Vec<String>>(&raw).is_ok());

        let just_outside = written + ttl + TimeDelta::milliseconds(1);
        assert!(matches!(
            gates(just_outside).check::<Vec<String>>(&raw),
            CacheValidation::Invalid(InvalidReason::Expired { .. })
        ));
    }

    #[test]
    fn test_schema_version_gate() {
        let now = Utc::now();
        let raw = encode("0", "abc", now);
        assert!(matches!(
            gates(now).check::<Vec<String>>(&raw),
            CacheValidation::Invalid(InvalidReason::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_hash_mismatch() {
        let now = Utc::now();
        let raw = encode("1", "other", now);
        assert!(matches!(
            gates(now).check::<Vec<String>>(&raw),
            CacheValidation::Invalid(InvalidReason::HashMismatch { .. })
        ));
    }

    #[test]
    fn test_malformed_inputs() {
        let now = Utc::now();
        for raw in [
            b"".as_slice(),
            b"not json".as_slice(),
            br#"{"version": "1", "hash": "abc"}"#.as_slice(),
            br#"{"version": 1, "hash": "abc", "timestamp": "2024-01-01T00:00:00Z"}"#.as_slice(),
            br#"{"version": "1", "hash": "abc", "timestamp": "yesterday"}"#.as_slice(),
        ] {
            assert!(matches!(
                gates(now).check::<Vec<String>>(raw),
                CacheValidation::Invalid(InvalidReason::Malformed(_))
            ));
        }
    }

    #[test]
    fn test_payload_type_mismatch_is_malformed() {
        let now = Utc::now();
        let raw = br#"{"version": "1", "hash": "abc", "timestamp": "2024-01-01T00:00:00Z", "data": 42}"#;
        assert!(matches!(
            gates(now).check::<Vec<String>>(raw),
            CacheValidation::Invalid(InvalidReason::Malformed(_))
        ));
    }

    #[test]
    fn test_future_timestamp_is_fresh() {
        let now = Utc::now();
        let raw = encode("1", "abc", now + TimeDelta::minutes(5));
        assert!(gates(now).check::<Vec<String>>(&raw).is_ok());
    }

    #[test]
    fn test_version_checked_before_age() {
        let now = Utc::now();
        let raw = encode("0", "abc", now - TimeDelta::days(30));
        assert!(matches!(
            gates(now).check::<Vec<String>>(&raw),
            CacheValidation::Invalid(InvalidReason::VersionMismatch { .. })
        ));
    }
}
