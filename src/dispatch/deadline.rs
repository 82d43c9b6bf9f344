// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Inbound `grpc-timeout` parsing.
//!
//! tonic enforces the inbound timeout server-side on its own; this module
//! recovers the remaining budget so the dispatcher can re-apply it to the
//! calls it fans out, keeping the ingress deadline propagating across every
//! hop of the tree.

use std::time::{Duration, Instant};

use tonic::metadata::MetadataMap;

/// Deadline implied by the request's `grpc-timeout` metadata, if present
/// and well-formed.
pub fn deadline_from_metadata(metadata: &MetadataMap) -> Option<Instant> {
    let value = metadata.get("grpc-timeout")?.to_str().ok()?;
    parse_grpc_timeout(value).map(|timeout| Instant::now() + timeout)
}

/// Parse a `grpc-timeout` value: ASCII digits followed by one unit letter
/// (`H`our, `M`inute, `S`econd, `m`illi, `u`micro, `n`ano).
fn parse_grpc_timeout(value: &str) -> Option<Duration> {
    if value.len() < 2 {
        return None;
    }
    let (digits, unit) = value.split_at(value.len() - 1);
    let amount: u64 = digits.parse().ok()?;
    match unit {
        "H" => Some(Duration::from_secs(amount.checked_mul(3600)?)),
        "M" => Some(Duration::from_secs(amount.checked_mul(60)?)),
        "S" => Some(Duration::from_secs(amount)),
        "m" => Some(Duration::from_millis(amount)),
        "u" => Some(Duration::from_micros(amount)),
        "n" => Some(Duration::from_nanos(amount)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_units() {
        assert_eq!(parse_grpc_timeout("2H"), Some(Duration::from_secs(7200)));
        assert_eq!(parse_grpc_timeout("3M"), Some(Duration::from_secs(180)));
        assert_eq!(parse_grpc_timeout("3S"), Some(Duration::from_secs(3)));
        assert_eq!(parse_grpc_timeout("250m"), Some(Duration::from_millis(250)));
        assert_eq!(parse_grpc_timeout("500u"), Some(Duration::from_micros(500)));
        assert_eq!(parse_grpc_timeout("100n"), Some(Duration::from_nanos(100)));
    }

    #[test]
    fn rejects_malformed_values() {
        assert_eq!(parse_grpc_timeout(""), None);
        assert_eq!(parse_grpc_timeout("S"), None);
        assert_eq!(parse_grpc_timeout("12"), None);
        assert_eq!(parse_grpc_timeout("-3S"), None);
        assert_eq!(parse_grpc_timeout("3x"), None);
        assert_eq!(parse_grpc_timeout("3.5S"), None);
    }

    #[test]
    fn metadata_without_timeout_yields_no_deadline() {
        let metadata = MetadataMap::new();
        assert!(deadline_from_metadata(&metadata).is_none());
    }

    #[test]
    fn metadata_timeout_yields_future_deadline() {
        let mut metadata = MetadataMap::new();
        metadata.insert("grpc-timeout", "3S".parse().unwrap());

        let deadline = deadline_from_metadata(&metadata).unwrap();
        let remaining = deadline.saturating_duration_since(Instant::now());
        assert!(remaining > Duration::from_secs(2));
        assert!(remaining <= Duration::from_secs(3));
    }
}
