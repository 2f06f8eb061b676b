//! Interface name canonicalization.
//!
//! Every table a device emits spells interface names differently: `show cdp
//! neighbors detail` says `GigabitEthernet1/0/1`, `show interfaces status`
//! says `Gi1/0/1`, and both refer to the same physical port. All parsers
//! funnel names through [`normalize`] so the fusion join operates on one
//! canonical spelling.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical short-form interface name (e.g. `Gi1/0/1`, `Po3`).
///
/// Used as the join key across every per-interface table. Construct via
/// [`normalize`] so two differently-spelled references to the same port
/// compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterfaceKey(String);

impl InterfaceKey {
    /// Get the canonical name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this key names a port-channel (aggregated) interface.
    pub fn is_port_channel(&self) -> bool {
        self.0.starts_with("Po")
    }
}

impl fmt::Display for InterfaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for InterfaceKey {
    fn from(raw: &str) -> Self {
        normalize(raw)
    }
}

/// Long-form prefixes and their canonical short forms, longest first so a
/// prefix never shadows a longer one. New vendor spellings are added here,
/// not in code.
const PREFIX_TABLE: &[(&str, &str)] = &[
    ("TenGigabitEthernet", "Te"),
    ("GigabitEthernet", "Gi"),
    ("FastEthernet", "Fa"),
    ("Port-channel", "Po"),
];

/// Canonicalize a raw interface name.
///
/// Maps known long-form prefixes to their short forms, preserving the
/// numeric suffix verbatim. Pure and total: unrecognized prefixes pass
/// through unchanged so downstream joins degrade to "no match" rather
/// than erroring. Idempotent, since no short form is itself a long-form
/// prefix.
pub fn normalize(raw: &str) -> InterfaceKey {
    let raw = raw.trim();
    for (long, short) in PREFIX_TABLE {
        if let Some(suffix) = raw.strip_prefix(long) {
            return InterfaceKey(format!("{short}{suffix}"));
        }
    }
    InterfaceKey(raw.to_string())
}
