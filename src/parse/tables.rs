//! Parsers for column-positioned and delimited table output.
//!
//! Covers `show interfaces status`, `show interfaces description`, and
//! `show mac address-table`. The first line of each table is a header and
//! is discarded. Rows that do not match the expected shape are skipped
//! with a diagnostic, never fatal.

use std::sync::LazyLock;

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};
use regex::Regex;

use super::non_empty;
use crate::model::{DescriptionRow, MacBinding, StatusRow};
use crate::normalize::{InterfaceKey, normalize};

/// Column offsets for one interface-name width class.
///
/// Vendor output keeps the media and status columns at roughly fixed
/// character positions relative to the longest possible name on that
/// platform family, so offsets are selected per row by the length of the
/// first whitespace token. New vendor layouts are added here by data, not
/// by branching code.
#[derive(Debug)]
struct OffsetProfile {
    /// Exclusive upper bound on the first token's length for this profile.
    max_name_len: usize,

    /// Status column as a byte span.
    status: (usize, usize),

    /// VLAN/mode column as a byte span.
    vlan: (usize, usize),

    /// Media type column runs from here to end of line.
    media_start: usize,
}

const STATUS_PROFILES: &[OffsetProfile] = &[
    OffsetProfile {
        max_name_len: 6,
        status: (29, 43),
        vlan: (43, 53),
        media_start: 67,
    },
    OffsetProfile {
        max_name_len: 9,
        status: (32, 45),
        vlan: (45, 55),
        media_start: 70,
    },
    OffsetProfile {
        max_name_len: 13,
        status: (34, 47),
        vlan: (47, 57),
        media_start: 72,
    },
];

/// Status values `show interfaces status` emits in its Status column.
const STATUS_WORDS: &[&str] = &[
    "connected",
    "notconnect",
    "disabled",
    "err-disabled",
    "monitoring",
    "inactive",
    "suspended",
];

/// Byte offset where the Description column starts in
/// `show interfaces description` output.
const DESCRIPTION_COLUMN: usize = 55;

/// Shape of the MAC column in `show mac address-table` rows.
static MAC_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{4}\.[0-9a-fA-F]{4}\.[0-9a-fA-F]{4}$").expect("static pattern")
});

/// Slice a column span out of a line, tolerating short lines.
fn column(line: &str, span: (usize, usize)) -> &str {
    let (start, end) = span;
    let end = end.min(line.len());
    line.get(start..end).unwrap_or("")
}

/// Parse `show interfaces status` output.
///
/// Column boundaries are chosen per row from [`STATUS_PROFILES`]. When the
/// sliced status is not a known status word (hand-fed or unpadded output),
/// the row falls back to token scanning so short-form rows still parse. A
/// first token wider than every profile skips the row.
pub fn parse_status_table(text: &str) -> Vec<StatusRow> {
    let mut rows = Vec::new();

    for line in text.trim().lines().skip(1) {
        let Some(first) = line.split_whitespace().next() else {
            continue;
        };

        let Some(profile) = STATUS_PROFILES
            .iter()
            .find(|p| first.len() < p.max_name_len)
        else {
            debug!("skipping status row, name wider than any profile: {first}");
            continue;
        };

        let status = column(line, profile.status).trim();
        if STATUS_WORDS.contains(&status) {
            let vlan = column(line, profile.vlan).trim();
            let media = line.get(profile.media_start..).unwrap_or("").trim();
            rows.push(StatusRow {
                key: normalize(first),
                media: non_empty(media),
                status: non_empty(status),
                admin_mode: non_empty(vlan),
            });
        } else if let Some(row) = status_row_from_tokens(line) {
            rows.push(row);
        } else {
            debug!("skipping unparsable status row: {line:?}");
        }
    }

    rows
}

/// Token-scanning fallback for status rows whose columns are not at the
/// fixed offsets. The first known status word anchors the row: the token
/// after it is the VLAN/mode column, the final token the media type.
fn status_row_from_tokens(line: &str) -> Option<StatusRow> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let position = tokens.iter().position(|t| STATUS_WORDS.contains(t))?;
    if position == 0 {
        return None;
    }

    let status = tokens[position];
    let vlan = tokens.get(position + 1).copied().unwrap_or("");
    let media = if tokens.len() > position + 2 {
        tokens.last().copied().unwrap_or("")
    } else {
        ""
    };

    Some(StatusRow {
        key: normalize(tokens[0]),
        media: non_empty(media),
        status: non_empty(status),
        admin_mode: non_empty(vlan),
    })
}

/// Parse `show interfaces description` output.
///
/// The description table is the authoritative interface enumeration for
/// fusion. VLAN SVI rows (`Vl` prefix) are excluded here, upstream of the
/// join.
pub fn parse_description_table(text: &str) -> Vec<DescriptionRow> {
    let mut rows = Vec::new();

    for line in text.trim().lines().skip(1) {
        let Some(first) = line.split_whitespace().next() else {
            continue;
        };
        if first.starts_with("Vl") {
            trace!("excluding SVI from enumeration: {first}");
            continue;
        }

        let description = line
            .get(DESCRIPTION_COLUMN..)
            .unwrap_or("")
            .trim()
            .to_string();
        rows.push(DescriptionRow {
            key: normalize(first),
            description,
        });
    }

    rows
}

/// Parse `show mac address-table` output.
///
/// Rows are tokenized as `{vlan, mac, type, port}`. Separator rows, header
/// echoes, and footer counts all fail the MAC-column shape check and are
/// skipped. Bindings are deduplicated by `(vlan, mac)` preserving first-seen
/// order; the same MAC on two VLANs is two bindings.
pub fn parse_mac_table(text: &str) -> Vec<MacBinding> {
    let mut bindings = Vec::new();
    let mut seen: IndexSet<(String, String)> = IndexSet::new();

    for line in text.trim().lines().skip(1) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 4 {
            continue;
        }

        let vlan = tokens[0];
        if vlan.starts_with('-') {
            continue; // separator row
        }

        let mac = tokens[1];
        if !MAC_COLUMN.is_match(mac) {
            trace!("skipping non-binding MAC table row: {line:?}");
            continue;
        }

        if seen.insert((vlan.to_string(), mac.to_string())) {
            bindings.push(MacBinding {
                vlan: vlan.to_string(),
                mac_address: mac.to_string(),
                key: normalize(tokens[3]),
            });
        }
    }

    bindings
}

/// Group VLAN-deduplicated bindings by interface, in table order.
///
/// The aggregate is per binding, not per MAC: a MAC learned on two VLANs
/// contributes two entries for its interface.
pub fn aggregate_macs(bindings: &[MacBinding]) -> IndexMap<InterfaceKey, Vec<String>> {
    let mut grouped: IndexMap<InterfaceKey, Vec<String>> = IndexMap::new();
    for binding in bindings {
        grouped
            .entry(binding.key.clone())
            .or_default()
            .push(binding.mac_address.clone());
    }
    grouped
}
