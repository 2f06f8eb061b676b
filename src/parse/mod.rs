//! Parsers turning raw command output into typed row records.
//!
//! Two shapes of output exist in the wild and each gets its own module:
//! column-positioned/delimited tables ([`tables`]) and repeating multi-line
//! record blocks ([`neighbors`], [`switchport`]). Every parser is pure text
//! in, records out: no session, no filesystem, no ambient state.

pub mod neighbors;
pub mod switchport;
pub mod tables;

pub use neighbors::{parse_cdp_detail, parse_lldp_detail};
pub use switchport::{
    parse_etherchannel_summary, parse_interface_config, parse_switchport_detail,
};
pub use tables::{
    aggregate_macs, parse_description_table, parse_mac_table, parse_status_table,
};

/// Trimmed, owned value, or `None` when blank.
pub(crate) fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
