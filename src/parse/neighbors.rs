//! Line-driven state machines for CDP and LLDP neighbor detail output.
//!
//! Both commands emit repeating multi-line blocks separated by a
//! record-start marker line (`Device ID:` for CDP, `Local Intf:` for LLDP).
//! The parser is an explicit two-state machine: a marker seen while a
//! record is open flushes it before starting the next, and end of input
//! flushes the final record so a dump with no trailing marker still yields
//! its last neighbor.

use log::debug;

use super::non_empty;
use crate::model::{NeighborProtocol, NeighborRecord};
use crate::normalize::{InterfaceKey, normalize};

/// Parser state: between records, or accumulating fields for one.
enum BlockState<P> {
    Idle,
    Accumulating(P),
}

impl<P> BlockState<P> {
    /// Close the open record, if any, and return to idle.
    fn flush(&mut self) -> Option<P> {
        match std::mem::replace(self, BlockState::Idle) {
            BlockState::Idle => None,
            BlockState::Accumulating(partial) => Some(partial),
        }
    }
}

/// Fields accumulated for one CDP neighbor block.
#[derive(Default)]
struct CdpPartial {
    device_id: Option<String>,
    ip: Option<String>,
    platform: Option<String>,
    local_key: Option<InterfaceKey>,
    remote_port: Option<String>,
}

impl CdpPartial {
    fn finish(self) -> Option<NeighborRecord> {
        // A block that never named its local interface cannot join anywhere.
        let Some(local_key) = self.local_key else {
            debug!(
                "dropping CDP block without Interface line (device id {:?})",
                self.device_id
            );
            return None;
        };

        Some(NeighborRecord {
            protocol: NeighborProtocol::Cdp,
            local_key,
            remote_name: self.device_id,
            remote_ip: self.ip,
            remote_platform_or_description: self.platform,
            remote_port: self.remote_port,
        })
    }
}

/// Parse `show cdp neighbors detail` output.
pub fn parse_cdp_detail(text: &str) -> Vec<NeighborRecord> {
    let mut records = Vec::new();
    let mut state: BlockState<CdpPartial> = BlockState::Idle;

    for line in text.lines() {
        let trimmed = line.trim_start();

        if let Some(value) = trimmed.strip_prefix("Device ID:") {
            if let Some(record) = state.flush().and_then(CdpPartial::finish) {
                records.push(record);
            }
            state = BlockState::Accumulating(CdpPartial {
                device_id: non_empty(value.trim()),
                ..CdpPartial::default()
            });
            continue;
        }

        let BlockState::Accumulating(partial) = &mut state else {
            continue;
        };

        if let Some(value) = trimmed.strip_prefix("IP address:") {
            // Appears under both the entry and management address sections;
            // the last occurrence wins.
            partial.ip = non_empty(value.trim());
        } else if let Some(value) = trimmed.strip_prefix("Interface:") {
            apply_interface_line(partial, value);
        } else if let Some(value) = trimmed.strip_prefix("Platform:") {
            partial.platform = non_empty(before_comma(value));
        }
    }

    if let Some(record) = state.flush().and_then(CdpPartial::finish) {
        records.push(record);
    }

    records
}

/// Extract the local and remote interface references from a CDP
/// `Interface:` line, e.g.
/// `Interface: GigabitEthernet1/0/1,  Port ID (outgoing port): Gi0/2`.
///
/// The local reference is split on the first comma (trailing qualifiers
/// discarded) before normalization.
fn apply_interface_line(partial: &mut CdpPartial, value: &str) {
    let local = match value.split_once(',') {
        Some((local, _)) => local,
        None => value,
    };
    partial.local_key = Some(normalize(local));

    if let Some((_, remote)) = value.split_once("(outgoing port):") {
        partial.remote_port = non_empty(remote.trim());
    }
}

/// Truncate a field value at its first comma.
fn before_comma(value: &str) -> &str {
    match value.split_once(',') {
        Some((head, _)) => head.trim(),
        None => value.trim(),
    }
}

/// Fields accumulated for one LLDP neighbor block.
#[derive(Default)]
struct LldpPartial {
    local_key: Option<InterfaceKey>,
    remote_port: Option<String>,
    system_name: Option<String>,
    ip: Option<String>,
    system_description: Option<String>,

    /// Set when a `System Description:` marker was seen; the value is on
    /// the line that follows.
    awaiting_description: bool,
}

impl LldpPartial {
    fn new(local: &str) -> Self {
        Self {
            local_key: Some(normalize(local)),
            ..Self::default()
        }
    }

    fn finish(self) -> Option<NeighborRecord> {
        let local_key = self.local_key?;
        Some(NeighborRecord {
            protocol: NeighborProtocol::Lldp,
            local_key,
            remote_name: self.system_name,
            remote_ip: self.ip,
            remote_platform_or_description: self.system_description,
            remote_port: self.remote_port,
        })
    }
}

/// Parse `show lldp neighbors detail` output.
pub fn parse_lldp_detail(text: &str) -> Vec<NeighborRecord> {
    let mut records = Vec::new();
    let mut state: BlockState<LldpPartial> = BlockState::Idle;

    for line in text.lines() {
        let trimmed = line.trim_start();

        if let Some(value) = trimmed.strip_prefix("Local Intf:") {
            if let Some(record) = state.flush().and_then(LldpPartial::finish) {
                records.push(record);
            }
            state = BlockState::Accumulating(LldpPartial::new(value.trim()));
            continue;
        }

        let BlockState::Accumulating(partial) = &mut state else {
            continue;
        };

        if let Some(value) = trimmed.strip_prefix("Port id:") {
            partial.remote_port = non_empty(value.trim());
        } else if let Some(value) = trimmed.strip_prefix("System Name:") {
            partial.system_name = non_empty(value.trim());
        } else if let Some(value) = trimmed.strip_prefix("IP:") {
            // Management Addresses sub-block.
            partial.ip = non_empty(value.trim());
        } else if trimmed.starts_with("System Description:") {
            // Look-ahead field: the value is the next line.
            partial.awaiting_description = true;
        } else if partial.awaiting_description {
            partial.system_description = non_empty(line.trim());
            partial.awaiting_description = false;
        }
    }

    if let Some(record) = state.flush().and_then(LldpPartial::finish) {
        records.push(record);
    }

    records
}
