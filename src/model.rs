//! Typed records produced by the parsers and consumed by the fusion engine.
//!
//! All entities here are derived, immutable, and scoped to one device's
//! report run. Everything report-facing derives `Serialize` so the external
//! serializer (CSV, XLSX, JSON) can render records without the core owning
//! any file format.

use serde::Serialize;

use crate::normalize::InterfaceKey;

/// Opaque output of one command against one device.
///
/// Produced by the external session collaborator, consumed once by a parser.
#[derive(Debug, Clone)]
pub struct RawBlock {
    /// Display name of the device that produced the output.
    pub device_id: String,

    /// The command that was executed.
    pub command: String,

    /// The raw command output.
    pub text: String,
}

/// One row of `show interfaces status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub key: InterfaceKey,

    /// Media type column (e.g. `10/100/1000BaseTX`).
    pub media: Option<String>,

    /// Link status column (`connected`, `notconnect`, `disabled`, ...).
    pub status: Option<String>,

    /// VLAN/mode column (`1`, `trunk`, `routed`).
    pub admin_mode: Option<String>,
}

/// One row of `show interfaces description`.
///
/// The description table is the authoritative interface enumeration:
/// fusion emits exactly one record per row found here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptionRow {
    pub key: InterfaceKey,
    pub description: String,
}

/// One `show interfaces switchport` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SwitchportRow {
    pub key: InterfaceKey,
    pub admin_mode: Option<String>,
    pub access_vlan: Option<String>,
    pub native_vlan: Option<String>,
    pub voice_vlan: Option<String>,

    /// Comma list of allowed trunk VLANs, continuation lines already joined.
    pub trunk_vlans: Option<String>,
}

impl SwitchportRow {
    pub fn new(key: InterfaceKey) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }
}

/// One learned MAC entry from `show mac address-table`.
///
/// Many bindings may share a key; the same MAC legitimately appears once
/// per VLAN it is learned on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacBinding {
    pub vlan: String,
    pub mac_address: String,
    pub key: InterfaceKey,
}

/// Which discovery protocol reported a neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NeighborProtocol {
    Cdp,
    Lldp,
}

/// One neighbor seen on a local interface via CDP or LLDP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighborRecord {
    pub protocol: NeighborProtocol,
    pub local_key: InterfaceKey,
    pub remote_name: Option<String>,
    pub remote_ip: Option<String>,

    /// CDP platform string or LLDP system description.
    pub remote_platform_or_description: Option<String>,
    pub remote_port: Option<String>,
}

/// Switchport settings scraped from `show run interface X` output.
///
/// Used to fill fields the switchport detail block left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceConfig {
    pub admin_mode: Option<String>,
    pub access_vlan: Option<String>,
    pub voice_vlan: Option<String>,
    pub trunk_vlans: Option<String>,
}

/// One bundle from `show etherchannel summary`: a port-channel and its
/// member links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortChannelGroup {
    pub key: InterfaceKey,
    pub members: Vec<InterfaceKey>,
}

/// Fusion output: one row of the port matrix.
///
/// Built incrementally field-by-field by the fusion engine, immutable after
/// emission. Fields from missing tables stay `None`/empty rather than
/// dropping the row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceRecord {
    pub key: InterfaceKey,
    pub description: String,
    pub media: Option<String>,
    pub status: Option<String>,

    /// MAC addresses learned on this interface, one entry per
    /// VLAN-deduplicated binding, in table order.
    pub mac_addresses: Vec<String>,
    pub admin_mode: Option<String>,
    pub access_vlan: Option<String>,
    pub native_vlan: Option<String>,
    pub voice_vlan: Option<String>,
    pub trunk_vlans: Option<String>,
    pub neighbor_name: Option<String>,
    pub neighbor_ip: Option<String>,
    pub neighbor_type: Option<String>,
    pub neighbor_port: Option<String>,

    /// Comma list of member links when this key is a port-channel.
    pub port_channel_members: Option<String>,
}

impl InterfaceRecord {
    /// Start a record from its enumeration row.
    pub fn new(key: InterfaceKey, description: String) -> Self {
        Self {
            key,
            description,
            ..Self::default()
        }
    }

    /// Overwrite the neighbor identity with one discovery record.
    ///
    /// All four neighbor fields are replaced together: only one neighbor
    /// identity survives per interface, never a field-wise merge.
    pub fn apply_neighbor(&mut self, neighbor: &NeighborRecord) {
        self.neighbor_name = neighbor.remote_name.clone();
        self.neighbor_ip = neighbor.remote_ip.clone();
        self.neighbor_type = neighbor.remote_platform_or_description.clone();
        self.neighbor_port = neighbor.remote_port.clone();
    }

    /// The aggregate MAC field as a single comma-joined string, the shape
    /// the port-matrix sheet renders.
    pub fn mac_addresses_joined(&self) -> String {
        self.mac_addresses.join(",")
    }
}

/// Derive the port-matrix status value from link and protocol state text.
///
/// `show interface` reports link and protocol separately; the matrix wants
/// the compressed vocabulary used by `show interfaces status`.
pub fn derive_status(link_status: &str, protocol_status: &str) -> String {
    if link_status == "administratively down" {
        "admin down".to_string()
    } else if link_status == "up" && protocol_status.contains("down") {
        "up/down".to_string()
    } else {
        link_status.to_string()
    }
}
