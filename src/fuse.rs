//! Topology fusion: the multi-source join producing one record per
//! interface.
//!
//! The description table enumerates the output rows; every other source is
//! left-joined onto it by canonical key. A missing or empty table degrades
//! its fields to empty, it never drops a row or fails the fuse.

use indexmap::IndexMap;
use log::debug;

use crate::model::{
    DescriptionRow, InterfaceConfig, InterfaceRecord, MacBinding, NeighborRecord,
    PortChannelGroup, StatusRow, SwitchportRow,
};
use crate::normalize::InterfaceKey;
use crate::parse::aggregate_macs;

/// All per-device parse outputs feeding one fusion pass.
#[derive(Debug, Default)]
pub struct FusionInputs {
    pub status: Vec<StatusRow>,
    pub descriptions: Vec<DescriptionRow>,
    pub switchports: Vec<SwitchportRow>,
    pub mac_bindings: Vec<MacBinding>,
    pub cdp_neighbors: Vec<NeighborRecord>,
    pub lldp_neighbors: Vec<NeighborRecord>,

    /// Per-interface `show run interface X` scrape, keyed by canonical name.
    pub interface_configs: IndexMap<InterfaceKey, InterfaceConfig>,
    pub port_channels: Vec<PortChannelGroup>,
}

/// Fuse all sources into one record per enumerated interface.
///
/// Interfaces present in status/switchport/MAC sources but absent from the
/// description enumeration are not represented in the output; that
/// asymmetry is part of the contract, not an oversight of this join.
///
/// Neighbor precedence is LLDP first, CDP overwriting: when both protocols
/// report a neighbor for one key, the CDP identity survives wholesale.
pub fn fuse(inputs: &FusionInputs) -> Vec<InterfaceRecord> {
    let status_by_key = first_per_key(inputs.status.iter().map(|r| (&r.key, r)));
    let switchport_by_key = first_per_key(inputs.switchports.iter().map(|r| (&r.key, r)));
    let lldp_by_key = first_per_key(inputs.lldp_neighbors.iter().map(|r| (&r.local_key, r)));
    let cdp_by_key = first_per_key(inputs.cdp_neighbors.iter().map(|r| (&r.local_key, r)));
    let bundles_by_key = first_per_key(inputs.port_channels.iter().map(|g| (&g.key, g)));
    let macs_by_key = aggregate_macs(&inputs.mac_bindings);

    let mut records = Vec::with_capacity(inputs.descriptions.len());

    for enumeration in &inputs.descriptions {
        let key = &enumeration.key;
        let mut record = InterfaceRecord::new(key.clone(), enumeration.description.clone());

        if let Some(status) = status_by_key.get(key) {
            record.media = status.media.clone();
            record.status = status.status.clone();
        } else {
            debug!("no status row for {key}");
        }

        if let Some(switchport) = switchport_by_key.get(key) {
            record.admin_mode = switchport.admin_mode.clone();
            record.access_vlan = switchport.access_vlan.clone();
            record.native_vlan = switchport.native_vlan.clone();
            record.voice_vlan = switchport.voice_vlan.clone();
            record.trunk_vlans = switchport.trunk_vlans.clone();
        }

        // Running-config values fill whatever the switchport detail block
        // left empty; the detail block wins when both report a field.
        if let Some(config) = inputs.interface_configs.get(key) {
            fill_from_config(&mut record, config);
        }

        // The VLAN/mode column of the status table is the weakest mode
        // signal; use it only when nothing else spoke.
        if record.admin_mode.is_none() {
            if let Some(status) = status_by_key.get(key) {
                record.admin_mode = status.admin_mode.clone();
            }
        }

        if let Some(macs) = macs_by_key.get(key) {
            record.mac_addresses = macs.clone();
        }

        // LLDP first, then CDP over the same fields: CDP wins.
        if let Some(neighbor) = lldp_by_key.get(key) {
            record.apply_neighbor(neighbor);
        }
        if let Some(neighbor) = cdp_by_key.get(key) {
            record.apply_neighbor(neighbor);
        }

        if let Some(bundle) = bundles_by_key.get(key) {
            let members: Vec<&str> = bundle.members.iter().map(InterfaceKey::as_str).collect();
            record.port_channel_members = Some(members.join(","));
        }

        records.push(record);
    }

    records
}

fn fill_from_config(record: &mut InterfaceRecord, config: &InterfaceConfig) {
    if record.admin_mode.is_none() {
        record.admin_mode = config.admin_mode.clone();
    }
    if record.access_vlan.is_none() {
        record.access_vlan = config.access_vlan.clone();
    }
    if record.voice_vlan.is_none() {
        record.voice_vlan = config.voice_vlan.clone();
    }
    if record.trunk_vlans.is_none() {
        record.trunk_vlans = config.trunk_vlans.clone();
    }
}

/// First record per key, preserving source order. Devices occasionally
/// report the same key twice (stacked neighbors, flapping entries); only
/// one identity survives per interface.
fn first_per_key<'a, T>(
    pairs: impl Iterator<Item = (&'a InterfaceKey, &'a T)>,
) -> IndexMap<InterfaceKey, &'a T> {
    let mut map = IndexMap::new();
    for (key, value) in pairs {
        map.entry(key.clone()).or_insert(value);
    }
    map
}
