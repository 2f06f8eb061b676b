//! Parsers for switchport configuration text.
//!
//! Covers the blank-line-delimited sections of `show interfaces
//! switchport`, the per-interface `show run interface X` scrape, and
//! `show etherchannel summary` bundle membership.

use log::debug;

use super::non_empty;
use crate::model::{InterfaceConfig, PortChannelGroup, SwitchportRow};
use crate::normalize::normalize;

/// Parse `show interfaces switchport` output.
///
/// Unlike the neighbor dumps there is no record-start marker: sections are
/// separated by blank lines, each opening with a `Name:` line. A
/// `Trunking VLANs Enabled:` value ending in a trailing comma continues
/// onto the next line and is concatenated before being stored.
pub fn parse_switchport_detail(text: &str) -> Vec<SwitchportRow> {
    let mut rows = Vec::new();

    for section in text.trim().split("\n\n") {
        let lines: Vec<&str> = section.lines().collect();
        let mut row: Option<SwitchportRow> = None;
        let mut admin_mode = None;
        let mut access_vlan = None;
        let mut native_vlan = None;
        let mut voice_vlan = None;
        let mut trunk_vlans = None;

        let mut index = 0;
        while index < lines.len() {
            let line = lines[index];

            if let Some(value) = line.strip_prefix("Name:") {
                row = Some(SwitchportRow::new(normalize(value.trim())));
            } else if let Some(value) = line.strip_prefix("Administrative Mode:") {
                admin_mode = non_empty(value.trim());
            } else if line.starts_with("Access Mode VLAN:") {
                access_vlan = nth_token(line, 3);
            } else if line.starts_with("Trunking Native Mode VLAN:") {
                native_vlan = nth_token(line, 4);
            } else if line.starts_with("Voice VLAN:") {
                voice_vlan = nth_token(line, 2);
            } else if line.starts_with("Trunking VLANs Enabled:") {
                let mut value = nth_token(line, 3).unwrap_or_default();
                // Trailing comma means the list wraps onto the next line.
                while value.ends_with(',') && index + 1 < lines.len() {
                    index += 1;
                    if let Some(token) = lines[index].split_whitespace().next() {
                        value.push_str(token);
                    }
                }
                trunk_vlans = non_empty(&value);
            }

            index += 1;
        }

        // Sections without a Name: line are preamble, not interfaces.
        let Some(mut row) = row else {
            continue;
        };
        row.admin_mode = admin_mode;
        row.access_vlan = access_vlan;
        row.native_vlan = native_vlan;
        row.voice_vlan = voice_vlan;
        row.trunk_vlans = trunk_vlans;
        rows.push(row);
    }

    rows
}

/// Whitespace token at `index`, owned.
fn nth_token(line: &str, index: usize) -> Option<String> {
    line.split_whitespace().nth(index).map(str::to_string)
}

/// Scan `show run interface X` output for switchport settings.
///
/// The `switchport trunk allowed vlan add` continuation form appends to the
/// previously seen set rather than replacing it.
pub fn parse_interface_config(text: &str) -> InterfaceConfig {
    let mut config = InterfaceConfig::default();

    for line in text.lines() {
        let line = line.trim();

        if line.contains("switchport mode access") {
            config.admin_mode = Some("access".to_string());
        } else if line.contains("switchport mode trunk") {
            config.admin_mode = Some("trunk".to_string());
        } else if let Some((_, vlan)) = line.split_once("switchport access vlan ") {
            config.access_vlan = non_empty(vlan.trim());
        } else if let Some((_, vlan)) = line.split_once("voice vlan ") {
            config.voice_vlan = non_empty(vlan.trim());
        } else if line.contains("switchport trunk allowed") {
            if let Some((_, vlans)) = line.split_once(" add ") {
                let vlans = vlans.trim();
                config.trunk_vlans = Some(match config.trunk_vlans.take() {
                    Some(existing) => format!("{existing},{vlans}"),
                    None => vlans.to_string(),
                });
            } else if let Some((_, vlans)) = line.split_once("allowed vlan ") {
                config.trunk_vlans = non_empty(vlans.trim());
            }
        }
    }

    config
}

/// Parse `show etherchannel summary` output into bundle membership.
///
/// Group rows start with a numeric group id; indented continuation lines
/// carry wrapped member lists. Member tokens keep their state flag in
/// parentheses (`Gi1/0/49(P)`), which is stripped before normalization.
pub fn parse_etherchannel_summary(text: &str) -> Vec<PortChannelGroup> {
    let mut groups: Vec<PortChannelGroup> = Vec::new();

    for line in text.lines() {
        let indented = line.starts_with(' ') || line.starts_with('\t');
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        if !indented && tokens[0].parse::<u32>().is_ok() {
            let Some(name) = tokens.get(1).map(|t| strip_state_flag(t)) else {
                continue;
            };
            let members = member_tokens(&tokens[2..]);
            groups.push(PortChannelGroup {
                key: normalize(name),
                members,
            });
        } else if indented {
            // Wrapped member list for the previous group.
            let members = member_tokens(&tokens);
            if members.is_empty() {
                continue;
            }
            match groups.last_mut() {
                Some(group) => group.members.extend(members),
                None => debug!("etherchannel continuation before any group: {line:?}"),
            }
        }
    }

    groups
}

/// Member references carry a parenthesized state flag; anything without
/// one (the protocol column, header noise) is not a member.
fn member_tokens(tokens: &[&str]) -> Vec<crate::normalize::InterfaceKey> {
    tokens
        .iter()
        .filter(|t| t.contains('('))
        .map(|t| normalize(strip_state_flag(t)))
        .collect()
}

fn strip_state_flag(token: &str) -> &str {
    match token.split_once('(') {
        Some((name, _)) => name,
        None => token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SWITCHPORT_DETAIL: &str = "\
Name: Gi1/0/1
Switchport: Enabled
Administrative Mode: trunk
Operational Mode: trunk
Access Mode VLAN: 1 (default)
Trunking Native Mode VLAN: 99 (mgmt)
Voice VLAN: none
Trunking VLANs Enabled: 10,20,30,
40,50
Pruning VLANs Enabled: 2-1001

Name: Gi1/0/2
Switchport: Enabled
Administrative Mode: static access
Operational Mode: static access
Access Mode VLAN: 10 (users)
Trunking Native Mode VLAN: 1 (default)
Voice VLAN: 110 (voice)
Trunking VLANs Enabled: ALL
";

    #[test]
    fn test_switchport_sections() {
        let rows = parse_switchport_detail(SWITCHPORT_DETAIL);
        assert_eq!(rows.len(), 2);

        let access = &rows[1];
        assert_eq!(access.key.as_str(), "Gi1/0/2");
        assert_eq!(access.admin_mode.as_deref(), Some("static access"));
        assert_eq!(access.access_vlan.as_deref(), Some("10"));
        assert_eq!(access.native_vlan.as_deref(), Some("1"));
        assert_eq!(access.voice_vlan.as_deref(), Some("110"));
        assert_eq!(access.trunk_vlans.as_deref(), Some("ALL"));
    }

    #[test]
    fn test_trunk_vlan_continuation_line() {
        let rows = parse_switchport_detail(SWITCHPORT_DETAIL);
        assert_eq!(rows[0].key.as_str(), "Gi1/0/1");
        assert_eq!(rows[0].trunk_vlans.as_deref(), Some("10,20,30,40,50"));
    }

    #[test]
    fn test_trunk_vlan_double_continuation() {
        let text = "\
Name: Gi1/0/3
Administrative Mode: trunk
Trunking VLANs Enabled: 10,20,
30,40,
50
";
        let rows = parse_switchport_detail(text);
        assert_eq!(rows[0].trunk_vlans.as_deref(), Some("10,20,30,40,50"));
    }

    #[test]
    fn test_preamble_section_skipped() {
        let text = "Capabilities: something\n\nName: Gi1/0/4\nAdministrative Mode: dynamic auto\n";
        let rows = parse_switchport_detail(text);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key.as_str(), "Gi1/0/4");
        assert_eq!(rows[0].admin_mode.as_deref(), Some("dynamic auto"));
    }

    #[test]
    fn test_interface_config_access_port() {
        let text = "\
Building configuration...

interface GigabitEthernet1/0/2
 description user port
 switchport access vlan 10
 switchport mode access
 switchport voice vlan 110
 spanning-tree portfast
end
";
        let config = parse_interface_config(text);
        assert_eq!(config.admin_mode.as_deref(), Some("access"));
        assert_eq!(config.access_vlan.as_deref(), Some("10"));
        assert_eq!(config.voice_vlan.as_deref(), Some("110"));
        assert_eq!(config.trunk_vlans, None);
    }

    #[test]
    fn test_interface_config_trunk_with_add_continuation() {
        let text = "\
interface GigabitEthernet1/0/1
 switchport mode trunk
 switchport trunk allowed vlan 10,20,30
 switchport trunk allowed vlan add 40,50
end
";
        let config = parse_interface_config(text);
        assert_eq!(config.admin_mode.as_deref(), Some("trunk"));
        assert_eq!(config.trunk_vlans.as_deref(), Some("10,20,30,40,50"));
    }

    #[test]
    fn test_interface_config_empty_output() {
        assert_eq!(parse_interface_config(""), InterfaceConfig::default());
    }

    const ETHERCHANNEL_SUMMARY: &str = "\
Flags:  D - down        P - bundled in port-channel
        S - Layer2      U - in use

Number of channel-groups in use: 2
Number of aggregators:           2

Group  Port-channel  Protocol    Ports
------+-------------+-----------+-----------------------------------------------
1      Po1(SU)         LACP      Gi1/0/49(P) Gi1/0/50(P)
3      Po3(SD)         -         Gi1/0/51(D) Gi1/0/52(D)
                                 Gi2/0/51(D) Gi2/0/52(D)
";

    #[test]
    fn test_etherchannel_groups() {
        let groups = parse_etherchannel_summary(ETHERCHANNEL_SUMMARY);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key.as_str(), "Po1");
        assert_eq!(
            groups[0].members,
            vec![normalize("Gi1/0/49"), normalize("Gi1/0/50")]
        );
    }

    #[test]
    fn test_etherchannel_wrapped_member_line() {
        let groups = parse_etherchannel_summary(ETHERCHANNEL_SUMMARY);
        assert_eq!(groups[1].key.as_str(), "Po3");
        assert_eq!(groups[1].members.len(), 4);
        assert_eq!(groups[1].members[3], normalize("Gi2/0/52"));
    }
}
