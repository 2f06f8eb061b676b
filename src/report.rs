//! Per-device report assembly.
//!
//! The assembler owns the command sequencing for one report run: each
//! device is interrogated in a strict order (later parses join on keys
//! enumerated by earlier ones), the outputs are parsed and fused, and
//! per-device failures land in the job log instead of aborting the run.

use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::Serialize;

use crate::error::Result;
use crate::fuse::{FusionInputs, fuse};
use crate::model::{InterfaceRecord, RawBlock};
use crate::parse::{
    parse_cdp_detail, parse_description_table, parse_etherchannel_summary,
    parse_interface_config, parse_lldp_detail, parse_mac_table, parse_status_table,
    parse_switchport_detail,
};
use crate::session::{Connect, DeviceSession, DeviceSpec};

const SHOW_INTERFACES_STATUS: &str = "show interfaces status";
const SHOW_INTERFACES_DESCRIPTION: &str = "show interfaces description";
const SHOW_INTERFACES_SWITCHPORT: &str = "show interfaces switchport";
const SHOW_CDP_NEIGHBORS_DETAIL: &str = "show cdp neighbors detail";
const SHOW_LLDP_NEIGHBORS_DETAIL: &str = "show lldp neighbors detail";
const SHOW_MAC_ADDRESS_TABLE: &str = "show mac address-table";
const SHOW_ETHERCHANNEL_SUMMARY: &str = "show etherchannel summary";

/// The fused port matrix for one device.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceReport {
    /// Display name, from the inventory entry or the session hostname.
    pub hostname: String,
    pub ip: String,
    pub records: Vec<InterfaceRecord>,
}

/// Job log entry for a device that produced a report.
#[derive(Debug, Clone, Serialize)]
pub struct JobSuccess {
    pub device_ip: String,
    pub hostname: String,
}

/// Job log entry for a device that failed to contribute.
#[derive(Debug, Clone, Serialize)]
pub struct JobError {
    pub device_ip: String,
    pub device_type: String,
    pub error: String,
}

/// Per-run job log, serialized alongside the report output.
#[derive(Debug, Default, Serialize)]
pub struct JobLog {
    #[serde(rename = "Success")]
    pub success: Vec<JobSuccess>,
    #[serde(rename = "Error")]
    pub error: Vec<JobError>,
}

/// Output of one report run: per-device record sets plus the job log,
/// handed to the external serializer.
#[derive(Debug, Default)]
pub struct PortMatrix {
    pub reports: Vec<DeviceReport>,
    pub job_log: JobLog,
}

/// Sequences command execution per device and fuses the results.
pub struct ReportAssembler<C> {
    connector: C,
}

impl<C: Connect> ReportAssembler<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    /// Process every device in input order.
    ///
    /// A device-level failure (connection or command execution) removes
    /// that device's contribution and is recorded in the job log's error
    /// list; remaining devices are still processed.
    pub async fn run(&self, devices: &[DeviceSpec]) -> PortMatrix {
        let mut matrix = PortMatrix::default();

        for spec in devices {
            match self.collect_device(spec).await {
                Ok(report) => {
                    info!(
                        "completed {} [{}]: {} interfaces",
                        report.hostname,
                        report.ip,
                        report.records.len()
                    );
                    matrix.job_log.success.push(JobSuccess {
                        device_ip: spec.ip.clone(),
                        hostname: report.hostname.clone(),
                    });
                    matrix.reports.push(report);
                }
                Err(err) => {
                    warn!("skipping device {}: {err}", spec.ip);
                    matrix.job_log.error.push(JobError {
                        device_ip: spec.ip.clone(),
                        device_type: spec.device_type.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        matrix
    }

    /// Connect, collect, and always close, even after a failure mid-run.
    async fn collect_device(&self, spec: &DeviceSpec) -> Result<DeviceReport> {
        let mut session = self.connector.connect(spec).await?;
        let result = self.collect(&mut session, spec).await;
        if let Err(err) = session.close().await {
            debug!("error closing session to {}: {err}", spec.ip);
        }
        result
    }

    /// Run the fixed command sequence against one open session and fuse
    /// the parsed outputs.
    ///
    /// Order matters within a device: the description table enumerates the
    /// interfaces the per-interface sub-queries and the fusion join depend
    /// on. Between devices there is no ordering requirement.
    async fn collect(&self, session: &mut C::Session, spec: &DeviceSpec) -> Result<DeviceReport> {
        let hostname = spec
            .name
            .clone()
            .unwrap_or_else(|| session.hostname().to_string());
        info!("connected to {hostname} [{}]", spec.ip);

        let status = show(session, &hostname, SHOW_INTERFACES_STATUS).await?;
        let descriptions = show(session, &hostname, SHOW_INTERFACES_DESCRIPTION).await?;
        let switchport = show(session, &hostname, SHOW_INTERFACES_SWITCHPORT).await?;
        let cdp = show(session, &hostname, SHOW_CDP_NEIGHBORS_DETAIL).await?;
        let lldp = show(session, &hostname, SHOW_LLDP_NEIGHBORS_DETAIL).await?;
        let mac = show(session, &hostname, SHOW_MAC_ADDRESS_TABLE).await?;
        let etherchannel = show(session, &hostname, SHOW_ETHERCHANNEL_SUMMARY).await?;

        let enumeration = parse_description_table(&descriptions.text);

        // One sub-query per already-enumerated interface.
        let mut interface_configs = IndexMap::new();
        for row in &enumeration {
            let command = format!("show run interface {}", row.key);
            let block = show(session, &hostname, &command).await?;
            interface_configs.insert(row.key.clone(), parse_interface_config(&block.text));
        }

        let inputs = FusionInputs {
            status: parse_status_table(&status.text),
            descriptions: enumeration,
            switchports: parse_switchport_detail(&switchport.text),
            mac_bindings: parse_mac_table(&mac.text),
            cdp_neighbors: parse_cdp_detail(&cdp.text),
            lldp_neighbors: parse_lldp_detail(&lldp.text),
            interface_configs,
            port_channels: parse_etherchannel_summary(&etherchannel.text),
        };

        Ok(DeviceReport {
            hostname,
            ip: spec.ip.clone(),
            records: fuse(&inputs),
        })
    }
}

/// Execute one command and wrap its output. Empty output is an absent
/// table, not an error; the parsers yield nothing and the joins degrade.
async fn show<S: DeviceSession>(
    session: &mut S,
    device_id: &str,
    command: &str,
) -> Result<RawBlock> {
    info!("collecting {command:?} from {device_id}");
    let text = session.send_command(command).await?;
    Ok(RawBlock {
        device_id: device_id.to_string(),
        command: command.to_string(),
        text,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::SessionError;

    /// Session double that replays canned outputs and records every
    /// command sent, in order.
    struct ScriptedSession {
        hostname: String,
        outputs: Arc<HashMap<String, String>>,
        sent: Arc<Mutex<Vec<String>>>,
        fail_on: Option<String>,
    }

    impl DeviceSession for ScriptedSession {
        async fn send_command(
            &mut self,
            command: &str,
        ) -> std::result::Result<String, SessionError> {
            self.sent.lock().unwrap().push(command.to_string());
            if self.fail_on.as_deref() == Some(command) {
                return Err(SessionError::CommandFailed {
                    command: command.to_string(),
                    message: "scripted failure".to_string(),
                });
            }
            Ok(self.outputs.get(command).cloned().unwrap_or_default())
        }

        async fn close(&mut self) -> std::result::Result<(), SessionError> {
            self.sent.lock().unwrap().push("<close>".to_string());
            Ok(())
        }

        fn hostname(&self) -> &str {
            &self.hostname
        }
    }

    struct ScriptedConnect {
        outputs: Arc<HashMap<String, String>>,
        sent: Arc<Mutex<Vec<String>>>,
        refuse: bool,
        fail_on: Option<String>,
    }

    impl ScriptedConnect {
        fn new(outputs: HashMap<String, String>) -> Self {
            Self {
                outputs: Arc::new(outputs),
                sent: Arc::new(Mutex::new(Vec::new())),
                refuse: false,
                fail_on: None,
            }
        }
    }

    impl Connect for ScriptedConnect {
        type Session = ScriptedSession;

        async fn connect(
            &self,
            spec: &DeviceSpec,
        ) -> std::result::Result<ScriptedSession, SessionError> {
            if self.refuse {
                return Err(SessionError::ConnectionFailed {
                    host: spec.ip.clone(),
                    message: "connection refused".to_string(),
                });
            }
            Ok(ScriptedSession {
                hostname: "lab-sw-1".to_string(),
                outputs: self.outputs.clone(),
                sent: self.sent.clone(),
                fail_on: self.fail_on.clone(),
            })
        }
    }

    fn spec() -> DeviceSpec {
        DeviceSpec {
            ip: "192.0.2.10".to_string(),
            device_type: "cisco_ios".to_string(),
            name: None,
        }
    }

    fn canned_outputs() -> HashMap<String, String> {
        let mut outputs = HashMap::new();
        outputs.insert(
            SHOW_INTERFACES_STATUS.to_string(),
            "Port Name Status Vlan Duplex Speed Type\n\
             Gi1/0/1  connected  1  a-full  a-1000  10/100/1000BaseTX"
                .to_string(),
        );
        outputs.insert(
            SHOW_INTERFACES_DESCRIPTION.to_string(),
            format!(
                "Interface  Status  Protocol  Description\n{:<55}{}",
                "Gi1/0/1                        up             up", "Uplink to core",
            ),
        );
        outputs.insert(
            SHOW_CDP_NEIGHBORS_DETAIL.to_string(),
            "Device ID: core-sw\n  IP address: 10.0.0.1\n\
             Interface: GigabitEthernet1/0/1,  Port ID (outgoing port): Gi0/24\n"
                .to_string(),
        );
        outputs.insert(
            "show run interface Gi1/0/1".to_string(),
            "interface GigabitEthernet1/0/1\n switchport mode trunk\n\
             switchport trunk allowed vlan 10,20\nend"
                .to_string(),
        );
        outputs
    }

    #[tokio::test]
    async fn test_run_produces_report_and_success_entry() {
        let connector = ScriptedConnect::new(canned_outputs());
        let assembler = ReportAssembler::new(connector);

        let matrix = assembler.run(&[spec()]).await;

        assert_eq!(matrix.reports.len(), 1);
        assert!(matrix.job_log.error.is_empty());
        assert_eq!(matrix.job_log.success[0].hostname, "lab-sw-1");

        let report = &matrix.reports[0];
        assert_eq!(report.hostname, "lab-sw-1");
        assert_eq!(report.ip, "192.0.2.10");
        assert_eq!(report.records.len(), 1);

        let record = &report.records[0];
        assert_eq!(record.key.as_str(), "Gi1/0/1");
        assert_eq!(record.status.as_deref(), Some("connected"));
        assert_eq!(record.description, "Uplink to core");
        // Switchport detail was empty; running config filled the gap.
        assert_eq!(record.admin_mode.as_deref(), Some("trunk"));
        assert_eq!(record.trunk_vlans.as_deref(), Some("10,20"));
        // CDP neighbor applied with no LLDP competition.
        assert_eq!(record.neighbor_name.as_deref(), Some("core-sw"));
        assert_eq!(record.neighbor_port.as_deref(), Some("Gi0/24"));
    }

    #[tokio::test]
    async fn test_command_sequence_is_strict() {
        let connector = ScriptedConnect::new(canned_outputs());
        let sent = connector.sent.clone();
        let assembler = ReportAssembler::new(connector);

        assembler.run(&[spec()]).await;

        let sent = sent.lock().unwrap();
        let sent: Vec<&str> = sent.iter().map(String::as_str).collect();
        let expected = [
            SHOW_INTERFACES_STATUS,
            SHOW_INTERFACES_DESCRIPTION,
            SHOW_INTERFACES_SWITCHPORT,
            SHOW_CDP_NEIGHBORS_DETAIL,
            SHOW_LLDP_NEIGHBORS_DETAIL,
            SHOW_MAC_ADDRESS_TABLE,
            SHOW_ETHERCHANNEL_SUMMARY,
            "show run interface Gi1/0/1",
            "<close>",
        ];
        assert_eq!(sent, expected);
    }

    #[tokio::test]
    async fn test_connection_failure_recorded_not_fatal() {
        let mut connector = ScriptedConnect::new(canned_outputs());
        connector.refuse = true;
        let assembler = ReportAssembler::new(connector);

        let matrix = assembler.run(&[spec()]).await;

        assert!(matrix.reports.is_empty());
        assert!(matrix.job_log.success.is_empty());
        let err = &matrix.job_log.error[0];
        assert_eq!(err.device_ip, "192.0.2.10");
        assert_eq!(err.device_type, "cisco_ios");
        assert!(err.error.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_session_closed_after_command_failure() {
        let mut connector = ScriptedConnect::new(canned_outputs());
        connector.fail_on = Some(SHOW_INTERFACES_SWITCHPORT.to_string());
        let sent = connector.sent.clone();
        let assembler = ReportAssembler::new(connector);

        let matrix = assembler.run(&[spec()]).await;

        assert!(matrix.reports.is_empty());
        assert_eq!(matrix.job_log.error.len(), 1);
        assert_eq!(sent.lock().unwrap().last().map(String::as_str), Some("<close>"));
    }

    #[tokio::test]
    async fn test_second_device_processed_after_first_fails() {
        let mut connector = ScriptedConnect::new(canned_outputs());
        connector.fail_on = Some(SHOW_INTERFACES_STATUS.to_string());
        let assembler = ReportAssembler::new(connector);

        // Same scripted failure hits both devices; both are recorded, and
        // processing never aborts between them.
        let devices = [spec(), spec()];
        let matrix = assembler.run(&devices).await;
        assert_eq!(matrix.job_log.error.len(), 2);
    }

    #[tokio::test]
    async fn test_inventory_name_overrides_session_hostname() {
        let connector = ScriptedConnect::new(canned_outputs());
        let assembler = ReportAssembler::new(connector);

        let mut named = spec();
        named.name = Some("edge-closet-3".to_string());
        let matrix = assembler.run(&[named]).await;

        assert_eq!(matrix.reports[0].hostname, "edge-closet-3");
    }

    #[test]
    fn test_job_log_json_shape() {
        let log = JobLog {
            success: vec![],
            error: vec![JobError {
                device_ip: "192.0.2.10".to_string(),
                device_type: "cisco_ios".to_string(),
                error: "Connection failed".to_string(),
            }],
        };

        let json = serde_json::to_value(&log).unwrap();
        assert!(json["Success"].as_array().unwrap().is_empty());
        assert_eq!(json["Error"][0]["device_ip"], "192.0.2.10");
    }
}
