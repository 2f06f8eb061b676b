//! # Portmatrix
//!
//! CLI-output parsing and topology fusion for network device port-matrix
//! reports.
//!
//! Portmatrix takes the free-text output of IOS-style show commands
//! (interface status/description tables, switchport blocks, MAC address
//! tables, CDP/LLDP neighbor detail) and fuses them into one normalized
//! record per physical interface per device.
//!
//! ## Features
//!
//! - Interface-name canonicalization shared by every parser
//! - Fixed-layout and delimited table parsing with per-row column profiles
//! - Stateful multi-line record parsers for CDP/LLDP/switchport blocks
//! - A left-join fusion engine with CDP-over-LLDP neighbor precedence
//! - A report assembler driving any session collaborator through the
//!   strict per-device command sequence
//!
//! Session transport (SSH, telnet, a test double) and report serialization
//! (CSV, XLSX, JSON) are external collaborators behind the [`session`]
//! traits and serde.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use portmatrix::{DeviceSpec, ReportAssembler};
//! # use portmatrix::{DeviceSession, Connect, SessionError};
//! # struct MyConnector;
//! # struct MySession;
//! # impl DeviceSession for MySession {
//! #     async fn send_command(&mut self, _: &str) -> Result<String, SessionError> { Ok(String::new()) }
//! #     async fn close(&mut self) -> Result<(), SessionError> { Ok(()) }
//! #     fn hostname(&self) -> &str { "sw1" }
//! # }
//! # impl Connect for MyConnector {
//! #     type Session = MySession;
//! #     async fn connect(&self, _: &DeviceSpec) -> Result<MySession, SessionError> { Ok(MySession) }
//! # }
//!
//! # async fn example(connector: MyConnector) {
//! let devices = vec![DeviceSpec {
//!     ip: "192.0.2.10".into(),
//!     device_type: "cisco_ios".into(),
//!     name: None,
//! }];
//!
//! let assembler = ReportAssembler::new(connector);
//! let matrix = assembler.run(&devices).await;
//! for report in &matrix.reports {
//!     println!("{}: {} interfaces", report.hostname, report.records.len());
//! }
//! # }
//! ```

pub mod error;
pub mod fuse;
pub mod model;
pub mod normalize;
pub mod parse;
pub mod report;
pub mod session;

// Re-export main types for convenience
pub use error::{Error, Result, SessionError};
pub use fuse::{FusionInputs, fuse};
pub use model::{
    DescriptionRow, InterfaceConfig, InterfaceRecord, MacBinding, NeighborProtocol,
    NeighborRecord, PortChannelGroup, RawBlock, StatusRow, SwitchportRow,
};
pub use normalize::{InterfaceKey, normalize};
pub use report::{DeviceReport, JobError, JobLog, JobSuccess, PortMatrix, ReportAssembler};
pub use session::{Connect, DeviceSession, DeviceSpec};
