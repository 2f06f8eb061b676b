//! The device session seam.
//!
//! Opening connections, credentials, and transport are not this crate's
//! concern: the report assembler talks to devices through these traits and
//! an external collaborator (an SSH scraper, an expect harness, a test
//! double) implements them. The core never blocks on its own; whatever
//! suspension happens lives behind these futures.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// One device entry from an inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSpec {
    /// Address the collaborator should connect to.
    pub ip: String,

    /// Platform hint (e.g. `cisco_ios`), passed through to the collaborator
    /// and echoed into the job log on failure.
    pub device_type: String,

    /// Optional display name; the session hostname is used when absent.
    #[serde(default)]
    pub name: Option<String>,
}

/// An open command session against one device.
pub trait DeviceSession: Send {
    /// Execute a show command and return its raw output.
    ///
    /// An empty string is a legitimate result: the assembler treats it as
    /// an absent table, not an error.
    fn send_command(
        &mut self,
        command: &str,
    ) -> impl Future<Output = Result<String, SessionError>> + Send;

    /// Close the session. Called exactly once per device, even after a
    /// command failure.
    fn close(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Device prompt/hostname used to label the device's report.
    fn hostname(&self) -> &str;
}

/// Factory opening sessions from inventory entries.
pub trait Connect: Send + Sync {
    type Session: DeviceSession;

    /// Connect to one device. A failure here means "no data for this
    /// device"; the assembler records it and moves on.
    fn connect(
        &self,
        spec: &DeviceSpec,
    ) -> impl Future<Output = Result<Self::Session, SessionError>> + Send;
}
