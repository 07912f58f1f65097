//! HL7 message templates and placeholder rendering.
//!
//! A message is built from three independently editable segment blocks
//! (MSH, PID, PV1). The header block may contain the `{TIMESTAMP}`
//! placeholder, which is expanded per message at send time; the other two
//! blocks pass through verbatim. Patient placeholders are expanded once,
//! when a catalog patient is applied to the snapshot.

mod registry;

pub use registry::{TemplateError, TemplateInfo, TemplateRegistry};

use crate::patients::TestPatient;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The literal placeholder expanded at render time.
pub const TIMESTAMP_TOKEN: &str = "{TIMESTAMP}";

/// 14-digit `YYYYMMDDHHMMSS` render format.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Replace every `{TIMESTAMP}` occurrence with `now` as 14 fixed digits.
///
/// Non-placeholder text passes through byte-identical. Pure function;
/// safe to call from any thread.
pub fn render(text: &str, now: NaiveDateTime) -> String {
    text.replace(TIMESTAMP_TOKEN, &now.format(TIMESTAMP_FORMAT).to_string())
}

/// The three-segment template snapshot a run is started with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSet {
    /// Message header block.
    pub msh: String,
    /// Patient identification block.
    pub pid: String,
    /// Patient visit block.
    pub pv1: String,
}

impl TemplateSet {
    /// Create a template set from raw segment text.
    pub fn new(
        msh: impl Into<String>,
        pid: impl Into<String>,
        pv1: impl Into<String>,
    ) -> Self {
        Self {
            msh: msh.into(),
            pid: pid.into(),
            pv1: pv1.into(),
        }
    }

    /// Compose one message: rendered header, then PID and PV1 verbatim,
    /// joined by line breaks.
    pub fn compose(&self, now: NaiveDateTime) -> String {
        format!("{}\n{}\n{}", render(&self.msh, now), self.pid, self.pv1)
    }

    /// Substitute patient-field placeholders in all three blocks.
    ///
    /// Unlike `{TIMESTAMP}`, patient fields are static for the life of a
    /// run, so substitution happens once on the snapshot.
    pub fn with_patient(self, patient: &TestPatient) -> Self {
        Self {
            msh: patient.apply(&self.msh),
            pid: patient.apply(&self.pid),
            pv1: patient.apply(&self.pv1),
        }
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::new(
            "MSH|^~\\&|SendingApp|SendingFac|ReceivingApp|ReceivingFac|{TIMESTAMP}||ADT^A01|MSGID|P|2.3",
            "PID|||9876543210||TEST^PATIENT||19700101|M|||1 Test Street^^Testville^London^SE1 2AB||02079460000",
            "PV1||I|W^389^1^A^^^||||1234^PrimaryDoctor^Joe||||||||||5678",
        )
    }
}
