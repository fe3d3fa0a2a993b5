use std::fmt;

use serde::{Deserialize, Serialize};

use super::reading::FieldKind;

/// The reason a candidate failed validation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ViolationKind {
    /// The raw text did not parse as a positive base-10 integer
    NotANumber,

    /// The value parsed but falls outside the clinically plausible range
    OutOfRange,

    /// The values are individually plausible but mutually impossible
    /// (systolic at or below diastolic)
    InternalInconsistency,
}

/// A single reason a submission was rejected, tied to the originating field
/// so the form can highlight exactly the offending input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationViolation {
    /// The field the offending input belongs to
    pub field_kind: FieldKind,

    /// What went wrong
    pub kind: ViolationKind,

    /// The input as the user or the recognition engine produced it
    pub raw_text: String,
}

impl fmt::Display for ValidationViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ViolationKind::NotANumber => {
                write!(f, "{}: '{}' is not a number", self.field_kind.label(), self.raw_text)
            }
            ViolationKind::OutOfRange => {
                write!(
                    f,
                    "{}: {} is outside the plausible range",
                    self.field_kind.label(),
                    self.raw_text
                )
            }
            ViolationKind::InternalInconsistency => {
                write!(f, "systolic pressure must be greater than diastolic pressure")
            }
        }
    }
}
