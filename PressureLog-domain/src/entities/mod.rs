// Domain entities and value objects
pub mod candidate;
pub mod conversions;
pub mod reading;
pub mod violation;

// Re-export common types for easier imports
pub use candidate::{BoundingRegion, FieldCandidate, TextFragment};
pub use reading::{FieldKind, Reading, ReadingSource};
pub use violation::{ValidationViolation, ViolationKind};
