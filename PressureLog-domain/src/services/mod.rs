// Domain services
// This module contains business logic implementations over the capture
// pipeline and the stored dataset.

pub mod export;
pub mod insights;
pub mod readings;
pub mod view;

// Re-export service traits and the view-model builder
pub use readings::{ReadingsService, ReadingsServiceError, ReadingsServiceTrait};
pub use view::{build_view, ReadingsView, SortDirection, SortKey, ViewRow};
