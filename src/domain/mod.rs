//! Delivery domain types

pub mod bulk;
pub mod message;

pub use bulk::{BulkFailure, BulkItem, BulkReport};
pub use message::{AttachmentDescriptor, DispatchResult, OutboundMessage, PDF_CONTENT_TYPE};
