pub mod snapshot_writer;
pub mod summary;

pub use snapshot_writer::{
    extraction_timestamp, FenceStyle, RecordOutcome, SnapshotWriter, BINARY_PLACEHOLDER,
    DOCUMENT_TITLE,
};
pub use summary::ExtractionSummary;
