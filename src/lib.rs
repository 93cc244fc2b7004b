/// Batch renaming and preview inspection for RAW photo libraries
///
/// Two independent subsystems share this crate:
/// - `rename`: compiles textual naming patterns ("%Y%m%d_%f_%n3") and plans
///   which file moves where, sidecars and conflicts included
/// - `inspect`: a bounded cache of decoded preview buffers with LRU
///   eviction and neighbor preloading for the image inspector
///
/// Metadata extraction and preview decoding are collaborator traits
/// (`meta::ImageMetadata`, `preview::PreviewDecoder`); default
/// implementations cover cached summaries and embedded-JPEG extraction.

pub mod batch;
pub mod inspect;
pub mod meta;
pub mod paths;
pub mod preview;
pub mod rename;
pub mod scan;
pub mod settings;

pub use batch::{
    apply_plan, delete_with_sidecars, transfer_file, BatchProgress, BatchStatus, BatchTask,
    ItemFailure, TransferMode,
};
pub use inspect::{BufferCache, Inspector, InspectorBuffer};
pub use meta::{FastMetadata, ImageMetadata, MetadataLoader, MetadataSummary};
pub use preview::{
    DecodeError, DecodedPreview, EmbeddedPreviewDecoder, Histogram, PreviewDecoder, SizeHint,
};
pub use rename::{plan_targets, Pattern, PatternError, RenameParams};
pub use settings::{ConflictAction, Normalization, Settings};
