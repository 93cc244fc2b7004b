/// Image inspection
///
/// This module handles:
/// - Decoded preview buffers and their histograms (buffer.rs)
/// - The bounded, LRU-evicting buffer cache (cache.rs)
/// - Widget-independent inspector pane state and neighbor preloading
///   (pane.rs)

pub mod buffer;
pub mod cache;
pub mod pane;

pub use buffer::InspectorBuffer;
pub use cache::BufferCache;
pub use pane::Inspector;
