/// Pattern-based batch renaming
///
/// This module handles:
/// - Compiling naming patterns into field sequences (pattern.rs)
/// - Validating batch parameters and sidecar lists (params.rs)
/// - Planning which path moves where, including conflicts (plan.rs)

pub mod params;
pub mod pattern;
pub mod plan;

pub use params::{parse_sidecars, OptionsError, RenameParams, SidecarError};
pub use pattern::{Pattern, PatternError};
pub use plan::plan_targets;
