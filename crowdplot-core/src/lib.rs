//! crowdplot core library
//!
//! Location metadata, snapshot discovery, per-day aggregation and row layout.

pub mod types;
pub mod metadata;
pub mod snapshot;
pub mod series;
pub mod layout;

// Re-export commonly used types and functions
pub use types::{Day, DaySeries, LocationId, LocationInfo, Point, Sample};
pub use metadata::{MetadataError, MetadataIndex};
pub use snapshot::{parse_snapshot_name, SnapshotCatalog, SnapshotError, SnapshotFile};
pub use series::aggregate_day;
pub use layout::{DayLayout, RegionSpan, RowGeometry, RowSlot};

/// Version information for the crowdplot core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
