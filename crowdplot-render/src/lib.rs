/*!
# crowdplot rendering

Builds the day image for a set of location series:

1. **coords**: fixed time window and shared value scale to pixels
2. **row**: area chart per location, filled with clipped severity bands
3. **frame**: title, hour grid, axes, rows and region markers
4. **svg**: serialization of the typed scene to SVG text

[`VectorExporter`] ties these together and writes one file per day.
*/

pub mod config;
pub mod coords;
pub mod scene;
pub mod row;
pub mod frame;
pub mod svg;
pub mod vector_export;

pub use config::{ChartConfig, Palette, Thresholds, TimeWindow};
pub use coords::{hour_label, value_to_y, TimeAxis};
pub use frame::compose_day;
pub use scene::{Document, Element};
pub use vector_export::{write_atomic, VectorExporter};
