//! Storage Service configuration: locations, spaces and pipelines.

mod location;
mod pipeline;
mod space;
mod space_type;

pub use location::{BrowseResult, Location, MoveFile};
pub use pipeline::{NewPipeline, Pipeline};
pub use space::Space;
pub use space_type::SpaceType;
