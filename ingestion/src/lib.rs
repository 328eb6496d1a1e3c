pub mod builder;
pub mod encode;
pub mod records;

pub use builder::{build_graph, IngestError};
pub use encode::{FeatureEncoder, FEATURE_DIM};
