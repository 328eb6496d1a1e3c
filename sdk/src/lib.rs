pub mod pipeline;

pub use pipeline::{run_pipeline, run_pipeline_from_paths, PipelineError, PipelineOutput};
