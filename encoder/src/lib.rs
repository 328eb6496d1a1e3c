pub mod adjacency;
pub mod layers;
pub mod model;
pub mod train;

use chainsight_core::error::{ChainsightError, ErrorCode};
use thiserror::Error;

pub use model::GraphConvNet;
pub use train::{train, TrainingOutput};

#[derive(Error, Debug)]
pub enum EncoderError {
    #[error("cannot train on an empty graph")]
    EmptyGraph,
    #[error("node `{node}` has a {got}-dimensional feature vector, expected {expected}")]
    FeatureDim {
        node: String,
        expected: usize,
        got: usize,
    },
    #[error("training diverged at epoch {epoch} (loss {loss})")]
    NumericInstability { epoch: usize, loss: f32 },
}

impl ChainsightError for EncoderError {
    fn error_code(&self) -> ErrorCode {
        match self {
            EncoderError::EmptyGraph => ErrorCode::EmptyGraph,
            EncoderError::FeatureDim { .. } => ErrorCode::Internal,
            EncoderError::NumericInstability { .. } => ErrorCode::NumericInstability,
        }
    }
}
