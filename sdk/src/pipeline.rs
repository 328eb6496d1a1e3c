use chainsight_core::config::AppConfig;
use chainsight_core::error::{ChainsightError, ErrorCode};
use chainsight_core::metrics::TrainingSnapshot;
use chainsight_core::model::{AnomalyRecord, CategoryIndex, EdgeRecord, NodeRecord, SupplyGraph};
use encoder::EncoderError;
use ingestion::records::RecordError;
use ingestion::IngestError;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("ingestion failed: {0}")]
    Ingest(#[from] IngestError),
    #[error("encoding failed: {0}")]
    Encode(#[from] EncoderError),
}

impl From<RecordError> for PipelineError {
    fn from(source: RecordError) -> Self {
        PipelineError::Ingest(IngestError::Record(source))
    }
}

impl ChainsightError for PipelineError {
    fn error_code(&self) -> ErrorCode {
        match self {
            PipelineError::Ingest(source) => source.error_code(),
            PipelineError::Encode(source) => source.error_code(),
        }
    }
}

/// Everything the presentation layer renders: the graph, the category
/// mapping it was encoded with, the ranked anomalies, and the training
/// summary. The embedding table itself stays internal to the run.
#[derive(Debug)]
pub struct PipelineOutput {
    pub graph: SupplyGraph,
    pub categories: CategoryIndex,
    pub anomalies: Vec<AnomalyRecord>,
    pub training: TrainingSnapshot,
}

/// Runs ingestion, training, and scoring over already-parsed records.
/// Blocks for the whole run; every failure is fatal to the invocation and
/// yields no partial output.
pub fn run_pipeline(
    node_records: &[NodeRecord],
    edge_records: &[EdgeRecord],
    config: &AppConfig,
) -> Result<PipelineOutput, PipelineError> {
    let (graph, categories) = ingestion::build_graph(node_records, edge_records)?;
    let output = encoder::train(&graph, &config.encoder)?;
    let anomalies = scoring::rank_anomalies(&output.embeddings, config.scoring.top_k);

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        anomalies = anomalies.len(),
        final_loss = output.report.final_loss,
        "pipeline complete"
    );

    Ok(PipelineOutput {
        graph,
        categories,
        anomalies,
        training: output.report,
    })
}

/// Convenience entry point for callers holding CSV files on disk.
pub fn run_pipeline_from_paths(
    node_path: impl AsRef<Path>,
    edge_path: impl AsRef<Path>,
    config: &AppConfig,
) -> Result<PipelineOutput, PipelineError> {
    let node_records = ingestion::records::read_node_records_from_path(node_path)?;
    let edge_records = ingestion::records::read_edge_records_from_path(edge_path)?;
    run_pipeline(&node_records, &edge_records, config)
}
