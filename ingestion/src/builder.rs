use crate::encode::FeatureEncoder;
use crate::records::RecordError;
use chainsight_core::error::{ChainsightError, ErrorCode};
use chainsight_core::model::{
    CategoryIndex, Edge, EdgeRecord, Node, NodeRecord, SupplyGraph, DEFAULT_EDGE_DELAY,
    DEFAULT_EDGE_WEIGHT, DEFAULT_RISK_SCORE,
};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("duplicate node id `{0}`")]
    DuplicateNode(String),
    #[error("edge `{source_id}` -> `{target}` references unknown node `{missing}`")]
    UnknownEndpoint {
        source_id: String,
        target: String,
        missing: String,
    },
}

impl ChainsightError for IngestError {
    fn error_code(&self) -> ErrorCode {
        match self {
            IngestError::Record(source) => source.error_code(),
            IngestError::DuplicateNode(_) => ErrorCode::MalformedInput,
            IngestError::UnknownEndpoint { .. } => ErrorCode::ReferentialIntegrity,
        }
    }
}

/// Builds the directed graph and its category index from ordered record
/// rows. Fails without returning a partial graph: duplicate node ids and
/// edges whose endpoints are absent from the node set abort the build.
pub fn build_graph(
    node_records: &[NodeRecord],
    edge_records: &[EdgeRecord],
) -> Result<(SupplyGraph, CategoryIndex), IngestError> {
    let mut encoder = FeatureEncoder::new();
    let mut graph = SupplyGraph::new();

    for record in node_records {
        let (features, label) = encoder.encode(record);
        let node = Node {
            id: record.node_id.clone(),
            node_type: record.node_type.clone(),
            location: record.location.clone(),
            risk_score: record.risk_score.unwrap_or(DEFAULT_RISK_SCORE),
            features,
            label,
        };
        if !graph.insert_node(node) {
            return Err(IngestError::DuplicateNode(record.node_id.clone()));
        }
    }

    for record in edge_records {
        for endpoint in [&record.source, &record.target] {
            if !graph.contains(endpoint) {
                return Err(IngestError::UnknownEndpoint {
                    source_id: record.source.clone(),
                    target: record.target.clone(),
                    missing: endpoint.clone(),
                });
            }
        }
        graph.add_edge(Edge::new(
            record.source.clone(),
            record.target.clone(),
            record.weight.unwrap_or(DEFAULT_EDGE_WEIGHT),
            record.delay.unwrap_or(DEFAULT_EDGE_DELAY),
        ));
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        categories = encoder.categories().len(),
        "graph built"
    );

    Ok((graph, encoder.into_categories()))
}
