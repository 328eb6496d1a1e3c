use crate::EncoderError;
use chainsight_core::model::{SupplyGraph, FEATURE_DIM};
use ndarray::{Array2, Axis};

/// Dense symmetric-normalized propagation matrix for the graph, treated as
/// undirected. Every node gets one self-loop on top of whatever the input
/// supplied; parallel edges accumulate. Entry (v, u) is
/// `m / sqrt(deg(v) * deg(u))` with `m` the edge multiplicity and degrees
/// taken as row sums of the self-looped adjacency.
pub fn normalized_adjacency(graph: &SupplyGraph) -> Array2<f32> {
    let n = graph.node_count();
    let mut adj = Array2::<f32>::eye(n);

    for edge in graph.edges() {
        let (source, target) = match (
            graph.node_index(&edge.source),
            graph.node_index(&edge.target),
        ) {
            (Some(s), Some(t)) => (s, t),
            // endpoint existence is enforced at ingestion
            _ => continue,
        };
        adj[[source, target]] += 1.0;
        if source != target {
            adj[[target, source]] += 1.0;
        }
    }

    let degrees = adj.sum_axis(Axis(1));
    for ((row, col), value) in adj.indexed_iter_mut() {
        if *value != 0.0 {
            *value /= (degrees[row] * degrees[col]).sqrt();
        }
    }
    adj
}

/// Node features stacked in graph node order. Checks the fixed feature
/// width at this boundary even though ingestion always produces it.
pub fn feature_matrix(graph: &SupplyGraph) -> Result<Array2<f32>, EncoderError> {
    let mut features = Array2::zeros((graph.node_count(), FEATURE_DIM));
    for (row, node) in graph.nodes().enumerate() {
        if node.features.len() != FEATURE_DIM {
            return Err(EncoderError::FeatureDim {
                node: node.id.clone(),
                expected: FEATURE_DIM,
                got: node.features.len(),
            });
        }
        for (col, &value) in node.features.iter().enumerate() {
            features[[row, col]] = value;
        }
    }
    Ok(features)
}

/// Classification labels in graph node order.
pub fn labels(graph: &SupplyGraph) -> Vec<usize> {
    graph.nodes().map(|node| node.label).collect()
}
