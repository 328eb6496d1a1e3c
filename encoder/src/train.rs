use crate::adjacency::{feature_matrix, labels, normalized_adjacency};
use crate::layers::relu_mask;
use crate::model::GraphConvNet;
use crate::EncoderError;
use chainsight_core::config::EncoderConfig;
use chainsight_core::metrics::{TrainingMetrics, TrainingSnapshot};
use chainsight_core::model::{EmbeddingTable, SupplyGraph};
use ndarray::{Array, Array2, Axis, Dimension, Zip};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

const BETA1: f32 = 0.9;
const BETA2: f32 = 0.999;
const EPSILON: f32 = 1e-8;

#[derive(Debug)]
pub struct TrainingOutput {
    pub network: GraphConvNet,
    pub embeddings: EmbeddingTable,
    pub report: TrainingSnapshot,
}

/// First and second Adam moments for one parameter tensor.
struct Moments<D: Dimension> {
    m: Array<f32, D>,
    v: Array<f32, D>,
}

impl<D: Dimension> Moments<D> {
    fn zeros_like(param: &Array<f32, D>) -> Self {
        Self {
            m: Array::zeros(param.raw_dim()),
            v: Array::zeros(param.raw_dim()),
        }
    }

    fn step(&mut self, param: &mut Array<f32, D>, grad: &Array<f32, D>, lr: f32, t: i32) {
        let correction1 = 1.0 - BETA1.powi(t);
        let correction2 = 1.0 - BETA2.powi(t);
        Zip::from(param)
            .and(grad)
            .and(&mut self.m)
            .and(&mut self.v)
            .for_each(|p, &g, m, v| {
                *m = BETA1 * *m + (1.0 - BETA1) * g;
                *v = BETA2 * *v + (1.0 - BETA2) * g * g;
                let m_hat = *m / correction1;
                let v_hat = *v / correction2;
                *p -= lr * m_hat / (v_hat.sqrt() + EPSILON);
            });
    }
}

pub(crate) fn softmax_rows(logits: &Array2<f32>) -> Array2<f32> {
    let mut probs = logits.clone();
    for mut row in probs.rows_mut() {
        let max = row.fold(f32::NEG_INFINITY, |a, &b| a.max(b));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row.mapv_inplace(|v| v / sum);
    }
    probs
}

/// Mean negative log-likelihood of the true labels.
pub(crate) fn cross_entropy(probs: &Array2<f32>, labels: &[usize]) -> f32 {
    let mut total = 0.0;
    for (row, &label) in labels.iter().enumerate() {
        total -= probs[[row, label]].ln();
    }
    total / labels.len() as f32
}

/// Full-batch training of the two-stage convolution against the node
/// category labels, with hand-derived gradients and Adam updates. The
/// logits of a final clean forward pass become the embedding table.
///
/// Loss finiteness is checked every epoch; a diverging run fails fast
/// instead of returning unusable embeddings.
pub fn train(
    graph: &SupplyGraph,
    config: &EncoderConfig,
) -> Result<TrainingOutput, EncoderError> {
    if graph.node_count() == 0 {
        return Err(EncoderError::EmptyGraph);
    }

    let features = feature_matrix(graph)?;
    let targets = labels(graph);
    let num_categories = targets.iter().copied().max().map_or(1, |m| m + 1);
    let adj = normalized_adjacency(graph);
    let node_count = graph.node_count() as f32;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut network = GraphConvNet::new(
        features.ncols(),
        config.hidden_dim,
        num_categories,
        &mut rng,
    );

    let mut moments_w1 = Moments::zeros_like(&network.conv1.weight);
    let mut moments_b1 = Moments::zeros_like(&network.conv1.bias);
    let mut moments_w2 = Moments::zeros_like(&network.conv2.weight);
    let mut moments_b2 = Moments::zeros_like(&network.conv2.bias);
    let mut metrics = TrainingMetrics::new();

    for epoch in 1..=config.epochs {
        let trace = network.forward_trace(&adj, &features);
        let probs = softmax_rows(&trace.logits);
        let loss = cross_entropy(&probs, &targets);
        if !loss.is_finite() {
            return Err(EncoderError::NumericInstability { epoch, loss });
        }
        metrics.record_epoch(loss);

        // dL/dZ of softmax cross-entropy, averaged over nodes
        let mut dz = probs;
        for (row, &label) in targets.iter().enumerate() {
            dz[[row, label]] -= 1.0;
        }
        dz.mapv_inplace(|v| v / node_count);

        let dw2 = trace.ah.t().dot(&dz);
        let db2 = dz.sum_axis(Axis(0));
        let dah = dz.dot(&network.conv2.weight.t());
        // the propagation matrix is symmetric, so it is its own transpose
        let dhidden = adj.dot(&dah);
        let dpre = dhidden * relu_mask(&trace.pre_hidden);
        let dw1 = trace.ax.t().dot(&dpre);
        let db1 = dpre.sum_axis(Axis(0));

        let t = epoch as i32;
        moments_w1.step(&mut network.conv1.weight, &dw1, config.learning_rate, t);
        moments_b1.step(&mut network.conv1.bias, &db1, config.learning_rate, t);
        moments_w2.step(&mut network.conv2.weight, &dw2, config.learning_rate, t);
        moments_b2.step(&mut network.conv2.bias, &db2, config.learning_rate, t);

        if epoch == 1 || epoch % 20 == 0 {
            debug!(epoch, loss, "training step");
        }
    }

    let logits = network.forward(&adj, &features);
    let mut embeddings = EmbeddingTable::new(num_categories);
    for (row, node) in graph.nodes().enumerate() {
        embeddings.push(node.id.clone(), logits.row(row).to_vec());
    }

    let report = metrics.snapshot();
    info!(
        nodes = graph.node_count(),
        epochs = report.epochs,
        final_loss = report.final_loss,
        "training complete"
    );

    Ok(TrainingOutput {
        network,
        embeddings,
        report,
    })
}
