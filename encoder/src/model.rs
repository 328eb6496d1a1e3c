use crate::layers::{propagate, relu, DenseLayer};
use ndarray::Array2;
use rand::Rng;

/// Two-stage graph convolution: features are aggregated and projected to a
/// hidden dimension with a ReLU, then aggregated again and projected to one
/// logit per category. The second stage's output doubles as the node
/// embedding.
#[derive(Debug, Clone)]
pub struct GraphConvNet {
    pub conv1: DenseLayer,
    pub conv2: DenseLayer,
}

/// Intermediates of one forward pass, kept for the backward pass.
pub(crate) struct ForwardTrace {
    pub ax: Array2<f32>,
    pub pre_hidden: Array2<f32>,
    pub ah: Array2<f32>,
    pub logits: Array2<f32>,
}

impl GraphConvNet {
    pub fn new(
        input_dim: usize,
        hidden_dim: usize,
        output_dim: usize,
        rng: &mut impl Rng,
    ) -> Self {
        Self {
            conv1: DenseLayer::glorot(input_dim, hidden_dim, rng),
            conv2: DenseLayer::glorot(hidden_dim, output_dim, rng),
        }
    }

    pub fn forward(&self, adj: &Array2<f32>, features: &Array2<f32>) -> Array2<f32> {
        self.forward_trace(adj, features).logits
    }

    pub(crate) fn forward_trace(&self, adj: &Array2<f32>, features: &Array2<f32>) -> ForwardTrace {
        let ax = propagate(adj, features);
        let pre_hidden = self.conv1.apply(&ax);
        let hidden = relu(&pre_hidden);
        let ah = propagate(adj, &hidden);
        let logits = self.conv2.apply(&ah);
        ForwardTrace {
            ax,
            pre_hidden,
            ah,
            logits,
        }
    }

    pub fn hidden_dim(&self) -> usize {
        self.conv1.output_dim()
    }

    pub fn output_dim(&self) -> usize {
        self.conv2.output_dim()
    }
}
