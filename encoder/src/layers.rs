use ndarray::{Array1, Array2};
use rand::distributions::Uniform;
use rand::Rng;

/// Neighborhood aggregation: multiplies the symmetric-normalized
/// propagation matrix into the feature matrix.
pub fn propagate(adj: &Array2<f32>, features: &Array2<f32>) -> Array2<f32> {
    adj.dot(features)
}

pub fn relu(x: &Array2<f32>) -> Array2<f32> {
    x.mapv(|v| v.max(0.0))
}

/// 1.0 where the pre-activation was positive, else 0.0.
pub fn relu_mask(pre_activation: &Array2<f32>) -> Array2<f32> {
    pre_activation.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 })
}

/// Learned linear transform. Weights are Glorot-uniform, bias starts at
/// zero.
#[derive(Debug, Clone)]
pub struct DenseLayer {
    pub weight: Array2<f32>,
    pub bias: Array1<f32>,
}

impl DenseLayer {
    pub fn glorot(input_dim: usize, output_dim: usize, rng: &mut impl Rng) -> Self {
        let limit = (6.0 / (input_dim + output_dim) as f32).sqrt();
        let dist = Uniform::new_inclusive(-limit, limit);
        Self {
            weight: Array2::from_shape_fn((input_dim, output_dim), |_| rng.sample(dist)),
            bias: Array1::zeros(output_dim),
        }
    }

    pub fn apply(&self, input: &Array2<f32>) -> Array2<f32> {
        input.dot(&self.weight) + &self.bias
    }

    pub fn input_dim(&self) -> usize {
        self.weight.nrows()
    }

    pub fn output_dim(&self) -> usize {
        self.weight.ncols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn relu_clamps_negatives() {
        let x = array![[1.0, -2.0], [0.0, 3.5]];
        assert_eq!(relu(&x), array![[1.0, 0.0], [0.0, 3.5]]);
        assert_eq!(relu_mask(&x), array![[1.0, 0.0], [0.0, 1.0]]);
    }

    #[test]
    fn propagate_with_identity_is_a_no_op() {
        let adj = Array2::eye(2);
        let x = array![[0.5, 1.0], [2.0, -1.0]];
        assert_eq!(propagate(&adj, &x), x);
    }

    #[test]
    fn glorot_weights_stay_within_their_limit() {
        let mut rng = StdRng::seed_from_u64(11);
        let layer = DenseLayer::glorot(2, 16, &mut rng);
        let limit = (6.0 / 18.0_f32).sqrt();
        assert!(layer.weight.iter().all(|w| w.abs() <= limit));
        assert!(layer.bias.iter().all(|&b| b == 0.0));
        assert_eq!(layer.input_dim(), 2);
        assert_eq!(layer.output_dim(), 16);
    }

    #[test]
    fn apply_adds_bias_per_output() {
        let mut layer = DenseLayer {
            weight: array![[1.0, 0.0], [0.0, 2.0]],
            bias: array![0.5, -0.5],
        };
        let out = layer.apply(&array![[3.0, 4.0]]);
        assert_eq!(out, array![[3.5, 7.5]]);
        layer.bias = array![0.0, 0.0];
        assert_eq!(layer.apply(&array![[3.0, 4.0]]), array![[3.0, 8.0]]);
    }
}
