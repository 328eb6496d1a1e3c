use serde::{Deserialize, Serialize};

/// Records per-epoch loss for one training run.
#[derive(Debug, Default)]
pub struct TrainingMetrics {
    losses: Vec<f32>,
}

impl TrainingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_epoch(&mut self, loss: f32) {
        self.losses.push(loss);
    }

    pub fn losses(&self) -> &[f32] {
        &self.losses
    }

    pub fn snapshot(&self) -> TrainingSnapshot {
        let epochs = self.losses.len();
        let initial_loss = self.losses.first().copied().unwrap_or(0.0);
        let final_loss = self.losses.last().copied().unwrap_or(0.0);

        let mut best_epoch = 0;
        let mut best_loss = initial_loss;
        for (epoch, &loss) in self.losses.iter().enumerate() {
            if loss < best_loss {
                best_epoch = epoch;
                best_loss = loss;
            }
        }

        TrainingSnapshot {
            epochs,
            initial_loss,
            final_loss,
            best_epoch,
            best_loss,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSnapshot {
    pub epochs: usize,
    pub initial_loss: f32,
    pub final_loss: f32,
    pub best_epoch: usize,
    pub best_loss: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_tracks_first_final_and_best_loss() {
        let mut metrics = TrainingMetrics::new();
        for loss in [1.2, 0.8, 0.9, 0.4, 0.5] {
            metrics.record_epoch(loss);
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.epochs, 5);
        assert_eq!(snapshot.initial_loss, 1.2);
        assert_eq!(snapshot.final_loss, 0.5);
        assert_eq!(snapshot.best_epoch, 3);
        assert_eq!(snapshot.best_loss, 0.4);
    }

    #[test]
    fn empty_run_snapshots_to_zeroes() {
        let snapshot = TrainingMetrics::new().snapshot();
        assert_eq!(snapshot.epochs, 0);
        assert_eq!(snapshot.initial_loss, 0.0);
        assert_eq!(snapshot.final_loss, 0.0);
    }
}
