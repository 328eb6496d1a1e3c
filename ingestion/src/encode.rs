use chainsight_core::model::{CategoryIndex, NodeRecord, DEFAULT_RISK_SCORE};

pub use chainsight_core::model::FEATURE_DIM;

/// Derives numeric features and classification labels from categorical node
/// attributes, building the category index as records are scanned.
#[derive(Debug, Default)]
pub struct FeatureEncoder {
    categories: CategoryIndex,
}

impl FeatureEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes one record, assigning its category an index on first sight.
    /// Returns the feature vector and the classification label.
    pub fn encode(&mut self, record: &NodeRecord) -> (Vec<f32>, usize) {
        let label = self.categories.get_or_insert(&record.node_type);
        let risk = record.risk_score.unwrap_or(DEFAULT_RISK_SCORE);
        (vec![risk, label as f32], label)
    }

    pub fn categories(&self) -> &CategoryIndex {
        &self.categories
    }

    pub fn into_categories(self) -> CategoryIndex {
        self.categories
    }
}
