//! Centroid-distance anomaly ranking over a node embedding table.

use chainsight_core::model::{AnomalyRecord, EmbeddingTable};
use ndarray::{Array1, Array2, Axis};
use std::cmp::Ordering;
use tracing::debug;

/// Component-wise mean of all embedding vectors. `None` for an empty table.
pub fn centroid(table: &EmbeddingTable) -> Option<Array1<f32>> {
    embedding_matrix(table).mean_axis(Axis(0))
}

/// Ranks nodes by Euclidean distance from the embedding centroid,
/// descending, keeping at most `top_k` records. Ties keep the table order.
/// An empty table yields an empty ranking.
pub fn rank_anomalies(table: &EmbeddingTable, top_k: usize) -> Vec<AnomalyRecord> {
    let matrix = embedding_matrix(table);
    let Some(centroid) = matrix.mean_axis(Axis(0)) else {
        return Vec::new();
    };

    let mut records: Vec<AnomalyRecord> = table
        .ids()
        .zip(matrix.rows())
        .map(|(node_id, row)| {
            let score = (&row - &centroid).mapv(|v| v * v).sum().sqrt();
            AnomalyRecord {
                node_id: node_id.to_string(),
                score,
            }
        })
        .collect();

    records.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    records.truncate(top_k);
    debug!(ranked = records.len(), top_k, "anomalies scored");
    records
}

fn embedding_matrix(table: &EmbeddingTable) -> Array2<f32> {
    let mut matrix = Array2::zeros((table.len(), table.dim()));
    for (row, (_, vector)) in table.iter().enumerate() {
        for (col, &value) in vector.iter().enumerate() {
            matrix[[row, col]] = value;
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &[f32])]) -> EmbeddingTable {
        let dim = entries.first().map_or(0, |(_, v)| v.len());
        let mut table = EmbeddingTable::new(dim);
        for (id, vector) in entries {
            table.push(*id, vector.to_vec());
        }
        table
    }

    #[test]
    fn farthest_node_scores_highest() {
        let table = table(&[
            ("A", &[0.0, 0.0]),
            ("B", &[1.0, 0.0]),
            ("C", &[10.0, 10.0]),
        ]);
        let records = rank_anomalies(&table, 10);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].node_id, "C");
        // sorted non-increasing
        for pair in records.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn scores_are_distances_from_the_centroid() {
        let table = table(&[("A", &[0.0, 0.0]), ("B", &[2.0, 0.0])]);
        let records = rank_anomalies(&table, 10);
        // centroid is (1, 0); both nodes are at distance 1
        for record in &records {
            assert!((record.score - 1.0).abs() < 1e-6);
        }
        let center = centroid(&table).unwrap();
        assert_eq!(center.to_vec(), vec![1.0, 0.0]);
    }

    #[test]
    fn top_k_truncates_to_the_smaller_count() {
        let table = table(&[
            ("A", &[0.0]),
            ("B", &[1.0]),
            ("C", &[2.0]),
            ("D", &[5.0]),
        ]);
        assert_eq!(rank_anomalies(&table, 2).len(), 2);
        assert_eq!(rank_anomalies(&table, 10).len(), 4);
        assert_eq!(rank_anomalies(&table, 0).len(), 0);
    }

    #[test]
    fn empty_table_yields_an_empty_ranking() {
        let table = EmbeddingTable::new(0);
        assert!(rank_anomalies(&table, 10).is_empty());
        assert!(centroid(&table).is_none());
    }

    #[test]
    fn ties_keep_table_order() {
        let table = table(&[
            ("A", &[1.0, 0.0]),
            ("B", &[-1.0, 0.0]),
            ("C", &[0.0, 1.0]),
            ("D", &[0.0, -1.0]),
        ]);
        let records = rank_anomalies(&table, 10);
        let ids: Vec<&str> = records.iter().map(|r| r.node_id.as_str()).collect();
        assert_eq!(ids, ["A", "B", "C", "D"]);
    }

    #[test]
    fn scores_are_non_negative() {
        let table = table(&[("A", &[-3.0, 4.0]), ("B", &[3.0, -4.0])]);
        for record in rank_anomalies(&table, 10) {
            assert!(record.score >= 0.0);
        }
    }
}
