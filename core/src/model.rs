use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_RISK_SCORE: f32 = 0.0;
pub const DEFAULT_EDGE_WEIGHT: f32 = 1.0;
pub const DEFAULT_EDGE_DELAY: f32 = 0.0;

/// Length of every derived feature vector: `[risk_score, category_index]`.
pub const FEATURE_DIM: usize = 2;

/// One row of the node record source. Optional columns may be missing
/// entirely or hold empty values; defaults are applied during encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub node_id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub risk_score: Option<f32>,
}

/// One row of the edge record source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub weight: Option<f32>,
    #[serde(default)]
    pub delay: Option<f32>,
}

impl NodeRecord {
    pub fn new(node_id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            node_type: node_type.into(),
            location: String::new(),
            risk_score: None,
        }
    }

    pub fn with_risk(mut self, risk_score: f32) -> Self {
        self.risk_score = Some(risk_score);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

impl EdgeRecord {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight: None,
            delay: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub node_type: String,
    pub location: String,
    pub risk_score: f32,
    /// Derived feature vector, `[risk_score, category_index]`.
    pub features: Vec<f32>,
    /// Derived classification label, equal to the category index.
    pub label: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub weight: f32,
    pub delay: f32,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: f32, delay: f32) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
            delay,
        }
    }
}

/// Category string -> index mapping, assigned in first-appearance order over
/// the node records. Rebuilt per load; the ordering is incidental to the
/// input row order and is not a stable contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryIndex {
    names: Vec<String>,
    by_name: HashMap<String, usize>,
}

impl CategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index for `name`, assigning the next one on first sight.
    pub fn get_or_insert(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.by_name.get(name) {
            return idx;
        }
        let idx = self.names.len();
        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), idx);
        idx
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Directed supply-chain graph: nodes in insertion order plus an adjacency
/// map keyed by source id. Self-loops and parallel edges are kept as
/// supplied. Endpoint existence is enforced by the ingestion builder, not
/// here.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SupplyGraph {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    adjacency: HashMap<String, Vec<Edge>>,
    edge_count: usize,
}

impl SupplyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node, returning `false` if the id is already present.
    pub fn insert_node(&mut self, node: Node) -> bool {
        if self.index.contains_key(&node.id) {
            return false;
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.adjacency
            .entry(edge.source.clone())
            .or_insert_with(Vec::new)
            .push(edge);
        self.edge_count += 1;
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Position of `id` in insertion order, shared with the tensor layouts
    /// derived from this graph.
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn outgoing(&self, id: &str) -> &[Edge] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.adjacency.values().flatten()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}

/// Node id -> embedding vector, in graph node order. Produced by one
/// training run and discarded after scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingTable {
    dim: usize,
    entries: Vec<(String, Vec<f32>)>,
}

impl EmbeddingTable {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, id: impl Into<String>, vector: Vec<f32>) {
        debug_assert_eq!(vector.len(), self.dim);
        self.entries.push((id.into(), vector));
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&[f32]> {
        self.entries
            .iter()
            .find(|(entry_id, _)| entry_id == id)
            .map(|(_, v)| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.entries.iter().map(|(id, v)| (id.as_str(), v.as_slice()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }
}

/// One ranked anomaly: node id and its distance from the embedding centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub node_id: String,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_index_assigns_first_appearance_order() {
        let mut categories = CategoryIndex::new();
        assert_eq!(categories.get_or_insert("warehouse"), 0);
        assert_eq!(categories.get_or_insert("supplier"), 1);
        assert_eq!(categories.get_or_insert("warehouse"), 0);
        assert_eq!(categories.get_or_insert("distributor"), 2);

        assert_eq!(categories.len(), 3);
        assert_eq!(categories.index_of("supplier"), Some(1));
        assert_eq!(categories.name(2), Some("distributor"));
        let names: Vec<&str> = categories.names().iter().map(String::as_str).collect();
        assert_eq!(names, ["warehouse", "supplier", "distributor"]);
    }

    #[test]
    fn graph_rejects_duplicate_node_ids() {
        let mut graph = SupplyGraph::new();
        let node = Node {
            id: "W1".to_string(),
            node_type: "warehouse".to_string(),
            location: String::new(),
            risk_score: 0.1,
            features: vec![0.1, 0.0],
            label: 0,
        };
        assert!(graph.insert_node(node.clone()));
        assert!(!graph.insert_node(node));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn graph_keeps_parallel_edges_and_self_loops() {
        let mut graph = SupplyGraph::new();
        for id in ["A", "B"] {
            graph.insert_node(Node {
                id: id.to_string(),
                node_type: "warehouse".to_string(),
                location: String::new(),
                risk_score: 0.0,
                features: vec![0.0, 0.0],
                label: 0,
            });
        }
        graph.add_edge(Edge::new("A", "B", 1.0, 0.0));
        graph.add_edge(Edge::new("A", "B", 2.0, 0.0));
        graph.add_edge(Edge::new("A", "A", 1.0, 0.0));

        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.outgoing("A").len(), 3);
        assert!(graph.outgoing("B").is_empty());
    }

    #[test]
    fn anomaly_records_serialize_for_the_presentation_layer() {
        let record = AnomalyRecord {
            node_id: "S1".to_string(),
            score: 1.5,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"node_id":"S1","score":1.5}"#);
    }

    #[test]
    fn node_record_round_trips_through_its_wire_names() {
        let json = r#"{"node_id":"W1","type":"warehouse"}"#;
        let record: NodeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.node_type, "warehouse");
        assert_eq!(record.location, "");
        assert_eq!(record.risk_score, None);
    }

    #[test]
    fn embedding_table_lookup() {
        let mut table = EmbeddingTable::new(2);
        table.push("A", vec![1.0, 2.0]);
        table.push("B", vec![3.0, 4.0]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("B"), Some([3.0, 4.0].as_slice()));
        assert_eq!(table.get("C"), None);
        assert_eq!(table.ids().collect::<Vec<_>>(), ["A", "B"]);
    }
}
