use chainsight_core::error::{ChainsightError, ErrorCode};
use chainsight_core::model::{EdgeRecord, NodeRecord};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

const NODE_TABLE: &str = "node";
const EDGE_TABLE: &str = "edge";

const REQUIRED_NODE_COLUMNS: &[&str] = &["node_id", "type"];
const REQUIRED_EDGE_COLUMNS: &[&str] = &["source", "target"];

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("required column `{column}` missing from {table} records")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
    #[error("failed to read {table} records: {source}")]
    Read {
        table: &'static str,
        #[source]
        source: csv::Error,
    },
    #[error("malformed {table} record: {source}")]
    Malformed {
        table: &'static str,
        #[source]
        source: csv::Error,
    },
}

impl ChainsightError for RecordError {
    fn error_code(&self) -> ErrorCode {
        ErrorCode::MalformedInput
    }
}

pub fn read_node_records<R: Read>(reader: R) -> Result<Vec<NodeRecord>, RecordError> {
    collect_records(csv_reader(reader), NODE_TABLE, REQUIRED_NODE_COLUMNS)
}

pub fn read_edge_records<R: Read>(reader: R) -> Result<Vec<EdgeRecord>, RecordError> {
    collect_records(csv_reader(reader), EDGE_TABLE, REQUIRED_EDGE_COLUMNS)
}

pub fn read_node_records_from_path(path: impl AsRef<Path>) -> Result<Vec<NodeRecord>, RecordError> {
    collect_records(csv_reader_at(path, NODE_TABLE)?, NODE_TABLE, REQUIRED_NODE_COLUMNS)
}

pub fn read_edge_records_from_path(path: impl AsRef<Path>) -> Result<Vec<EdgeRecord>, RecordError> {
    collect_records(csv_reader_at(path, EDGE_TABLE)?, EDGE_TABLE, REQUIRED_EDGE_COLUMNS)
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader)
}

fn csv_reader_at(
    path: impl AsRef<Path>,
    table: &'static str,
) -> Result<csv::Reader<std::fs::File>, RecordError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| RecordError::Read { table, source })
}

/// Header validation precedes row parsing: a missing required column fails
/// the whole source and no rows are returned.
fn collect_records<R: Read, T: DeserializeOwned>(
    mut reader: csv::Reader<R>,
    table: &'static str,
    required: &[&'static str],
) -> Result<Vec<T>, RecordError> {
    let headers = reader
        .headers()
        .map_err(|source| RecordError::Read { table, source })?
        .clone();
    for &column in required {
        if !headers.iter().any(|h| h == column) {
            return Err(RecordError::MissingColumn { table, column });
        }
    }

    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| RecordError::Malformed { table, source })
}
