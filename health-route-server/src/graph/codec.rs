//! Binary graph files.
//!
//! A graph file is a small header (magic bytes, format version, network
//! mode) followed by the node and edge lists, all encoded with bincode's
//! standard configuration. The header is decoded on its own first so a
//! foreign or outdated file is rejected before the body is read.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::TravelMode;

use super::builder::GraphBuilder;
use super::{Edge, Graph, GraphError, Node};

/// Magic bytes at the start of every graph file.
pub const MAGIC: [u8; 4] = *b"HRG1";

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    magic: [u8; 4],
    version: u32,
    mode: TravelMode,
}

#[derive(Debug, Serialize, Deserialize)]
struct Body {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

/// Write `graph` to `writer`.
///
/// Nodes are written in ascending id order and edges grouped by source node,
/// so encoding the same graph twice yields identical bytes.
pub fn encode<W: Write>(graph: &Graph, writer: &mut W) -> Result<(), GraphError> {
    let config = bincode::config::standard();

    let header = Header {
        magic: MAGIC,
        version: FORMAT_VERSION,
        mode: graph.mode(),
    };
    bincode::serde::encode_into_std_write(&header, writer, config)?;

    let mut nodes: Vec<Node> = graph.nodes().copied().collect();
    nodes.sort_unstable_by_key(|n| n.id);
    let body = Body {
        nodes,
        edges: graph.edges().copied().collect(),
    };
    bincode::serde::encode_into_std_write(&body, writer, config)?;
    Ok(())
}

/// Read a graph from `reader`, validating header and contents.
pub fn decode<R: Read>(reader: &mut R) -> Result<Graph, GraphError> {
    let config = bincode::config::standard();

    let header: Header = bincode::serde::decode_from_std_read(reader, config)?;
    if header.magic != MAGIC {
        return Err(GraphError::BadMagic);
    }
    if header.version != FORMAT_VERSION {
        return Err(GraphError::UnsupportedVersion(header.version));
    }

    let body: Body = bincode::serde::decode_from_std_read(reader, config)?;
    GraphBuilder::with_parts(header.mode, body.nodes, body.edges).build()
}

/// Write `graph` to a file at `path`, replacing any existing file.
pub fn save(graph: &Graph, path: impl AsRef<Path>) -> Result<(), GraphError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| GraphError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    encode(graph, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Load a graph file and check that it describes the `expected` network.
pub fn load(path: impl AsRef<Path>, expected: TravelMode) -> Result<Graph, GraphError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| GraphError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let graph = decode(&mut reader)?;

    if graph.mode() != expected {
        return Err(GraphError::ModeMismatch {
            expected,
            found: graph.mode(),
        });
    }

    info!(
        path = %path.display(),
        mode = %graph.mode(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded graph"
    );
    Ok(graph)
}
