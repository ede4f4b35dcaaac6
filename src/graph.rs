//! This module renders the original (pre-reduction) transition table as node and
//! edge tables for external graph visualization tools. It consumes the parsed
//! table and state catalog only, never the synthesized rules.

use crate::table::Table;
use crate::types::SourceRow;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;

/// The node id reserved for the terminal state.
pub const TERMINAL_NODE_ID: usize = 0;

/// One row of the node table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: usize,
    pub label: String,
}

/// One row of the edge table, labeled `read:write:direction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub label: String,
}

/// The exported node and edge tables of an original machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Renders the node table as tab-separated `id  label` lines.
    pub fn render_nodes(&self) -> String {
        self.nodes
            .iter()
            .map(|node| format!("{}\t{}", node.id, node.label))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders the edge table as tab-separated `source  target  label` lines.
    pub fn render_edges(&self) -> String {
        self.edges
            .iter()
            .map(|edge| format!("{}\t{}\t{}", edge.source, edge.target, edge.label))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders the graph as a flat elements array in the shape graph libraries
    /// such as cytoscape consume.
    pub fn to_elements_json(&self) -> String {
        let mut elements = Vec::new();

        for node in &self.nodes {
            elements.push(json!({
                "data": {
                    "id": node.id,
                    "label": node.label,
                }
            }));
        }

        for edge in &self.edges {
            elements.push(json!({
                "data": {
                    "source": edge.source,
                    "target": edge.target,
                    "label": edge.label,
                }
            }));
        }

        serde_json::to_string(&elements).unwrap_or_default()
    }
}

/// Exports a table's states and transitions as node and edge tables.
///
/// Node id 0 is reserved for the terminal state; catalog states are numbered from
/// one in catalog order, followed by destination states that never occur as
/// origins. Wildcard-origin rows expand into one edge per concrete state;
/// wildcard-destination edges resolve to a self-loop on the originating state;
/// halt-marked destinations resolve to the terminal node.
pub fn export(table: &Table) -> Graph {
    let mut nodes = vec![Node {
        id: TERMINAL_NODE_ID,
        label: "halt".to_string(),
    }];
    let mut ids: HashMap<&str, usize> = HashMap::new();

    for state in table.states() {
        ids.insert(state, nodes.len());
        nodes.push(Node {
            id: nodes.len(),
            label: state.clone(),
        });
    }
    for orphan in table.orphan_destinations() {
        ids.insert(orphan, nodes.len());
        nodes.push(Node {
            id: nodes.len(),
            label: orphan.to_string(),
        });
    }

    let mut edges = Vec::new();
    for row in table.rows() {
        let origins: Vec<&str> = if row.has_wildcard_state() {
            table.states().iter().map(String::as_str).collect()
        } else {
            vec![row.state.as_str()]
        };

        for origin in origins {
            let source = ids[origin];
            let target = if row.is_halt_bound() {
                TERMINAL_NODE_ID
            } else if row.has_wildcard_next() {
                source
            } else {
                ids[row.next.as_str()]
            };

            edges.push(Edge {
                source,
                target,
                label: edge_label(row),
            });
        }
    }

    Graph { nodes, edges }
}

fn edge_label(row: &SourceRow) -> String {
    format!("{}:{}:{}", row.read, row.write, row.direction)
}
