//! The road network of a problem file, as a Graphviz graph.

use std::collections::HashMap;

use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};

use crate::results::*;

#[derive(PartialEq, Debug, Clone)]
struct Road {
    from: String,
    to: String,
    length: i64,
}

/// The locations, weighted by their name, and the roads, weighted by their
/// length.
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    pub graph: DiGraph<String, i64>,
    indices: HashMap<String, NodeIndex>,
    /// The coordinates given in the comments of the generated problems.
    positions: HashMap<NodeIndex, (i64, i64)>,
}

impl RoadGraph {
    // Locations are added in the order of first appearance.
    fn node(&mut self, name: &str) -> NodeIndex {
        match self.indices.get(name) {
            Some(idx) => *idx,
            None => {
                let idx = self.graph.add_node(name.to_string());
                self.indices.insert(name.to_string(), idx);
                idx
            }
        }
    }

    fn add_road(&mut self, road: &Road) {
        let from = self.node(&road.from);
        let to = self.node(&road.to);
        self.graph.add_edge(from, to, road.length);
    }

    fn pin(&mut self, name: &str, position: (i64, i64)) {
        let idx = self.node(name);
        self.positions.insert(idx, position);
    }

    pub fn position(&self, name: &str) -> Option<(i64, i64)> {
        self.indices
            .get(name)
            .and_then(|idx| self.positions.get(idx))
            .copied()
    }
}

// (= (road-length city-loc-1 city-loc-2) 22)
fn parse_road(line: &str) -> Option<Road> {
    let cleaned = line.replace(|c: char| c == '(' || c == ')', " ");
    let mut tokens = cleaned
        .split_whitespace()
        .skip_while(|t| *t != "road-length")
        .skip(1);
    let from = tokens.next()?.to_string();
    let to = tokens.next()?.to_string();
    let length = tokens.next()?.parse::<i64>().ok()?;
    Some(Road { from, to, length })
}

// ; 1,2 -> 3,4
fn parse_coordinates(line: &str) -> Option<((i64, i64), (i64, i64))> {
    let (a, b) = line.trim().trim_start_matches(';').split_once("->")?;
    let point = |s: &str| -> Option<(i64, i64)> {
        let (x, y) = s.trim().split_once(',')?;
        Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
    };
    Some((point(a)?, point(b)?))
}

/// Reads all the `road-length` facts of a problem file.
///
/// A coordinate comment (`; x,y -> x,y`) just before a road pins the
/// positions of its two ends.
pub fn parse_roads(path: &str, content: &str) -> BResult<RoadGraph> {
    let lines: Vec<&str> = content.lines().collect();
    let error = |idx: usize, line: &str| {
        Box::new(ResultsError::ParsingRoad {
            path: path.to_string(),
            lineno: idx + 1,
            content: line.trim().to_string(),
        })
    };

    let mut graph = RoadGraph::default();
    for (idx, line) in lines.iter().copied().enumerate() {
        if line.contains("road-length") {
            let road = parse_road(line).ok_or_else(|| error(idx, line))?;
            graph.add_road(&road);
        } else if line.trim_start().starts_with(';') && line.contains("->") {
            let next = match lines.get(idx + 1) {
                Some(n) if n.contains("road-length") => *n,
                _ => {
                    debug!("parse_roads: {}: line {}: no road after the coordinates", path, idx + 1);
                    continue;
                }
            };
            let (a, b) = parse_coordinates(line).ok_or_else(|| error(idx, line))?;
            let road = parse_road(next).ok_or_else(|| error(idx + 1, next))?;
            graph.pin(&road.from, a);
            graph.pin(&road.to, b);
        }
    }
    debug!("parse_roads: {}: positions: {:?}", path, graph.positions);
    Ok(graph)
}

/// The graph in the DOT language. The pinned locations get a `pos`
/// attribute, for `neato -n`.
pub fn render_dot(graph: &RoadGraph) -> String {
    let edge_attributes = |_: &DiGraph<String, i64>, edge: EdgeReference<i64>| -> String {
        format!("weight={}", edge.weight())
    };
    let node_attributes = |_: &DiGraph<String, i64>, (idx, _): (NodeIndex, &String)| -> String {
        match graph.positions.get(&idx) {
            Some((x, y)) => format!("pos=\"{},{}!\"", x, y),
            None => "".to_string(),
        }
    };
    let dot = Dot::with_attr_getters(&graph.graph, &[], &edge_attributes, &node_attributes);
    format!("{}", dot)
}
