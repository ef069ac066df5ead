//! Migration topologies
//!
//! A topology is a directed graph over island indices. Each edge carries a
//! weight in `[0, 1]` that a migration round uses as the probability of
//! sending migrants along it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, EvolutionError};

/// A directed edge to island `to`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub to: usize,
    pub weight: f64,
}

/// Shape of a generated topology
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum TopologyKind {
    /// No edges at all
    Unconnected,
    /// Each island exchanges with both neighbours
    #[default]
    Ring,
    /// Each island sends to the next
    OneWayRing,
    /// Every island sends to every other
    FullyConnected,
    /// Islands exchange only with a central hub
    Star { hub: usize },
}

impl TopologyKind {
    /// Generate a topology of this shape over `num_vertices` islands
    pub fn build(&self, num_vertices: usize) -> EvoResult<Topology> {
        match self {
            Self::Unconnected => Ok(Topology::unconnected(num_vertices)),
            Self::Ring => Ok(Topology::ring(num_vertices)),
            Self::OneWayRing => Ok(Topology::one_way_ring(num_vertices)),
            Self::FullyConnected => Ok(Topology::fully_connected(num_vertices)),
            Self::Star { hub } => Topology::star(num_vertices, *hub),
        }
    }
}

/// Directed, weighted graph of migration routes
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    adjacency: Vec<Vec<Edge>>,
}

impl Topology {
    /// Topology without vertices
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_kind(kind: &TopologyKind, n: usize) -> EvoResult<Self> {
        kind.build(n)
    }

    /// Topology with `n` vertices and no edges
    pub fn unconnected(n: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); n],
        }
    }

    /// Bidirectional ring
    pub fn ring(n: usize) -> Self {
        let mut topology = Self::unconnected(n);
        if n > 1 {
            for i in 0..n {
                let next = (i + 1) % n;
                topology.connect(i, next, 1.0);
                topology.connect(next, i, 1.0);
            }
        }
        topology
    }

    /// Ring where island `i` only sends to island `i + 1`
    pub fn one_way_ring(n: usize) -> Self {
        let mut topology = Self::unconnected(n);
        if n > 1 {
            for i in 0..n {
                topology.connect(i, (i + 1) % n, 1.0);
            }
        }
        topology
    }

    pub fn fully_connected(n: usize) -> Self {
        let mut topology = Self::unconnected(n);
        for i in 0..n {
            for j in (0..n).filter(|&j| j != i) {
                topology.connect(i, j, 1.0);
            }
        }
        topology
    }

    /// Hub exchanges with every other island in both directions
    pub fn star(n: usize, hub: usize) -> EvoResult<Self> {
        if n > 0 && hub >= n {
            return Err(EvolutionError::InvalidArgument(format!(
                "star hub {hub} outside of {n} vertices"
            )));
        }
        let mut topology = Self::unconnected(n);
        for i in (0..n).filter(|&i| i != hub) {
            topology.connect(hub, i, 1.0);
            topology.connect(i, hub, 1.0);
        }
        Ok(topology)
    }

    pub fn num_vertices(&self) -> usize {
        self.adjacency.len()
    }

    pub fn num_edges(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Append an isolated vertex and return its index
    pub fn add_vertex(&mut self) -> usize {
        self.adjacency.push(Vec::new());
        self.adjacency.len() - 1
    }

    /// Add an edge of weight 1
    pub fn add_edge(&mut self, from: usize, to: usize) -> EvoResult<()> {
        self.add_weighted_edge(from, to, 1.0)
    }

    /// Add an edge, or update the weight of an existing one
    pub fn add_weighted_edge(&mut self, from: usize, to: usize, weight: f64) -> EvoResult<()> {
        check_edge(from, to, weight, self.adjacency.len())?;
        self.connect(from, to, weight);
        Ok(())
    }

    /// Remove an edge; absent edges, including those with an endpoint
    /// outside the topology, are ignored
    pub fn remove_edge(&mut self, from: usize, to: usize) -> EvoResult<()> {
        if let Some(edges) = self.adjacency.get_mut(from) {
            edges.retain(|edge| edge.to != to);
        }
        Ok(())
    }

    /// Check every edge the way [`Topology::add_weighted_edge`] would
    ///
    /// Topologies built through this API are always valid; deserialized
    /// ones may not be.
    pub fn validate(&self) -> EvoResult<()> {
        let n = self.adjacency.len();
        for (from, edges) in self.adjacency.iter().enumerate() {
            for (position, edge) in edges.iter().enumerate() {
                check_edge(from, edge.to, edge.weight, n)?;
                if edges[..position].iter().any(|earlier| earlier.to == edge.to) {
                    return Err(EvolutionError::InvalidArgument(format!(
                        "duplicate edge {from} -> {}",
                        edge.to
                    )));
                }
            }
        }
        Ok(())
    }

    /// Edges leaving `from`, in insertion order
    pub fn outgoing(&self, from: usize) -> EvoResult<&[Edge]> {
        self.check_vertex(from)?;
        Ok(&self.adjacency[from])
    }

    /// Vertices with an edge into `to`
    pub fn incoming(&self, to: usize) -> EvoResult<Vec<usize>> {
        self.check_vertex(to)?;
        Ok(self
            .adjacency
            .iter()
            .enumerate()
            .filter(|(_, edges)| edges.iter().any(|edge| edge.to == to))
            .map(|(from, _)| from)
            .collect())
    }

    /// Destinations of the edges leaving `from`
    pub fn targets(&self, from: usize) -> EvoResult<Vec<usize>> {
        Ok(self.outgoing(from)?.iter().map(|edge| edge.to).collect())
    }

    pub fn are_adjacent(&self, from: usize, to: usize) -> bool {
        self.weight(from, to).is_some()
    }

    /// Weight of the edge `from -> to`, if present
    pub fn weight(&self, from: usize, to: usize) -> Option<f64> {
        self.adjacency
            .get(from)?
            .iter()
            .find(|edge| edge.to == to)
            .map(|edge| edge.weight)
    }

    /// Make sure the topology has at least `n` vertices
    pub(crate) fn ensure_vertices(&mut self, n: usize) {
        if self.adjacency.len() < n {
            self.adjacency.resize_with(n, Vec::new);
        }
    }

    /// Insert or update without validation
    fn connect(&mut self, from: usize, to: usize, weight: f64) {
        let edges = &mut self.adjacency[from];
        match edges.iter_mut().find(|edge| edge.to == to) {
            Some(edge) => edge.weight = weight,
            None => edges.push(Edge { to, weight }),
        }
    }

    fn check_vertex(&self, index: usize) -> EvoResult<()> {
        if index < self.adjacency.len() {
            Ok(())
        } else {
            Err(EvolutionError::OutOfRange {
                index,
                size: self.adjacency.len(),
            })
        }
    }
}

fn check_edge(from: usize, to: usize, weight: f64, n: usize) -> EvoResult<()> {
    if from >= n || to >= n {
        return Err(EvolutionError::InvalidArgument(format!(
            "edge {from} -> {to} outside of {n} vertices"
        )));
    }
    if from == to {
        return Err(EvolutionError::InvalidArgument(format!(
            "self-loop on vertex {from}"
        )));
    }
    if !(0.0..=1.0).contains(&weight) {
        return Err(EvolutionError::InvalidArgument(format!(
            "edge weight must be in [0, 1], got {weight}"
        )));
    }
    Ok(())
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Topology:")?;
        writeln!(f, "\tNumber of vertices:\t{}", self.num_vertices())?;
        writeln!(f, "\tNumber of edges:\t{}", self.num_edges())?;
        for (from, edges) in self.adjacency.iter().enumerate() {
            if edges.is_empty() {
                continue;
            }
            let targets: Vec<String> = edges
                .iter()
                .map(|edge| format!("{} ({})", edge.to, edge.weight))
                .collect();
            writeln!(f, "\t{from} -> {}", targets.join(", "))?;
        }
        Ok(())
    }
}
