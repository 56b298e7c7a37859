//! Constraint graph for positioning hints
//!
//! One node per distinct item ID, one edge per hint that names an item in
//! the same collection. Edges point from the item to its target, so an
//! outgoing edge means "depends on". Uses petgraph for graph operations.
//!
//! The graph never rejects input: dangling references, duplicate IDs and
//! cycles are recorded for diagnostics and left to the orderer's fallback.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;
use std::collections::HashMap;

use super::id::ItemId;
use super::item::Placement;

/// Which hint produced an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Before,
    After,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Before => "insertBefore",
            Relation::After => "insertAfter",
        }
    }
}

/// A hint naming an ID that is not in the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingRef {
    pub item: ItemId,
    pub target: ItemId,
    pub relation: Relation,
}

/// Dependency relation between the items of one collection
#[derive(Debug, Default)]
pub struct ConstraintGraph {
    /// The underlying directed graph
    graph: DiGraph<ItemId, Relation>,

    /// Map from ItemId to node index
    node_map: HashMap<ItemId, NodeIndex>,

    dangling: Vec<DanglingRef>,

    duplicates: Vec<ItemId>,
}

impl ConstraintGraph {
    /// Builds the graph for a collection of items
    pub fn from_items<T: Placement>(items: &[T]) -> Self {
        let mut graph = Self::default();

        // First pass: add all nodes
        for item in items {
            let id = item.id();
            if graph.node_map.contains_key(id) {
                if !graph.duplicates.contains(id) {
                    graph.duplicates.push(id.clone());
                }
                continue;
            }
            let idx = graph.graph.add_node(id.clone());
            graph.node_map.insert(id.clone(), idx);
        }

        // Second pass: add all edges
        for item in items {
            let hints = item
                .insert_before()
                .iter()
                .map(|target| (target, Relation::Before))
                .chain(item.insert_after().iter().map(|target| (target, Relation::After)));

            for (target, relation) in hints {
                graph.add_hint(item.id(), target, relation);
            }
        }

        graph
    }

    fn add_hint(&mut self, item: &ItemId, target: &ItemId, relation: Relation) {
        let Some(&from) = self.node_map.get(item) else {
            return;
        };

        let Some(&to) = self.node_map.get(target) else {
            self.dangling.push(DanglingRef {
                item: item.clone(),
                target: target.clone(),
                relation,
            });
            return;
        };

        // The first hint naming a target labels the edge
        if self.graph.find_edge(from, to).is_none() {
            self.graph.add_edge(from, to, relation);
        }
    }

    /// Returns true if the item has at least one hint naming an item in the collection
    ///
    /// A hint naming the item itself counts: such an item can never be
    /// resolved and ends up in the fallback tail.
    pub fn is_positioned(&self, id: &ItemId) -> bool {
        self.node_map
            .get(id)
            .map(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Outgoing)
                    .next()
                    .is_some()
            })
            .unwrap_or(false)
    }

    /// Hints naming IDs outside the collection, in declaration order
    pub fn dangling(&self) -> &[DanglingRef] {
        &self.dangling
    }

    /// IDs declared more than once
    pub fn duplicates(&self) -> &[ItemId] {
        &self.duplicates
    }

    /// Groups of items whose hints reference each other in a cycle
    ///
    /// Members of each group, and the groups themselves, follow the input order.
    pub fn cycles(&self) -> Vec<Vec<ItemId>> {
        let mut groups: Vec<Vec<NodeIndex>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.find_edge(scc[0], scc[0]).is_some())
            .map(|mut scc| {
                scc.sort();
                scc
            })
            .collect();
        groups.sort();

        groups
            .into_iter()
            .map(|scc| {
                scc.into_iter()
                    .filter_map(|idx| self.graph.node_weight(idx).cloned())
                    .collect()
            })
            .collect()
    }
}
