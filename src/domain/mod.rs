//! Domain models for placement
//!
//! Contains the ordering logic without any I/O concerns.

mod id;
mod item;
mod graph;
mod order;
mod tree;

pub use id::{IdError, ItemId};
pub use item::{Hint, Item, Placement};
pub use graph::{ConstraintGraph, DanglingRef, Relation};
pub use order::{arrange, order, Arrangement};
pub use tree::{flatten, order_tree, sibling_collections, Node};
