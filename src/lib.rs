//! Placement - ordering for navigation and action-menu items
//!
//! Items declare optional `insertBefore` / `insertAfter` hints naming their
//! siblings. Placement turns them into one deterministic order, appending
//! anything it cannot resolve (cycles, self-references) in input order
//! instead of failing.

pub mod domain;
pub mod extension;
pub mod storage;
pub mod cli;

pub use domain::{arrange, order, order_tree, Arrangement, Hint, Item, ItemId, Node, Placement};
pub use extension::{Extension, ExtensionKind, Menu, Registry};
