//! Nested ordering
//!
//! Navigation sections and action groups hold their own children. Each
//! sibling collection is ordered on its own, so hints only ever match
//! siblings: a link in `workloads` cannot be placed before a link in
//! `networking`.
//!
//! Items whose parent is missing, or that name themselves as parent, become
//! roots. Items stuck in a parent cycle are never dropped; they are promoted
//! to roots after the regular roots.
//!
//! [`sibling_collections`] exposes the exact grouping [`order_tree`] uses, so
//! diagnostics look at the same collections the tree is built from.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::id::ItemId;
use super::item::Placement;
use super::order::arrange;

/// An ordered item with its ordered children
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node<T> {
    #[serde(flatten)]
    pub item: T,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node<T>>,
}

impl<T: Placement> Node<T> {
    /// Total number of items in this subtree, including this one
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Node::size).sum::<usize>()
    }

    /// Depth-first walk yielding `(depth, item)`
    pub fn walk(&self) -> Vec<(usize, &T)> {
        let mut out = Vec::new();
        self.walk_into(0, &mut out);
        out
    }

    fn walk_into<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a T)>) {
        out.push((depth, &self.item));
        for child in &self.children {
            child.walk_into(depth + 1, out);
        }
    }
}

/// Input item tagged with its position so duplicates stay distinguishable
struct Slot<'a, T> {
    index: usize,
    item: &'a T,
}

impl<T: Placement> Placement for Slot<'_, T> {
    fn id(&self) -> &ItemId {
        self.item.id()
    }

    fn insert_before(&self) -> &[ItemId] {
        self.item.insert_before()
    }

    fn insert_after(&self) -> &[ItemId] {
        self.item.insert_after()
    }
}

/// One sibling collection: input indices in input order
struct Collection {
    /// Input index of the item this collection sits under, `None` at the top level
    parent: Option<usize>,
    members: Vec<usize>,
}

struct Hierarchy<'a, T> {
    items: &'a [T],
    children: HashMap<&'a ItemId, Vec<usize>>,
    visited: Vec<bool>,
    collections: Vec<Collection>,
}

impl<'a, T: Placement> Hierarchy<'a, T> {
    fn build(items: &'a [T]) -> Self {
        let known: HashSet<&ItemId> = items.iter().map(|item| item.id()).collect();

        let mut children: HashMap<&ItemId, Vec<usize>> = HashMap::new();
        let mut roots = Vec::new();

        for (index, item) in items.iter().enumerate() {
            match item.parent() {
                Some(parent) if parent != item.id() && known.contains(parent) => {
                    children.entry(parent).or_default().push(index);
                }
                Some(parent) if parent != item.id() => {
                    tracing::debug!(item = %item.id(), parent = %parent, "Parent not found, treating as root");
                    roots.push(index);
                }
                _ => roots.push(index),
            }
        }

        let mut hierarchy = Self {
            items,
            children,
            visited: vec![false; items.len()],
            collections: Vec::new(),
        };

        hierarchy.expand(None, &roots);

        for index in 0..items.len() {
            if hierarchy.visited[index] {
                continue;
            }
            tracing::warn!(item = %items[index].id(), "Parent cycle detected, promoting item to root");
            hierarchy.expand(None, &[index]);
        }

        hierarchy
    }

    /// Records `candidates` not yet seen as one collection, then their children
    fn expand(&mut self, parent: Option<usize>, candidates: &[usize]) {
        let members: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|&index| !self.visited[index])
            .collect();
        if members.is_empty() {
            return;
        }
        for &index in &members {
            self.visited[index] = true;
        }

        self.collections.push(Collection {
            parent,
            members: members.clone(),
        });

        let items = self.items;
        for index in members {
            let child_indices = self
                .children
                .get(items[index].id())
                .cloned()
                .unwrap_or_default();
            self.expand(Some(index), &child_indices);
        }
    }
}

/// Splits items into the sibling collections [`order_tree`] orders
///
/// Members keep their input order. The top-level collection comes first,
/// followed by each parent's children depth-first, then every item promoted
/// out of a parent cycle as its own collection.
pub fn sibling_collections<T: Placement>(items: &[T]) -> Vec<Vec<&T>> {
    Hierarchy::build(items)
        .collections
        .into_iter()
        .map(|collection| {
            collection
                .members
                .into_iter()
                .map(move |index| &items[index])
                .collect()
        })
        .collect()
}

/// Orders a parent/child hierarchy, one sibling collection at a time
pub fn order_tree<T: Placement + Clone>(items: &[T]) -> Vec<Node<T>> {
    let hierarchy = Hierarchy::build(items);

    let mut nested: HashMap<usize, usize> = HashMap::new();
    let mut ordered: Vec<Vec<usize>> = Vec::with_capacity(hierarchy.collections.len());
    for (position, collection) in hierarchy.collections.iter().enumerate() {
        if let Some(parent) = collection.parent {
            nested.insert(parent, position);
        }

        let slots: Vec<Slot<'_, T>> = collection
            .members
            .iter()
            .map(|&index| Slot {
                index,
                item: &items[index],
            })
            .collect();
        ordered.push(
            arrange(&slots)
                .into_items()
                .into_iter()
                .map(|slot| slot.index)
                .collect(),
        );
    }

    let assemble = Assemble {
        items,
        ordered: &ordered,
        nested: &nested,
    };

    hierarchy
        .collections
        .iter()
        .enumerate()
        .filter(|(_, collection)| collection.parent.is_none())
        .flat_map(|(position, _)| assemble.nodes(position))
        .collect()
}

struct Assemble<'a, T> {
    items: &'a [T],
    ordered: &'a [Vec<usize>],
    nested: &'a HashMap<usize, usize>,
}

impl<T: Placement + Clone> Assemble<'_, T> {
    fn nodes(&self, position: usize) -> Vec<Node<T>> {
        self.ordered[position]
            .iter()
            .map(|&index| Node {
                item: self.items[index].clone(),
                children: self
                    .nested
                    .get(&index)
                    .map(|&child| self.nodes(child))
                    .unwrap_or_default(),
            })
            .collect()
    }
}

/// Flattens a tree into `(depth, item)` pairs in display order
pub fn flatten<T: Placement>(tree: &[Node<T>]) -> Vec<(usize, &T)> {
    tree.iter().flat_map(Node::walk).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Item;

    fn id(s: &str) -> ItemId {
        ItemId::new(s).unwrap()
    }

    fn item(name: &str, parent: Option<&str>, before: &[&str], after: &[&str]) -> Item {
        let mut item = Item::new(id(name))
            .before(before.iter().map(|s| id(s)).collect::<Vec<_>>())
            .after(after.iter().map(|s| id(s)).collect::<Vec<_>>());
        if let Some(parent) = parent {
            item = item.with_parent(id(parent));
        }
        item
    }

    fn outline(tree: &[Node<Item>]) -> Vec<String> {
        flatten(tree)
            .into_iter()
            .map(|(depth, item)| format!("{}{}", "  ".repeat(depth), item.id))
            .collect()
    }

    #[test]
    fn flat_items_are_all_roots() {
        let items = [item("a", None, &[], &[]), item("b", None, &["a"], &[])];
        let tree = order_tree(&items);

        assert_eq!(outline(&tree), ["b", "a"]);
    }

    #[test]
    fn children_ordered_within_their_section() {
        let items = [
            item("workloads", None, &[], &[]),
            item("networking", None, &["workloads"], &[]),
            item("pods", Some("workloads"), &[], &[]),
            item("deployments", Some("workloads"), &["pods"], &[]),
            item("services", Some("networking"), &[], &[]),
            item("routes", Some("networking"), &[], &["services"]),
        ];
        let tree = order_tree(&items);

        assert_eq!(
            outline(&tree),
            [
                "networking",
                "  services",
                "  routes",
                "workloads",
                "  deployments",
                "  pods",
            ]
        );
    }

    #[test]
    fn hints_do_not_cross_sections() {
        let items = [
            item("one", None, &[], &[]),
            item("two", None, &[], &[]),
            item("a", Some("one"), &[], &[]),
            item("b", Some("two"), &["a"], &[]),
            item("c", Some("two"), &[], &[]),
        ];
        let tree = order_tree(&items);

        // "a" is not a sibling of "b", so the hint dangles
        assert_eq!(outline(&tree), ["one", "  a", "two", "  b", "  c"]);
    }

    #[test]
    fn missing_parent_becomes_root() {
        let items = [
            item("a", None, &[], &[]),
            item("stray", Some("nowhere"), &["a"], &[]),
        ];
        let tree = order_tree(&items);

        assert_eq!(outline(&tree), ["stray", "a"]);
    }

    #[test]
    fn parent_cycle_keeps_every_item() {
        let items = [
            item("root", None, &[], &[]),
            item("a", Some("b"), &[], &[]),
            item("b", Some("a"), &[], &[]),
            item("c", Some("a"), &[], &[]),
        ];
        let tree = order_tree(&items);

        assert_eq!(tree.iter().map(Node::size).sum::<usize>(), 4);
        assert_eq!(outline(&tree), ["root", "a", "  b", "  c"]);
    }

    #[test]
    fn self_parent_is_root() {
        let items = [item("a", Some("a"), &[], &[])];
        let tree = order_tree(&items);

        assert_eq!(outline(&tree), ["a"]);
    }

    #[test]
    fn deep_nesting() {
        let items = [
            item("l3", Some("l2"), &[], &[]),
            item("l2", Some("l1"), &[], &[]),
            item("l1", None, &[], &[]),
        ];
        let tree = order_tree(&items);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].size(), 3);
        assert_eq!(outline(&tree), ["l1", "  l2", "    l3"]);
    }

    #[test]
    fn serializes_children_inline() {
        let items = [item("s", None, &[], &[]), item("x", Some("s"), &[], &[])];
        let tree = order_tree(&items);

        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json[0]["id"], "s");
        assert_eq!(json[0]["children"][0]["id"], "x");
        assert!(json[0]["children"][0].get("children").is_none());
    }

    fn collection_ids(items: &[Item]) -> Vec<Vec<&str>> {
        sibling_collections(items)
            .iter()
            .map(|collection| collection.iter().map(|item| item.id.as_str()).collect())
            .collect()
    }

    #[test]
    fn collections_group_by_parent() {
        let items = [
            item("s", None, &[], &[]),
            item("x", Some("s"), &[], &[]),
            item("t", None, &[], &[]),
            item("stray", Some("missing"), &[], &[]),
            item("y", Some("s"), &[], &[]),
        ];

        assert_eq!(
            collection_ids(&items),
            vec![vec!["s", "t", "stray"], vec!["x", "y"]]
        );
    }

    #[test]
    fn collections_match_tree_for_self_parent() {
        let items = [
            item("a", Some("a"), &["b"], &[]),
            item("b", None, &[], &[]),
        ];

        assert_eq!(collection_ids(&items), vec![vec!["a", "b"]]);
        assert_eq!(outline(&order_tree(&items)), ["a", "b"]);
    }

    #[test]
    fn collections_match_tree_for_parent_cycle() {
        let items = [
            item("a", Some("b"), &["b"], &[]),
            item("b", Some("a"), &["a"], &[]),
        ];

        // "a" is promoted alone and "b" becomes its only child, so neither
        // hint has a sibling to resolve against
        assert_eq!(collection_ids(&items), vec![vec!["a"], vec!["b"]]);
        assert_eq!(outline(&order_tree(&items)), ["a", "  b"]);
    }

    #[test]
    fn every_item_in_exactly_one_collection() {
        let items = [
            item("root", None, &[], &[]),
            item("a", Some("b"), &[], &[]),
            item("b", Some("a"), &[], &[]),
            item("c", Some("a"), &[], &[]),
            item("d", Some("root"), &[], &[]),
        ];

        let total: usize = sibling_collections(&items).iter().map(Vec::len).sum();
        assert_eq!(total, items.len());
        assert_eq!(
            collection_ids(&items),
            vec![vec!["root"], vec!["d"], vec!["a"], vec!["b", "c"]]
        );
    }
}
