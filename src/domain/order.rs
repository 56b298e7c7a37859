//! Constrained list ordering
//!
//! Places items relative to their siblings using `insertBefore` and
//! `insertAfter` hints:
//!
//! 1. Items without a resolvable hint seed the result in input order.
//! 2. Each pass walks the pending items in input order. The first
//!    `insertBefore` target already in the result wins; otherwise the first
//!    `insertAfter` target does (inserted right after it). Items placed in a
//!    pass are visible to the items after them in the same pass.
//! 3. Passes repeat until nothing is pending or a pass places nothing.
//! 4. Whatever is still pending (cycles, self-references) is appended in
//!    input order.
//!
//! Ordering is total: every input item appears exactly once in the output,
//! whatever the hints say.

use super::graph::ConstraintGraph;
use super::id::ItemId;
use super::item::Placement;

/// Result of ordering a collection, borrowing the caller's items
#[derive(Debug)]
pub struct Arrangement<'a, T> {
    items: Vec<&'a T>,
    unplaced: Vec<&'a T>,
    passes: usize,
}

impl<'a, T: Placement> Arrangement<'a, T> {
    /// All items in their final order
    pub fn items(&self) -> &[&'a T] {
        &self.items
    }

    /// Items whose hints never resolved and were appended at the end
    pub fn unplaced(&self) -> &[&'a T] {
        &self.unplaced
    }

    /// Number of insertion passes that ran
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Returns true if no item needed the fallback
    pub fn is_fully_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Returns the ordered IDs
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id().clone()).collect()
    }

    pub fn into_items(self) -> Vec<&'a T> {
        self.items
    }
}

/// Orders a collection, returning borrowed items plus diagnostics
pub fn arrange<T: Placement>(items: &[T]) -> Arrangement<'_, T> {
    let graph = ConstraintGraph::from_items(items);

    let (mut placed, mut pending): (Vec<&T>, Vec<&T>) =
        items.iter().partition(|item| !graph.is_positioned(item.id()));

    let mut passes = 0;
    while !pending.is_empty() {
        passes += 1;
        let waiting = pending.len();
        let mut deferred = Vec::with_capacity(waiting);

        for item in pending {
            match insertion_index(item, &placed) {
                Some(index) => placed.insert(index, item),
                None => deferred.push(item),
            }
        }

        pending = deferred;
        if pending.len() == waiting {
            break;
        }
    }

    for item in &pending {
        tracing::warn!(
            item = %item.id(),
            before = ?item.insert_before(),
            after = ?item.insert_after(),
            "Unable to position item, appending in input order"
        );
    }

    tracing::debug!(
        items = items.len(),
        passes,
        unplaced = pending.len(),
        "Ordered items"
    );

    placed.extend(pending.iter().copied());

    Arrangement {
        items: placed,
        unplaced: pending,
        passes,
    }
}

/// Orders a collection, returning owned copies in their final order
pub fn order<T: Placement + Clone>(items: &[T]) -> Vec<T> {
    arrange(items).into_items().into_iter().cloned().collect()
}

/// Resolves where an item goes in the current result
fn insertion_index<T: Placement>(item: &T, placed: &[&T]) -> Option<usize> {
    let position = |target: &ItemId| placed.iter().position(|p| p.id() == target);

    item.insert_before()
        .iter()
        .find_map(|target| position(target))
        .or_else(|| {
            item.insert_after()
                .iter()
                .find_map(|target| position(target).map(|index| index + 1))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Item;

    fn id(s: &str) -> ItemId {
        ItemId::new(s).unwrap()
    }

    fn item(name: &str, before: &[&str], after: &[&str]) -> Item {
        Item::new(id(name))
            .before(before.iter().map(|s| id(s)).collect::<Vec<_>>())
            .after(after.iter().map(|s| id(s)).collect::<Vec<_>>())
    }

    fn plain(name: &str) -> Item {
        item(name, &[], &[])
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|item| item.id.as_str()).collect()
    }

    #[test]
    fn empty_input() {
        let arrangement = arrange::<Item>(&[]);
        assert!(arrangement.items().is_empty());
        assert_eq!(arrangement.passes(), 0);
        assert!(arrangement.is_fully_placed());
    }

    #[test]
    fn unpositioned_items_keep_input_order() {
        let items = [plain("c"), plain("a"), plain("b")];
        assert_eq!(ids(&order(&items)), ["c", "a", "b"]);
    }

    #[test]
    fn insert_before_places_immediately_before_target() {
        let items = [plain("x"), plain("y"), item("z", &["x"], &[])];
        assert_eq!(ids(&order(&items)), ["z", "x", "y"]);
    }

    #[test]
    fn insert_after_places_immediately_after_target() {
        let items = [plain("x"), plain("y"), item("z", &[], &["x"])];
        assert_eq!(ids(&order(&items)), ["x", "z", "y"]);
    }

    #[test]
    fn insert_after_last_item_appends() {
        let items = [item("z", &[], &["y"]), plain("x"), plain("y")];
        assert_eq!(ids(&order(&items)), ["x", "y", "z"]);
    }

    #[test]
    fn insert_before_takes_precedence() {
        let items = [
            plain("x"),
            plain("m"),
            plain("y"),
            item("w", &["y"], &["x"]),
        ];
        assert_eq!(ids(&order(&items)), ["x", "m", "w", "y"]);
    }

    #[test]
    fn insert_after_used_when_before_unresolvable() {
        let items = [
            plain("x"),
            plain("y"),
            item("w", &["missing"], &["x"]),
        ];
        assert_eq!(ids(&order(&items)), ["x", "w", "y"]);
    }

    #[test]
    fn dangling_reference_behaves_as_unpositioned() {
        let items = [
            plain("a"),
            item("lost", &["does-not-exist"], &[]),
            plain("b"),
        ];
        let arrangement = arrange(&items);
        assert_eq!(arrangement.ids(), vec![id("a"), id("lost"), id("b")]);
        assert!(arrangement.is_fully_placed());
    }

    #[test]
    fn first_resolvable_target_wins() {
        let items = [plain("x"), plain("y"), item("q", &["missing", "y"], &[])];
        assert_eq!(ids(&order(&items)), ["x", "q", "y"]);
    }

    #[test]
    fn first_declared_target_wins_over_later_ones() {
        let items = [plain("x"), plain("y"), item("q", &["y", "x"], &[])];
        assert_eq!(ids(&order(&items)), ["x", "q", "y"]);
    }

    #[test]
    fn mutual_cycle_falls_back_to_input_order() {
        let items = [item("a", &["b"], &[]), item("b", &["a"], &[])];
        let arrangement = arrange(&items);

        assert_eq!(arrangement.ids(), vec![id("a"), id("b")]);
        assert_eq!(arrangement.unplaced().len(), 2);
        assert_eq!(arrangement.passes(), 1);
    }

    #[test]
    fn cycle_members_appended_after_placed_items() {
        let items = [
            item("a", &["b"], &[]),
            plain("x"),
            item("b", &["a"], &[]),
            item("y", &[], &["x"]),
        ];
        let arrangement = arrange(&items);

        assert_eq!(arrangement.ids(), vec![id("x"), id("y"), id("a"), id("b")]);
        let unplaced: Vec<_> = arrangement.unplaced().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(unplaced, ["a", "b"]);
    }

    #[test]
    fn self_reference_goes_to_fallback() {
        let items = [item("a", &["a"], &[]), plain("b")];
        let arrangement = arrange(&items);

        assert_eq!(arrangement.ids(), vec![id("b"), id("a")]);
        assert!(!arrangement.is_fully_placed());
    }

    #[test]
    fn chain_resolves_across_passes() {
        // a -> b -> c, declared in the worst order for a single pass
        let items = [
            item("a", &["b"], &[]),
            item("b", &["c"], &[]),
            plain("c"),
        ];
        let arrangement = arrange(&items);

        assert_eq!(arrangement.ids(), vec![id("a"), id("b"), id("c")]);
        assert_eq!(arrangement.passes(), 2);
        assert!(arrangement.is_fully_placed());
    }

    #[test]
    fn items_placed_earlier_in_a_pass_are_visible_later() {
        let items = [
            plain("x"),
            item("p", &[], &["x"]),
            item("q", &[], &["p"]),
        ];
        let arrangement = arrange(&items);

        assert_eq!(arrangement.ids(), vec![id("x"), id("p"), id("q")]);
        assert_eq!(arrangement.passes(), 1);
    }

    #[test]
    fn same_pass_inserts_shift_later_indices() {
        let items = [
            plain("x"),
            plain("y"),
            item("p", &["y"], &[]),
            item("q", &["y"], &[]),
        ];
        assert_eq!(ids(&order(&items)), ["x", "p", "q", "y"]);
    }

    #[test]
    fn cycle_broken_by_alternative_target() {
        let items = [
            item("a", &["b", "c"], &[]),
            item("b", &["a"], &[]),
            plain("c"),
        ];
        let arrangement = arrange(&items);

        assert_eq!(arrangement.ids(), vec![id("b"), id("a"), id("c")]);
        assert!(arrangement.is_fully_placed());
    }

    #[test]
    fn already_sorted_input_is_unchanged() {
        let items = [
            item("z", &["x"], &[]),
            plain("x"),
            item("w", &[], &["x"]),
            plain("y"),
        ];
        let once = order(&items);
        assert_eq!(ids(&once), ["z", "x", "w", "y"]);
        assert_eq!(order(&once), once);
    }

    #[test]
    fn caller_items_are_not_modified() {
        let items = vec![plain("x"), item("z", &["x"], &[])];
        let snapshot = items.clone();

        let _ = order(&items);
        assert_eq!(items, snapshot);
    }

    #[test]
    fn orders_borrowed_items() {
        let owned = [plain("x"), item("z", &["x"], &[])];
        let borrowed: Vec<&Item> = owned.iter().collect();

        let ordered = order(&borrowed);
        assert_eq!(ordered[0].id, "z");
        assert_eq!(ordered[1].id, "x");
    }

    #[test]
    fn duplicate_ids_do_not_panic() {
        let items = [plain("a"), item("a", &["b"], &[]), plain("b")];
        assert_eq!(order(&items).len(), 3);
    }

    #[test]
    fn performance_500_items() {
        use std::time::Instant;

        let mut items: Vec<Item> = (0..400).map(|i| plain(&format!("base-{i}"))).collect();
        // Each positioned item targets the previous positioned one, in reverse
        // declaration order, forcing many passes.
        for i in (0..100).rev() {
            let target = if i == 0 {
                "base-0".to_string()
            } else {
                format!("pos-{}", i - 1)
            };
            items.push(item(&format!("pos-{i}"), &[], &[target.as_str()]));
        }

        let start = Instant::now();
        let arrangement = arrange(&items);
        let duration = start.elapsed();

        assert_eq!(arrangement.items().len(), 500);
        assert!(arrangement.is_fully_placed());
        assert!(duration.as_millis() < 1000, "Ordering took {:?}", duration);
    }
}
