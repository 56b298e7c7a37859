//! Manifest diagnostics

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use super::output::Output;
use crate::domain::{
    arrange, sibling_collections, ConstraintGraph, DanglingRef, Item, ItemId, Placement,
};
use crate::extension::{Extension, Menu, Registry};
use crate::storage::{CheckConfig, Config, Manifest};

/// Problems found in one set of items
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct Diagnostics {
    pub items: usize,
    pub dangling: Vec<DanglingRef>,
    pub cycles: Vec<Vec<ItemId>>,
    pub duplicates: Vec<ItemId>,
    pub unplaced: Vec<ItemId>,
}

impl Diagnostics {
    /// Checks items as the single collection `order` arranges
    pub fn collect<T: Placement>(items: &[T]) -> Self {
        Self::from_collections(items, vec![items.iter().collect()])
    }

    /// Checks items one sibling collection at a time, as `order_tree` arranges them
    pub fn collect_nested<T: Placement>(items: &[T]) -> Self {
        Self::from_collections(items, sibling_collections(items))
    }

    fn from_collections<T: Placement>(items: &[T], collections: Vec<Vec<&T>>) -> Self {
        let mut diagnostics = Self {
            items: items.len(),
            duplicates: ConstraintGraph::from_items(items).duplicates().to_vec(),
            ..Self::default()
        };

        for siblings in collections {
            let graph = ConstraintGraph::from_items(&siblings);
            diagnostics.dangling.extend_from_slice(graph.dangling());
            diagnostics.cycles.extend(graph.cycles());

            let arrangement = arrange(&siblings);
            diagnostics
                .unplaced
                .extend(arrangement.unplaced().iter().map(|item| item.id().clone()));
        }

        diagnostics
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.items += other.items;
        self.dangling.extend(other.dangling);
        self.cycles.extend(other.cycles);
        self.duplicates.extend(other.duplicates);
        self.unplaced.extend(other.unplaced);
    }

    /// Returns true if nothing at all was found
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty()
            && self.cycles.is_empty()
            && self.duplicates.is_empty()
            && self.unplaced.is_empty()
    }

    /// Lists the findings that the configuration treats as failures
    pub fn failures(&self, config: &CheckConfig) -> Vec<String> {
        let mut failures = Vec::new();
        if config.fail_on_unplaced && !self.unplaced.is_empty() {
            failures.push(format!("{} unplaced item(s)", self.unplaced.len()));
        }
        if config.fail_on_dangling && !self.dangling.is_empty() {
            failures.push(format!("{} dangling reference(s)", self.dangling.len()));
        }
        if config.fail_on_duplicates && !self.duplicates.is_empty() {
            failures.push(format!("{} duplicate ID(s)", self.duplicates.len()));
        }
        failures
    }
}

pub fn run(
    output: &Output,
    config: &Config,
    file: &Path,
    tree: bool,
    extensions: bool,
) -> Result<()> {
    let manifest = Manifest::new(file)?;

    let diagnostics = if extensions {
        let declared: Vec<Extension> = manifest.read()?;
        let registry = Registry::new(declared)?;

        let mut diagnostics = Diagnostics::default();
        for menu in [Menu::Navigation, Menu::Actions] {
            let enabled = registry.enabled(menu);
            output.verbose_ctx(
                "check",
                &format!("Checking {} {} extensions", enabled.len(), menu.as_str()),
            );
            diagnostics.merge(Diagnostics::collect_nested(&enabled));
        }
        diagnostics
    } else {
        let items: Vec<Item> = manifest.read()?;
        output.verbose_ctx("check", &format!("Checking {} items", items.len()));
        if tree {
            Diagnostics::collect_nested(&items)
        } else {
            Diagnostics::collect(&items)
        }
    };

    let failures = diagnostics.failures(&config.project.check);

    if output.is_json() {
        output.data(&serde_json::json!({
            "ok": failures.is_empty(),
            "items": diagnostics.items,
            "dangling": diagnostics.dangling,
            "cycles": diagnostics.cycles,
            "duplicates": diagnostics.duplicates,
            "unplaced": diagnostics.unplaced,
        }));
    } else {
        print_report(&diagnostics);
    }

    if !failures.is_empty() {
        anyhow::bail!("Check failed: {}", failures.join(", "));
    }

    Ok(())
}

fn print_report(diagnostics: &Diagnostics) {
    println!("Checked {} item(s)", diagnostics.items);

    if diagnostics.is_clean() {
        println!("No problems found.");
        return;
    }

    if !diagnostics.dangling.is_empty() {
        println!();
        println!("Dangling references:");
        for dangling in &diagnostics.dangling {
            println!(
                "  {} {} {} (not found)",
                dangling.item,
                dangling.relation.as_str(),
                dangling.target
            );
        }
    }

    if !diagnostics.cycles.is_empty() {
        println!();
        println!("Cycles:");
        for cycle in &diagnostics.cycles {
            let names: Vec<&str> = cycle.iter().map(ItemId::as_str).collect();
            println!("  {}", names.join(" <-> "));
        }
    }

    if !diagnostics.duplicates.is_empty() {
        println!();
        println!("Duplicate IDs:");
        for id in &diagnostics.duplicates {
            println!("  {}", id);
        }
    }

    if !diagnostics.unplaced.is_empty() {
        println!();
        println!("Unplaced (appended in input order):");
        for id in &diagnostics.unplaced {
            println!("  {}", id);
        }
    }
}
