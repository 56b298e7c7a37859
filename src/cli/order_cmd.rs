//! Ordering commands

use std::path::Path;

use anyhow::Result;

use super::output::Output;
use crate::domain::{arrange, flatten, order_tree, Item};
use crate::storage::{Config, Manifest};

fn load_items(output: &Output, context: &str, file: &Path) -> Result<Vec<Item>> {
    let manifest = Manifest::new(file)?;
    let items: Vec<Item> = manifest.read()?;
    output.verbose_ctx(
        context,
        &format!(
            "Loaded {} items from {} ({:?})",
            items.len(),
            file.display(),
            manifest.format()
        ),
    );
    Ok(items)
}

/// Orders a flat manifest
pub fn order(
    output: &Output,
    config: &Config,
    file: &Path,
    ids_only: bool,
    out_path: Option<&Path>,
) -> Result<()> {
    let items = load_items(output, "order", file)?;
    let arrangement = arrange(&items);
    output.verbose_ctx(
        "order",
        &format!(
            "Ordered {} items in {} passes",
            arrangement.items().len(),
            arrangement.passes()
        ),
    );

    if config.project.order.warn_unplaced {
        for item in arrangement.unplaced() {
            output.warning(&format!(
                "Unable to position {}, appended in input order",
                item.id
            ));
        }
    }

    if let Some(path) = out_path {
        let ordered: Vec<&Item> = arrangement.items().to_vec();
        Manifest::new(path)?.write(&ordered)?;
        output.success(&format!(
            "Wrote {} ordered items to {}",
            ordered.len(),
            path.display()
        ));
        return Ok(());
    }

    let unplaced: Vec<_> = arrangement.unplaced().iter().map(|item| &item.id).collect();

    if output.is_json() {
        if ids_only {
            output.data(&arrangement.ids());
        } else {
            output.data(&serde_json::json!({
                "items": arrangement.items(),
                "unplaced": unplaced,
                "passes": arrangement.passes(),
            }));
        }
    } else if ids_only {
        for id in arrangement.ids() {
            println!("{}", id);
        }
    } else if items.is_empty() {
        println!("No items to order.");
    } else {
        println!("{:<4} {:<30} LABEL", "#", "ID");
        println!("{}", "-".repeat(60));
        for (index, item) in arrangement.items().iter().enumerate() {
            let marker = if unplaced.contains(&&item.id) { " (unplaced)" } else { "" };
            println!(
                "{:<4} {:<30} {}{}",
                index + 1,
                item.id,
                item.label.as_deref().unwrap_or(""),
                marker
            );
        }
    }

    Ok(())
}

/// Orders a nested manifest
pub fn tree(output: &Output, file: &Path) -> Result<()> {
    let items = load_items(output, "tree", file)?;
    let tree = order_tree(&items);
    output.verbose_ctx("tree", &format!("Built {} root entries", tree.len()));

    if output.is_json() {
        output.data(&tree);
    } else if tree.is_empty() {
        println!("No items to order.");
    } else {
        for (depth, item) in flatten(&tree) {
            if item.label.is_some() {
                println!("{}{} [{}]", "  ".repeat(depth), item.display_name(), item.id);
            } else {
                println!("{}{}", "  ".repeat(depth), item.id);
            }
        }
    }

    Ok(())
}
