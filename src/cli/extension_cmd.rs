//! Menu resolution from extension declarations

use std::path::Path;

use anyhow::Result;

use super::output::Output;
use crate::domain::flatten;
use crate::extension::{Extension, ExtensionKind, Menu, Registry};
use crate::storage::Manifest;

pub fn run(output: &Output, file: &Path, menu: Menu) -> Result<()> {
    let declared: Vec<Extension> = Manifest::new(file)?.read()?;
    output.verbose_ctx(
        menu.as_str(),
        &format!("Loaded {} extensions from {}", declared.len(), file.display()),
    );

    let registry = Registry::new(declared)?;
    let tree = match menu {
        Menu::Navigation => registry.navigation(),
        Menu::Actions => registry.action_menu(),
    };

    if output.is_json() {
        output.data(&tree);
        return Ok(());
    }

    if tree.is_empty() {
        println!("No {} entries.", menu.as_str());
        return Ok(());
    }

    for (depth, ext) in flatten(&tree) {
        println!("{}{}", "  ".repeat(depth), describe(ext));
    }

    Ok(())
}

fn describe(ext: &Extension) -> String {
    match ext.kind {
        ExtensionKind::NavSeparator => "---".to_string(),
        ExtensionKind::NavSection | ExtensionKind::ActionGroup => {
            format!("{}/ [{}]", ext.display_name(), ext.properties.id)
        }
        ExtensionKind::NavLink => format!(
            "{} [{}] -> {}",
            ext.display_name(),
            ext.properties.id,
            ext.properties.href.as_deref().unwrap_or("")
        ),
        ExtensionKind::Action => format!("{} [{}]", ext.display_name(), ext.properties.id),
    }
}
