//! Extension registry
//!
//! Collects extension declarations, validates them, and resolves them into
//! ordered navigation and action-menu trees.

use std::collections::HashMap;

use thiserror::Error;

use super::declaration::{Extension, ExtensionKind, Menu};
use crate::domain::{order_tree, ItemId, Node, Placement};

#[derive(Debug, Error, PartialEq)]
pub enum ExtensionError {
    #[error("Extension {0} ({1}) must have a name")]
    MissingName(ItemId, &'static str),

    #[error("Navigation link {0} must have an href")]
    MissingHref(ItemId),

    #[error("Extension {item} cannot be placed inside {parent}: {kind} does not hold children")]
    InvalidParent {
        item: ItemId,
        parent: ItemId,
        kind: &'static str,
    },
}

/// A resolved menu tree, borrowing from the registry
pub type MenuTree<'a> = Vec<Node<&'a Extension>>;

/// Validated set of extensions
#[derive(Debug, Default)]
pub struct Registry {
    extensions: Vec<Extension>,
}

impl Registry {
    /// Creates a registry, validating every enabled extension
    pub fn new(extensions: Vec<Extension>) -> Result<Self, ExtensionError> {
        let registry = Self { extensions };
        registry.validate()?;
        Ok(registry)
    }

    fn validate(&self) -> Result<(), ExtensionError> {
        for menu in [Menu::Navigation, Menu::Actions] {
            let enabled = self.enabled(menu);
            let kinds: HashMap<&ItemId, ExtensionKind> =
                enabled.iter().map(|ext| (ext.id(), ext.kind)).collect();

            for ext in &enabled {
                if ext.kind.requires_name() && ext.properties.name.is_none() {
                    return Err(ExtensionError::MissingName(
                        ext.id().clone(),
                        ext.kind.as_str(),
                    ));
                }

                if ext.kind == ExtensionKind::NavLink && ext.properties.href.is_none() {
                    return Err(ExtensionError::MissingHref(ext.id().clone()));
                }

                if let Some(parent) = ext.parent() {
                    if let Some(kind) = kinds.get(parent) {
                        if !kind.is_container() && parent != ext.id() {
                            return Err(ExtensionError::InvalidParent {
                                item: ext.id().clone(),
                                parent: parent.clone(),
                                kind: kind.as_str(),
                            });
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns the enabled extensions contributing to a menu, in declaration order
    pub fn enabled(&self, menu: Menu) -> Vec<&Extension> {
        self.extensions
            .iter()
            .filter(|ext| ext.is_enabled() && ext.menu() == menu)
            .collect()
    }

    /// Ordered tree for a menu
    ///
    /// Empty sections and groups are dropped, as are separators at the edges
    /// of a collection or directly after another separator.
    pub fn resolve(&self, menu: Menu) -> MenuTree<'_> {
        let enabled = self.enabled(menu);
        tracing::debug!(menu = menu.as_str(), extensions = enabled.len(), "Resolving menu");
        tidy(order_tree(&enabled))
    }

    /// Ordered navigation tree
    pub fn navigation(&self) -> MenuTree<'_> {
        self.resolve(Menu::Navigation)
    }

    /// Ordered action menu
    pub fn action_menu(&self) -> MenuTree<'_> {
        self.resolve(Menu::Actions)
    }
}

/// Removes empty containers and redundant separators, bottom-up
fn tidy(nodes: MenuTree<'_>) -> MenuTree<'_> {
    let mut kept: MenuTree<'_> = Vec::with_capacity(nodes.len());

    for mut node in nodes {
        node.children = tidy(node.children);

        if node.item.kind.is_container() && node.children.is_empty() {
            tracing::debug!(id = %node.item.id(), "Dropping empty container");
            continue;
        }

        if node.item.kind.is_separator() {
            let after_separator = kept
                .last()
                .map(|prev| prev.item.kind.is_separator())
                .unwrap_or(true);
            if after_separator {
                continue;
            }
        }

        kept.push(node);
    }

    while kept
        .last()
        .map(|node| node.item.kind.is_separator())
        .unwrap_or(false)
    {
        kept.pop();
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ItemId {
        ItemId::new(s).unwrap()
    }

    fn section(name: &str) -> Extension {
        let mut ext = Extension::new(ExtensionKind::NavSection, id(name));
        ext.properties.name = Some(name.to_uppercase());
        ext
    }

    fn link(name: &str, section: &str) -> Extension {
        let mut ext = Extension::new(ExtensionKind::NavLink, id(name));
        ext.properties.name = Some(name.to_string());
        ext.properties.href = Some(format!("/{name}"));
        ext.properties.section = Some(id(section));
        ext
    }

    fn separator(name: &str, section: &str) -> Extension {
        let mut ext = Extension::new(ExtensionKind::NavSeparator, id(name));
        ext.properties.section = Some(id(section));
        ext
    }

    fn action(name: &str, group: Option<&str>) -> Extension {
        let mut ext = Extension::new(ExtensionKind::Action, id(name));
        ext.properties.name = Some(name.to_string());
        ext.properties.group = group.map(id);
        ext
    }

    fn group(name: &str) -> Extension {
        let mut ext = Extension::new(ExtensionKind::ActionGroup, id(name));
        ext.properties.name = Some(name.to_string());
        ext
    }

    fn outline(tree: &MenuTree<'_>) -> Vec<String> {
        crate::domain::flatten(tree)
            .into_iter()
            .map(|(depth, ext)| format!("{}{}", "  ".repeat(depth), ext.id()))
            .collect()
    }

    #[test]
    fn navigation_ordered_per_section() {
        let mut deployments = link("deployments", "workloads");
        deployments.properties.insert_before = id("pods").into();
        let mut networking = section("networking");
        networking.properties.insert_before = id("workloads").into();

        let registry = Registry::new(vec![
            section("workloads"),
            link("pods", "workloads"),
            deployments,
            networking,
            link("services", "networking"),
        ])
        .unwrap();

        assert_eq!(
            outline(&registry.navigation()),
            ["networking", "  services", "workloads", "  deployments", "  pods"]
        );
    }

    #[test]
    fn menus_are_separate() {
        let registry = Registry::new(vec![
            section("home"),
            link("overview", "home"),
            action("edit", None),
        ])
        .unwrap();

        assert_eq!(outline(&registry.navigation()), ["home", "  overview"]);
        assert_eq!(outline(&registry.action_menu()), ["edit"]);
    }

    #[test]
    fn action_groups_become_submenus() {
        let mut delete = action("delete", Some("danger"));
        delete.properties.insert_after = id("evict").into();

        let registry = Registry::new(vec![
            action("edit", None),
            group("danger"),
            delete,
            action("evict", Some("danger")),
        ])
        .unwrap();

        assert_eq!(
            outline(&registry.action_menu()),
            ["edit", "danger", "  evict", "  delete"]
        );
    }

    #[test]
    fn disabled_extensions_skipped() {
        let mut hidden = link("hidden", "home");
        hidden.properties.disabled = true;

        let registry = Registry::new(vec![section("home"), link("shown", "home"), hidden]).unwrap();

        assert_eq!(outline(&registry.navigation()), ["home", "  shown"]);
        assert_eq!(registry.enabled(Menu::Navigation).len(), 2);
    }

    #[test]
    fn empty_sections_dropped() {
        let registry = Registry::new(vec![section("empty"), section("full"), link("a", "full")])
            .unwrap();

        assert_eq!(outline(&registry.navigation()), ["full", "  a"]);
    }

    #[test]
    fn redundant_separators_dropped() {
        let mut sep_mid = separator("sep-mid", "home");
        sep_mid.properties.insert_after = id("a").into();
        let mut sep_double = separator("sep-double", "home");
        sep_double.properties.insert_after = id("sep-mid").into();

        let registry = Registry::new(vec![
            section("home"),
            separator("sep-lead", "home"),
            link("a", "home"),
            sep_mid,
            sep_double,
            link("b", "home"),
            separator("sep-trail", "home"),
        ])
        .unwrap();

        // sep-lead and sep-trail are unpositioned: they stay at the edges and are dropped
        assert_eq!(
            outline(&registry.navigation()),
            ["home", "  a", "  sep-mid", "  b"]
        );
    }

    #[test]
    fn link_without_href_rejected() {
        let mut bad = link("bad", "home");
        bad.properties.href = None;

        let result = Registry::new(vec![section("home"), bad]);
        assert_eq!(result.unwrap_err(), ExtensionError::MissingHref(id("bad")));
    }

    #[test]
    fn missing_name_rejected() {
        let mut bad = action("nameless", None);
        bad.properties.name = None;

        let result = Registry::new(vec![bad]);
        assert!(matches!(result, Err(ExtensionError::MissingName(_, "action"))));
    }

    #[test]
    fn separators_need_no_name() {
        let registry = Registry::new(vec![section("home"), separator("sep", "home")]);
        assert!(registry.is_ok());
    }

    #[test]
    fn parent_must_be_container() {
        let result = Registry::new(vec![
            section("home"),
            link("a", "home"),
            link("b", "a"),
        ]);

        assert!(matches!(result, Err(ExtensionError::InvalidParent { .. })));
    }

    #[test]
    fn cyclic_actions_keep_declaration_order() {
        let mut a = action("a", None);
        a.properties.insert_before = id("b").into();
        let mut b = action("b", None);
        b.properties.insert_before = id("a").into();

        let registry = Registry::new(vec![a, b, section("home"), link("x", "home")]).unwrap();

        assert_eq!(outline(&registry.action_menu()), ["a", "b"]);
        assert_eq!(outline(&registry.navigation()), ["home", "  x"]);
    }
}
