//! Extension declaration types
//!
//! Extensions are declared as `{ "type": ..., "properties": {...} }` records:
//!
//! ```json
//! { "type": "nav/section", "properties": { "id": "workloads", "name": "Workloads" } }
//! { "type": "nav/link", "properties": {
//!     "id": "pods", "name": "Pods", "href": "/k8s/pods",
//!     "section": "workloads", "insertBefore": "deployments" } }
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{Hint, ItemId, Placement};

/// Which menu an extension contributes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Menu {
    Navigation,
    Actions,
}

impl Menu {
    pub fn as_str(&self) -> &'static str {
        match self {
            Menu::Navigation => "navigation",
            Menu::Actions => "actions",
        }
    }
}

/// Type of extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtensionKind {
    #[serde(rename = "nav/section")]
    NavSection,

    #[serde(rename = "nav/link")]
    NavLink,

    #[serde(rename = "nav/separator")]
    NavSeparator,

    #[serde(rename = "action/group")]
    ActionGroup,

    #[serde(rename = "action")]
    Action,
}

impl ExtensionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtensionKind::NavSection => "nav/section",
            ExtensionKind::NavLink => "nav/link",
            ExtensionKind::NavSeparator => "nav/separator",
            ExtensionKind::ActionGroup => "action/group",
            ExtensionKind::Action => "action",
        }
    }

    pub fn menu(&self) -> Menu {
        match self {
            ExtensionKind::NavSection | ExtensionKind::NavLink | ExtensionKind::NavSeparator => {
                Menu::Navigation
            }
            ExtensionKind::ActionGroup | ExtensionKind::Action => Menu::Actions,
        }
    }

    /// Returns true for kinds that hold children
    pub fn is_container(&self) -> bool {
        matches!(self, ExtensionKind::NavSection | ExtensionKind::ActionGroup)
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, ExtensionKind::NavSeparator)
    }

    /// Returns true if the kind must carry a display name
    pub fn requires_name(&self) -> bool {
        !self.is_separator()
    }
}

/// Properties shared by every extension kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionProperties {
    pub id: ItemId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Link target (nav links only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,

    /// Parent section (navigation kinds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<ItemId>,

    /// Parent group (action kinds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<ItemId>,

    #[serde(default, skip_serializing_if = "Hint::is_empty")]
    pub insert_before: Hint,

    #[serde(default, skip_serializing_if = "Hint::is_empty")]
    pub insert_after: Hint,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

/// A declared extension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    #[serde(rename = "type")]
    pub kind: ExtensionKind,

    pub properties: ExtensionProperties,
}

impl Extension {
    pub fn new(kind: ExtensionKind, id: ItemId) -> Self {
        Self {
            kind,
            properties: ExtensionProperties {
                id,
                name: None,
                href: None,
                section: None,
                group: None,
                insert_before: Hint::none(),
                insert_after: Hint::none(),
                disabled: false,
            },
        }
    }

    /// Returns the display name, falling back to the ID
    pub fn display_name(&self) -> &str {
        self.properties
            .name
            .as_deref()
            .unwrap_or(self.properties.id.as_str())
    }

    pub fn menu(&self) -> Menu {
        self.kind.menu()
    }

    pub fn is_enabled(&self) -> bool {
        !self.properties.disabled
    }
}

impl Placement for Extension {
    fn id(&self) -> &ItemId {
        &self.properties.id
    }

    fn insert_before(&self) -> &[ItemId] {
        self.properties.insert_before.ids()
    }

    fn insert_after(&self) -> &[ItemId] {
        self.properties.insert_after.ids()
    }

    fn parent(&self) -> Option<&ItemId> {
        match self.kind.menu() {
            Menu::Navigation => self.properties.section.as_ref(),
            Menu::Actions => self.properties.group.as_ref(),
        }
    }
}
