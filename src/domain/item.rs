//! Orderable items and their positioning hints
//!
//! Declarations may spell a hint as a single ID or as a list:
//!
//! ```json
//! { "id": "search", "insertBefore": "home" }
//! { "id": "search", "insertBefore": ["missing", "home"], "insertAfter": "admin" }
//! ```
//!
//! Both shapes deserialize into the same [`Hint`], so nothing downstream
//! branches on how the declaration was written. An explicit `null` is the
//! same as leaving the hint out.

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::id::ItemId;

/// Anything the orderer can position among its siblings
pub trait Placement {
    /// Unique ID within one ordering call
    fn id(&self) -> &ItemId;

    /// IDs this item should precede, in declared order
    fn insert_before(&self) -> &[ItemId];

    /// IDs this item should follow, in declared order
    fn insert_after(&self) -> &[ItemId];

    /// Parent collection for nested ordering
    fn parent(&self) -> Option<&ItemId> {
        None
    }
}

impl<T: Placement + ?Sized> Placement for &T {
    fn id(&self) -> &ItemId {
        (**self).id()
    }

    fn insert_before(&self) -> &[ItemId] {
        (**self).insert_before()
    }

    fn insert_after(&self) -> &[ItemId] {
        (**self).insert_after()
    }

    fn parent(&self) -> Option<&ItemId> {
        (**self).parent()
    }
}

/// A normalized positioning hint: zero or more target IDs in declared order
///
/// Deserializes from a single ID, a list of IDs, or `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(into = "HintRepr")]
pub struct Hint(Vec<ItemId>);

/// Wire shape written back for a hint
#[derive(Serialize)]
#[serde(untagged)]
enum HintRepr {
    One(ItemId),
    Many(Vec<ItemId>),
}

impl From<Hint> for HintRepr {
    fn from(hint: Hint) -> Self {
        let mut ids = hint.0;
        if ids.len() == 1 {
            HintRepr::One(ids.remove(0))
        } else {
            HintRepr::Many(ids)
        }
    }
}

impl<'de> Deserialize<'de> for Hint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct HintVisitor;

        impl<'de> Visitor<'de> for HintVisitor {
            type Value = Hint;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an item ID or a list of item IDs")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let id: ItemId = value.parse().map_err(E::custom)?;
                Ok(Hint(vec![id]))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut ids = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(id) = seq.next_element::<ItemId>()? {
                    ids.push(id);
                }
                Ok(Hint(ids))
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Hint::none())
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Hint::none())
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(self)
            }
        }

        deserializer.deserialize_any(HintVisitor)
    }
}

impl Hint {
    /// Creates an empty hint
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns the target IDs in declared order
    pub fn ids(&self) -> &[ItemId] {
        &self.0
    }

    /// Returns true if no target is named
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

}

impl FromIterator<ItemId> for Hint {
    fn from_iter<I: IntoIterator<Item = ItemId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<ItemId> for Hint {
    fn from(id: ItemId) -> Self {
        Self(vec![id])
    }
}

impl From<Vec<ItemId>> for Hint {
    fn from(ids: Vec<ItemId>) -> Self {
        Self(ids)
    }
}

/// A manifest item
///
/// Unknown fields are kept in `properties` and written back untouched, so
/// callers can attach whatever their renderer needs (`href`, `icon`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ItemId>,

    #[serde(default, skip_serializing_if = "Hint::is_empty")]
    pub insert_before: Hint,

    #[serde(default, skip_serializing_if = "Hint::is_empty")]
    pub insert_after: Hint,

    #[serde(flatten)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl Item {
    /// Creates an item with no hints
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            label: None,
            parent: None,
            insert_before: Hint::none(),
            insert_after: Hint::none(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_parent(mut self, parent: ItemId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn before(mut self, targets: impl Into<Hint>) -> Self {
        self.insert_before = targets.into();
        self
    }

    pub fn after(mut self, targets: impl Into<Hint>) -> Self {
        self.insert_after = targets.into();
        self
    }

    /// Returns the label, falling back to the ID
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(self.id.as_str())
    }
}

impl Placement for Item {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn insert_before(&self) -> &[ItemId] {
        self.insert_before.ids()
    }

    fn insert_after(&self) -> &[ItemId] {
        self.insert_after.ids()
    }

    fn parent(&self) -> Option<&ItemId> {
        self.parent.as_ref()
    }
}
