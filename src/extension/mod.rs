//! # Extensions
//!
//! Declarative menu contributions resolved into ordered trees.
//!
//! ## Extension Types
//!
//! | Type | Menu | Parent field | Holds children |
//! |------|------|--------------|----------------|
//! | `nav/section` | navigation | `section` | yes |
//! | `nav/link` | navigation | `section` | no |
//! | `nav/separator` | navigation | `section` | no |
//! | `action/group` | actions | `group` | yes |
//! | `action` | actions | `group` | no |
//!
//! Every extension may declare `insertBefore` / `insertAfter` hints naming
//! siblings under the same parent. Disabled extensions are skipped entirely.
//!
//! ## Key Types
//!
//! - [`Extension`] - A single declaration
//! - [`Registry`] - Validates declarations and resolves menus

mod declaration;
mod registry;

pub use declaration::{Extension, ExtensionKind, ExtensionProperties, Menu};
pub use registry::{ExtensionError, MenuTree, Registry};
