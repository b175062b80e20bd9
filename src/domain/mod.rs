//! Domain layer: entities and reconciliation logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod reconciler;
pub mod title;
pub mod whitelist;

pub use entities::*;
pub use error::DomainError;
pub use reconciler::{reconcile, reconcile_kind, reduce, resolve_base};
pub use title::{resolve_title, DEFAULT_PLACEHOLDER};
pub use whitelist::AttributeWhitelist;
