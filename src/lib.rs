//! rshead: document head management
//!
//! Nested declarations of title, base, meta and link tags are reconciled into one
//! deduplicated head state (innermost declaration wins). The state is applied to a live
//! document through `HeadDocument`, or rendered as markup or structured nodes.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::services::{
    AppliedState, ApplyOutcome, ChangeNotifier, DeclarationService, HeadService, StaticRenderer,
};
pub use config::Settings;
pub use domain::{reduce, AttributeMap, Declaration, ResolvedState, TagKind};
pub use infrastructure::{HeadDocument, InMemoryDocument};
