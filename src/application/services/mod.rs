//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, HeadDocument)
//! but are themselves concrete structs, not traits.

mod declarations;
mod head;
mod render;

pub use declarations::DeclarationService;
pub use head::{AppliedState, ApplyOutcome, ChangeNotifier, HeadService, LogNotifier};
pub use render::{
    alias_for, render_markup, render_static, render_structured, NodeAttribute, StaticHead,
    StaticRenderer, StructuredTags, TagNode, ATTRIBUTE_ALIASES,
};
