//! Live head application service
//!
//! Applies a resolved state to a `HeadDocument`, skipping the work entirely when the
//! state equals the last one applied.

use tracing::{debug, info};

use crate::application::ApplicationResult;
use crate::config::InsertionOrder;
use crate::domain::{AttributeMap, ResolvedState, TagKind};
use crate::infrastructure::{HeadDocument, HeadElement};

/// Order in which tag kinds are rewritten. With first-child insertion the last kind
/// written ends up at the top of the head, so `base` precedes everything it affects.
const UPDATE_ORDER: [TagKind; 3] = [TagKind::Link, TagKind::Meta, TagKind::Base];

/// Last state successfully applied to a document.
///
/// Owned by the caller and handed to every `apply` call for the same document. Share it
/// across threads behind a `Mutex`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedState {
    last: Option<ResolvedState>,
}

impl AppliedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&ResolvedState> {
        self.last.as_ref()
    }

    /// True when `state` deep-equals the last applied state.
    pub fn matches(&self, state: &ResolvedState) -> bool {
        self.last.as_ref() == Some(state)
    }

    fn store(&mut self, state: ResolvedState) -> &ResolvedState {
        self.last.insert(state)
    }
}

/// Result of an `apply` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The document was rewritten and the notifier invoked.
    Applied,
    /// The state equals the last applied one; nothing happened.
    Unchanged,
}

/// Hook invoked with the full state after every applied change.
pub trait ChangeNotifier {
    fn on_change(&self, state: &ResolvedState);
}

impl<F> ChangeNotifier for F
where
    F: Fn(&ResolvedState),
{
    fn on_change(&self, state: &ResolvedState) {
        self(state)
    }
}

/// Notifier that reports applied changes through `tracing`.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl ChangeNotifier for LogNotifier {
    fn on_change(&self, state: &ResolvedState) {
        info!(
            title = %state.title,
            base = state.base_tag.len(),
            meta = state.meta_tags.len(),
            link = state.link_tags.len(),
            "head updated"
        );
    }
}

/// Writes resolved head state into a live document.
pub struct HeadService {
    marker: String,
    order: InsertionOrder,
    notifier: Option<Box<dyn ChangeNotifier>>,
}

impl HeadService {
    /// Create a service stamping `marker` on every element it inserts.
    pub fn new(marker: impl Into<String>, order: InsertionOrder) -> Self {
        Self {
            marker: marker.into(),
            order,
            notifier: None,
        }
    }

    /// Register the change notification hook.
    pub fn with_notifier(mut self, notifier: impl ChangeNotifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn order(&self) -> InsertionOrder {
        self.order
    }

    /// Apply `resolved` to `document`.
    ///
    /// A non-empty title replaces the document title; an empty one leaves it alone. Every
    /// previously injected element of each kind is removed before the new ones go in.
    /// A document error aborts the update and leaves `state` untouched, so calling again
    /// with the same input retries the whole update.
    pub fn apply(
        &self,
        state: &mut AppliedState,
        document: &mut dyn HeadDocument,
        resolved: ResolvedState,
    ) -> ApplicationResult<ApplyOutcome> {
        if state.matches(&resolved) {
            debug!("apply: state unchanged, skipping");
            return Ok(ApplyOutcome::Unchanged);
        }

        if !resolved.title.is_empty() {
            document.set_title(&resolved.title)?;
        }

        for kind in UPDATE_ORDER {
            self.update_tags(document, kind, resolved.tags(kind))?;
        }

        let applied = state.store(resolved);
        if let Some(notifier) = &self.notifier {
            notifier.on_change(applied);
        }
        Ok(ApplyOutcome::Applied)
    }

    fn update_tags(
        &self,
        document: &mut dyn HeadDocument,
        kind: TagKind,
        tags: &[AttributeMap],
    ) -> ApplicationResult<()> {
        let removed = document.remove_marked(kind, &self.marker)?;
        debug!("update_tags: kind={kind}, removed={removed}, inserting={}", tags.len());

        // Each insert goes before the current first child, so walking the list backwards
        // leaves the document in list order.
        let ordered: Box<dyn Iterator<Item = &AttributeMap>> = match self.order {
            InsertionOrder::Reversed => Box::new(tags.iter()),
            InsertionOrder::Preserved => Box::new(tags.iter().rev()),
        };
        for tag in ordered {
            document.insert_first(self.element(kind, tag))?;
        }
        Ok(())
    }

    fn element(&self, kind: TagKind, tag: &AttributeMap) -> HeadElement {
        let mut attributes = tag.clone();
        attributes.insert(self.marker.as_str(), "true");
        HeadElement::new(kind, attributes)
    }
}
