use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::broadcast;

use crate::element::{ElementHandle, Mutation};
use crate::{DomError, MUTATION_BUFFER};

#[derive(Debug)]
struct DocumentInner {
    elements: RwLock<BTreeMap<String, ElementHandle>>,
    mutations: broadcast::Sender<Mutation>,
}

/// Registry of addressable elements.
///
/// `Document` is a cheap handle; clones share the same registry and the same
/// mutation stream.
#[derive(Debug, Clone)]
pub struct Document {
    inner: Arc<DocumentInner>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        let (mutations, _) = broadcast::channel(MUTATION_BUFFER);
        Self {
            inner: Arc::new(DocumentInner {
                elements: RwLock::new(BTreeMap::new()),
                mutations,
            }),
        }
    }

    /// Registers a new, hidden, empty element under `id`.
    pub fn create_element(&self, id: impl Into<String>) -> Result<ElementHandle, DomError> {
        let id = id.into();
        let mut elements = self
            .inner
            .elements
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if elements.contains_key(&id) {
            return Err(DomError::DuplicateId { id });
        }

        let element = ElementHandle::new(&id, self.inner.mutations.clone());
        log::debug!("Created element `{id}`");
        elements.insert(id, element.clone());
        Ok(element)
    }

    /// Looks up the element registered under `id`.
    pub fn get_element_by_id(&self, id: &str) -> Result<ElementHandle, DomError> {
        self.inner
            .elements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| DomError::ElementNotFound { id: id.to_string() })
    }

    /// Whether an element is registered under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.inner
            .elements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    /// Unregisters the element under `id` and returns it.
    ///
    /// Handles held elsewhere stay usable but are no longer reachable through
    /// the document.
    pub fn remove_element(&self, id: &str) -> Option<ElementHandle> {
        let removed = self
            .inner
            .elements
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        if removed.is_some() {
            log::debug!("Removed element `{id}`");
        }
        removed
    }

    /// Subscribes to mutations of every element created by this document.
    pub fn subscribe(&self) -> broadcast::Receiver<Mutation> {
        self.inner.mutations.subscribe()
    }

    /// Renders all registered elements, ordered by identifier, one per line.
    pub fn render_html(&self) -> String {
        self.inner
            .elements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(ElementHandle::to_html)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
