use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

/// Visibility of an element, modelled after the CSS `display` property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Display {
    /// The element renders on screen.
    Block,
    /// The element is hidden. New elements start hidden.
    #[default]
    None,
}

impl Display {
    /// Returns the CSS keyword for this value.
    pub fn as_css(&self) -> &'static str {
        match self {
            Display::Block => "block",
            Display::None => "none",
        }
    }
}

/// Which attribute of an element a [`Mutation`] touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// The text content was replaced.
    Text,
    /// The display value was toggled.
    Display,
}

/// Copy of an element's observable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSnapshot {
    /// Identifier of the element.
    pub id: String,
    /// Text content, verbatim.
    pub text: String,
    /// Current display value.
    pub display: Display,
}

impl ElementSnapshot {
    /// Whether the element renders on screen.
    pub fn is_visible(&self) -> bool {
        self.display == Display::Block
    }

    /// Renders the element as a `div` with an inline display style.
    ///
    /// The text is escaped, so markup in it is shown as literal characters
    /// the way a browser shows text assigned through `innerText`.
    pub fn to_html(&self) -> String {
        format!(
            "<div id=\"{}\" style=\"display: {}\">{}</div>",
            quick_xml::escape::escape(self.id.as_str()),
            self.display.as_css(),
            quick_xml::escape::escape(self.text.as_str()),
        )
    }
}

/// Record of a single effective change, delivered to document observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    /// The attribute that changed.
    pub kind: MutationKind,
    /// State of the element right after the change.
    pub target: ElementSnapshot,
}

#[derive(Debug, Default)]
struct ElementState {
    text: String,
    display: Display,
}

/// Shared handle to an element of a [`crate::Document`].
///
/// Clones refer to the same element. Writes that do not change the stored
/// value are not recorded as mutations.
#[derive(Debug, Clone)]
pub struct ElementHandle {
    id: Arc<str>,
    state: Arc<Mutex<ElementState>>,
    mutations: broadcast::Sender<Mutation>,
}

impl ElementHandle {
    pub(crate) fn new(id: &str, mutations: broadcast::Sender<Mutation>) -> Self {
        Self {
            id: Arc::from(id),
            state: Arc::new(Mutex::new(ElementState::default())),
            mutations,
        }
    }

    // plain fields, a poisoned lock still holds consistent state
    fn lock(&self) -> MutexGuard<'_, ElementState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the element's identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns a copy of the current text content.
    pub fn text_content(&self) -> String {
        self.lock().text.clone()
    }

    /// Replaces the text content. No escaping or trimming is applied.
    pub fn set_text_content(&self, text: impl Into<String>) {
        let text = text.into();
        let snapshot = {
            let mut state = self.lock();
            if state.text == text {
                return;
            }
            state.text = text;
            self.snapshot_of(&state)
        };
        self.publish(MutationKind::Text, snapshot);
    }

    /// Returns the current display value.
    pub fn display(&self) -> Display {
        self.lock().display
    }

    /// Sets the display value.
    pub fn set_display(&self, display: Display) {
        let snapshot = {
            let mut state = self.lock();
            if state.display == display {
                return;
            }
            state.display = display;
            self.snapshot_of(&state)
        };
        self.publish(MutationKind::Display, snapshot);
    }

    /// Whether the element renders on screen.
    pub fn is_visible(&self) -> bool {
        self.display() == Display::Block
    }

    /// Returns a consistent copy of text and display.
    pub fn snapshot(&self) -> ElementSnapshot {
        let state = self.lock();
        self.snapshot_of(&state)
    }

    /// Renders the element as HTML. See [`ElementSnapshot::to_html`].
    pub fn to_html(&self) -> String {
        self.snapshot().to_html()
    }

    /// Whether both handles refer to the same element.
    pub fn ptr_eq(&self, other: &ElementHandle) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    fn snapshot_of(&self, state: &ElementState) -> ElementSnapshot {
        ElementSnapshot {
            id: self.id.to_string(),
            text: state.text.clone(),
            display: state.display,
        }
    }

    fn publish(&self, kind: MutationKind, target: ElementSnapshot) {
        log::trace!("Element `{}` mutated: {kind:?}", self.id);
        // no observers is fine
        let _ = self.mutations.send(Mutation { kind, target });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn detached(id: &str) -> (ElementHandle, broadcast::Receiver<Mutation>) {
        let (tx, rx) = broadcast::channel(crate::MUTATION_BUFFER);
        (ElementHandle::new(id, tx), rx)
    }

    #[test]
    fn new_element_is_hidden_and_empty() {
        let (element, _rx) = detached("notification");
        assert_eq!(element.text_content(), "");
        assert_eq!(element.display(), Display::None);
        assert!(!element.is_visible());
    }

    #[test]
    fn clones_share_state() {
        let (element, _rx) = detached("notification");
        let other = element.clone();
        other.set_text_content("shared");
        other.set_display(Display::Block);

        assert_eq!(element.text_content(), "shared");
        assert!(element.is_visible());
        assert!(element.ptr_eq(&other));
    }

    #[test]
    fn effective_writes_publish_mutations() {
        let (element, mut rx) = detached("notification");
        element.set_text_content("hello");
        element.set_display(Display::Block);

        let first = rx.try_recv().unwrap();
        assert_eq!(first.kind, MutationKind::Text);
        assert_eq!(first.target.text, "hello");
        assert_eq!(first.target.display, Display::None);

        let second = rx.try_recv().unwrap();
        assert_eq!(second.kind, MutationKind::Display);
        assert!(second.target.is_visible());
    }

    #[test]
    fn no_op_writes_are_not_recorded() {
        let (element, mut rx) = detached("notification");
        element.set_display(Display::None);
        element.set_text_content("");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn html_escapes_markup_in_text() {
        let (element, _rx) = detached("notification");
        element.set_text_content("<b>Tom & Jerry</b>");
        element.set_display(Display::Block);

        assert_eq!(
            element.to_html(),
            "<div id=\"notification\" style=\"display: block\">&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;</div>"
        );
    }

    #[test]
    fn hidden_element_renders_display_none() {
        let (element, _rx) = detached("notification");
        assert_eq!(
            element.to_html(),
            "<div id=\"notification\" style=\"display: none\"></div>"
        );
    }

    proptest! {
        #[test]
        fn text_content_is_stored_verbatim(text in any::<String>()) {
            let (element, _rx) = detached("notification");
            element.set_text_content(text.clone());
            prop_assert_eq!(element.text_content(), text);
        }

        #[test]
        fn rendered_text_never_contains_raw_markup(text in "[<>&a-z ]{0,32}") {
            let (element, _rx) = detached("notification");
            element.set_text_content(text);
            let html = element.to_html();
            let body = html
                .trim_start_matches("<div id=\"notification\" style=\"display: none\">")
                .trim_end_matches("</div>");
            prop_assert!(!body.contains('<'));
            prop_assert!(!body.contains('>'));
        }
    }
}
