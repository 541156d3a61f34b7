//! Page model: a small element tree standing in for the host page markup.
//!
//! Every display node the dashboard touches is reached through a fixed
//! [`Selector`]. A node may be missing from the page, so lookups return
//! `Option` and render code treats `None` as "nothing to do".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Element kinds used by the dashboard markup.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Span,
    P,
    Ol,
    Li,
    Div,
    Canvas,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: Tag,
    pub id: Option<String>,
    pub class: Option<String>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            id: None,
            class: None,
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Replaces all content with plain text, like assigning `innerText`.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.clear();
        self.text = text.into();
    }

    pub fn append_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Removes the direct child carrying `id`. Absent children are ignored.
    pub fn remove_child_by_id(&mut self, id: &str) {
        self.children.retain(|c| c.id.as_deref() != Some(id));
    }

    /// Empties the element, like assigning `innerHTML = ''`.
    pub fn clear(&mut self) {
        self.text.clear();
        self.children.clear();
    }

    pub fn replace_children(&mut self, children: Vec<Element>) {
        self.text.clear();
        self.children = children;
    }
}

/// The fixed set of display nodes the dashboard reads and writes.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    ConfirmedTotal,
    Deaths,
    Recovered,
    LastUpdatedTime,
    RankList,
    DeathsList,
    RecoveredList,
    LineChart,
}

impl Selector {
    pub const ALL: [Selector; 8] = [
        Selector::ConfirmedTotal,
        Selector::Deaths,
        Selector::Recovered,
        Selector::LastUpdatedTime,
        Selector::RankList,
        Selector::DeathsList,
        Selector::RecoveredList,
        Selector::LineChart,
    ];

    /// CSS selector as written in the host markup.
    pub fn as_str(&self) -> &'static str {
        match self {
            Selector::ConfirmedTotal => ".confirmed-total",
            Selector::Deaths => ".deaths",
            Selector::Recovered => ".recovered",
            Selector::LastUpdatedTime => ".last-updated-time",
            Selector::RankList => ".rank-list",
            Selector::DeathsList => ".deaths-list",
            Selector::RecoveredList => ".recovered-list",
            Selector::LineChart => "#lineChart",
        }
    }

    pub fn tag(&self) -> Tag {
        match self {
            Selector::ConfirmedTotal => Tag::Span,
            Selector::Deaths | Selector::Recovered | Selector::LastUpdatedTime => Tag::P,
            Selector::RankList | Selector::DeathsList | Selector::RecoveredList => Tag::Ol,
            Selector::LineChart => Tag::Canvas,
        }
    }

    /// Builds an empty element that this selector matches.
    fn element(&self) -> Element {
        let el = Element::new(self.tag());
        let selector = self.as_str();
        match selector.strip_prefix('#') {
            Some(id) => el.with_id(id),
            None => el.with_class(&selector[1..]),
        }
    }
}

/// Element accessor over the display nodes present on the page.
#[derive(Debug, Serialize, Clone, Default)]
#[serde(transparent)]
pub struct Page {
    nodes: BTreeMap<Selector, Element>,
}

impl Page {
    /// A page carrying every node the dashboard knows about.
    pub fn complete() -> Self {
        Self::with(Selector::ALL)
    }

    /// A page carrying only the given nodes.
    pub fn with(selectors: impl IntoIterator<Item = Selector>) -> Self {
        let nodes = selectors
            .into_iter()
            .map(|s| (s, s.element()))
            .collect();
        Self { nodes }
    }

    pub fn select(&self, selector: Selector) -> Option<&Element> {
        self.nodes.get(&selector)
    }

    pub fn select_mut(&mut self, selector: Selector) -> Option<&mut Element> {
        self.nodes.get_mut(&selector)
    }
}

/// One hop of a click's propagation path.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PathNode {
    pub tag: Tag,
    #[serde(default)]
    pub id: Option<String>,
}

/// A click on the rank list: the target element first, then its ancestors.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub path: Vec<PathNode>,
}

impl ClickEvent {
    /// Finds the country slug for the clicked entry.
    ///
    /// A click on the entry's count span or name paragraph resolves to the
    /// parent entry's id; a click on the entry itself resolves to its own id.
    pub fn resolve_slug(&self) -> Option<&str> {
        let target = self.path.first()?;
        match target.tag {
            Tag::Span | Tag::P => self.path.get(1)?.id.as_deref(),
            Tag::Li => target.id.as_deref(),
            _ => None,
        }
    }
}

/// Placeholder shown in a history list while its series is loading.
pub fn spinner(id: &str) -> Element {
    Element::new(Tag::Div)
        .with_id(id)
        .with_class("spinner-wrapper flex justify-center align-center")
        .with_child(
            Element::new(Tag::Div)
                .with_class("ripple-spinner")
                .with_child(Element::new(Tag::Div))
                .with_child(Element::new(Tag::Div)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(tag: Tag, id: Option<&str>) -> PathNode {
        PathNode {
            tag,
            id: id.map(str::to_string),
        }
    }

    mod page_tests {
        use super::*;

        #[test]
        fn test_complete_page_has_every_node() {
            let page = Page::complete();
            for selector in Selector::ALL {
                let el = page.select(selector).unwrap();
                assert_eq!(el.tag, selector.tag());
            }
        }

        #[test]
        fn test_partial_page_misses_nodes() {
            let page = Page::with([Selector::RankList]);
            assert!(page.select(Selector::RankList).is_some());
            assert!(page.select(Selector::LineChart).is_none());
        }

        #[test]
        fn test_selector_builds_matching_element() {
            let page = Page::complete();
            assert_eq!(
                page.select(Selector::LineChart).unwrap().id.as_deref(),
                Some("lineChart")
            );
            assert_eq!(
                page.select(Selector::ConfirmedTotal).unwrap().class.as_deref(),
                Some("confirmed-total")
            );
        }
    }

    mod element_tests {
        use super::*;

        #[test]
        fn test_set_text_replaces_children() {
            let mut el = Element::new(Tag::P).with_child(Element::new(Tag::Span));
            el.set_text("42");
            assert_eq!(el.text, "42");
            assert!(el.children.is_empty());
        }

        #[test]
        fn test_remove_child_by_id() {
            let mut list = Element::new(Tag::Ol)
                .with_child(Element::new(Tag::Li))
                .with_child(spinner("deaths-spinner"));
            list.remove_child_by_id("deaths-spinner");
            assert_eq!(list.children.len(), 1);
            list.remove_child_by_id("deaths-spinner");
            assert_eq!(list.children.len(), 1);
        }

        #[test]
        fn test_spinner_shape() {
            let s = spinner("recovered-spinner");
            assert_eq!(s.id.as_deref(), Some("recovered-spinner"));
            assert_eq!(s.children[0].children.len(), 2);
        }
    }

    mod click_tests {
        use super::*;

        #[test]
        fn test_click_on_span_uses_parent_id() {
            let event = ClickEvent {
                path: vec![
                    node(Tag::Span, None),
                    node(Tag::Li, Some("france")),
                    node(Tag::Ol, None),
                ],
            };
            assert_eq!(event.resolve_slug(), Some("france"));
        }

        #[test]
        fn test_click_on_paragraph_uses_parent_id() {
            let event = ClickEvent {
                path: vec![node(Tag::P, None), node(Tag::Li, Some("italy"))],
            };
            assert_eq!(event.resolve_slug(), Some("italy"));
        }

        #[test]
        fn test_click_on_entry_uses_own_id() {
            let event = ClickEvent {
                path: vec![node(Tag::Li, Some("spain")), node(Tag::Ol, None)],
            };
            assert_eq!(event.resolve_slug(), Some("spain"));
        }

        #[test]
        fn test_click_on_list_resolves_nothing() {
            let event = ClickEvent {
                path: vec![node(Tag::Ol, None)],
            };
            assert_eq!(event.resolve_slug(), None);
            assert_eq!(ClickEvent { path: vec![] }.resolve_slug(), None);
        }
    }
}
