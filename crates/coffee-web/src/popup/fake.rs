//! In-memory element tree for exercising the popup behaviors in tests.
//!
//! Selectors are limited to `[attribute]`, which is all the popup uses.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{DomDocument, DomElement, MissingElement};

#[derive(Default)]
struct Node {
    tag: String,
    attributes: HashMap<String, String>,
    value: String,
    open: bool,
    modal: bool,
    focused: bool,
    children: Vec<FakeElement>,
    click_handlers: Vec<Rc<dyn Fn()>>,
}

#[derive(Clone)]
pub struct FakeElement(Rc<RefCell<Node>>);

impl FakeElement {
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(Node {
            tag: tag.to_string(),
            ..Node::default()
        })))
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.0.borrow_mut().attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn remove_attr(&self, name: &str) {
        self.0.borrow_mut().attributes.remove(name);
    }

    pub fn append(&self, child: &FakeElement) {
        self.0.borrow_mut().children.push(child.clone());
    }

    pub fn prepend(&self, child: &FakeElement) {
        self.0.borrow_mut().children.insert(0, child.clone());
    }

    pub fn value(&self) -> String {
        self.0.borrow().value.clone()
    }

    pub fn is_open(&self) -> bool {
        self.0.borrow().open
    }

    pub fn is_modal(&self) -> bool {
        self.0.borrow().modal
    }

    /// `dialog.show()`: open, but not modal.
    pub fn open_non_modal(&self) {
        let mut node = self.0.borrow_mut();
        node.open = true;
        node.modal = false;
    }

    pub fn has_focus(&self) -> bool {
        self.0.borrow().focused
    }

    /// Browser click: the element takes focus, then listeners run.
    pub fn click(&self) {
        self.0.borrow_mut().focused = true;
        let handlers = self.0.borrow().click_handlers.clone();
        for handler in handlers {
            handler();
        }
    }

    fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    fn matches(&self, selector: &str) -> bool {
        selector
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .is_some_and(|name| self.0.borrow().attributes.contains_key(name))
    }

    /// Descendants in document order, excluding `self`.
    fn descendants(&self) -> Vec<FakeElement> {
        let mut out = Vec::new();
        for child in self.0.borrow().children.iter() {
            out.push(child.clone());
            out.extend(child.descendants());
        }
        out
    }
}

impl DomElement for FakeElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    fn is_dialog(&self) -> bool {
        self.0.borrow().tag == "dialog"
    }

    fn is_input(&self) -> bool {
        self.0.borrow().tag == "input"
    }

    fn query_selector(&self, selector: &str) -> Option<Self> {
        self.descendants().into_iter().find(|el| el.matches(selector))
    }

    fn set_value(&self, value: &str) {
        self.0.borrow_mut().value = value.to_string();
    }

    fn show_modal(&self) -> Result<(), MissingElement> {
        let mut node = self.0.borrow_mut();
        node.open = true;
        node.modal = true;
        Ok(())
    }

    fn blur(&self) {
        self.0.borrow_mut().focused = false;
    }

    fn on_click(&self, handler: Box<dyn Fn()>) {
        self.0.borrow_mut().click_handlers.push(Rc::from(handler));
    }
}

#[derive(Clone)]
pub struct FakeDocument {
    body: FakeElement,
}

impl FakeDocument {
    pub fn new() -> Self {
        Self {
            body: FakeElement::new("body"),
        }
    }

    pub fn body(&self) -> &FakeElement {
        &self.body
    }
}

impl DomDocument for FakeDocument {
    type Element = FakeElement;

    fn element_by_id(&self, id: &str) -> Option<FakeElement> {
        self.body
            .descendants()
            .into_iter()
            .find(|el| el.attribute("id").as_deref() == Some(id))
    }

    fn elements_by_tag_name(&self, tag: &str) -> Vec<FakeElement> {
        self.body
            .descendants()
            .into_iter()
            .filter(|el| el.tag() == tag)
            .collect()
    }
}
