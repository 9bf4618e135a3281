//! web-sys implementation of the popup DOM surface, plus the installer that
//! runs when the wasm module starts.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlDialogElement, HtmlElement, HtmlInputElement};

use super::{Bindings, DomDocument, DomElement, EDIT_POPUP_ID, MissingElement, Role};

#[derive(Clone)]
pub struct WebElement(Element);

impl DomElement for WebElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn is_dialog(&self) -> bool {
        self.0.is_instance_of::<HtmlDialogElement>()
    }

    fn is_input(&self) -> bool {
        self.0.is_instance_of::<HtmlInputElement>()
    }

    fn query_selector(&self, selector: &str) -> Option<Self> {
        self.0.query_selector(selector).ok().flatten().map(WebElement)
    }

    fn set_value(&self, value: &str) {
        if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        }
    }

    fn show_modal(&self) -> Result<(), MissingElement> {
        let dialog = self
            .0
            .dyn_ref::<HtmlDialogElement>()
            .ok_or(MissingElement::Dialog(EDIT_POPUP_ID))?;
        // showModal() throws on a dialog that is already open, modal or not
        if dialog.open() {
            dialog.close();
        }
        dialog
            .show_modal()
            .map_err(|_| MissingElement::Dialog(EDIT_POPUP_ID))
    }

    fn blur(&self) {
        if let Some(el) = self.0.dyn_ref::<HtmlElement>() {
            let _ = el.blur();
        }
    }

    fn on_click(&self, handler: Box<dyn Fn()>) {
        let callback = Closure::<dyn Fn()>::wrap(handler);
        let _ = self
            .0
            .add_event_listener_with_callback("click", callback.as_ref().unchecked_ref());
        // Listeners live as long as the page
        callback.forget();
    }
}

#[derive(Clone)]
pub struct WebDocument(Document);

impl DomDocument for WebDocument {
    type Element = WebElement;

    fn element_by_id(&self, id: &str) -> Option<WebElement> {
        self.0.get_element_by_id(id).map(WebElement)
    }

    fn elements_by_tag_name(&self, tag: &str) -> Vec<WebElement> {
        let collection = self.0.get_elements_by_tag_name(tag);
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .map(WebElement)
            .collect()
    }
}

thread_local! {
    static BINDINGS: RefCell<Bindings<WebElement>> = RefCell::new(Bindings::new());
}

/// Wires button blur, binds the popup handlers and publishes their globals.
/// Runs once when the wasm module starts.
///
/// Fails if there is no window or document, or if a global could not be
/// set; the page then has no working `copyProductInfoToEditPopup`.
pub fn install() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsError::new("no global window"))?;
    let document = window
        .document()
        .map(WebDocument)
        .ok_or_else(|| JsError::new("window has no document"))?;

    BINDINGS.with(|bindings| {
        super::install(&document, &mut *bindings.borrow_mut(), |role| publish(&window, role))
    })
}

/// Exposes `role`'s handler as `window[role.global_name()]`.
///
/// Errors reach the inline handler as a thrown `Error`.
fn publish(window: &web_sys::Window, role: Role) -> Result<(), JsValue> {
    let entry = Closure::<dyn Fn(JsValue) -> Result<(), JsValue>>::new(move |target: JsValue| {
        let element = target
            .dyn_into::<Element>()
            .map_err(|_| JsValue::from(JsError::new(&format!("{} expects an element", role.global_name()))))?;

        BINDINGS
            .with(|bindings| bindings.borrow().dispatch(role, &WebElement(element)))
            .map_err(|e| JsValue::from(JsError::new(&e.to_string())))
    });

    let set = js_sys::Reflect::set(window, &JsValue::from_str(role.global_name()), entry.as_ref())?;
    if !set {
        return Err(JsError::new(&format!("could not define window.{}", role.global_name())).into());
    }
    entry.forget();
    Ok(())
}
