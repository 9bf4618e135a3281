//! Client-side behavior for the product-edit popup.
//!
//! Two behaviors are installed when the page loads:
//! - copying a product card's `data-product-*` attributes into the edit
//!   dialog's fields and opening it as a modal,
//! - dropping keyboard focus from buttons once they've been clicked.
//!
//! The logic is written against [`DomDocument`] / [`DomElement`] so it can
//! run on the real DOM (see `web`, behind the `hydrate` feature) as well as
//! on the in-memory tree used by the tests.

pub mod registry;

#[cfg(feature = "hydrate")]
pub mod web;

#[cfg(test)]
pub(crate) mod fake;

pub use registry::{BindingError, Bindings, Role};

/// Id of the page-unique edit dialog.
pub const EDIT_POPUP_ID: &str = "edit-product-popup";

/// The element surface the popup behaviors need.
pub trait DomElement: Clone + 'static {
    fn attribute(&self, name: &str) -> Option<String>;

    /// Whether this is a `<dialog>` element.
    fn is_dialog(&self) -> bool;

    /// Whether this is an `<input>` element.
    fn is_input(&self) -> bool;

    /// First descendant matching `selector`.
    fn query_selector(&self, selector: &str) -> Option<Self>;

    /// Sets the form value of an input element.
    fn set_value(&self, value: &str);

    /// Opens a dialog as a modal. A dialog that is already open, modal or
    /// not, ends up open as a modal.
    fn show_modal(&self) -> Result<(), MissingElement>;

    fn blur(&self);

    /// Attaches a click listener for the lifetime of the page.
    fn on_click(&self, handler: Box<dyn Fn()>);
}

pub trait DomDocument {
    type Element: DomElement;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Elements present in the document right now, in document order.
    fn elements_by_tag_name(&self, tag: &str) -> Vec<Self::Element>;
}

/// A product value shared between cards and popup fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Id,
    Name,
    Price,
}

impl ProductField {
    pub const ALL: [ProductField; 3] = [ProductField::Id, ProductField::Name, ProductField::Price];

    /// Data attribute carrying the value on a product card, and marking the
    /// matching input inside the popup.
    pub const fn attribute(self) -> &'static str {
        match self {
            ProductField::Id => "data-product-id",
            ProductField::Name => "data-product-name",
            ProductField::Price => "data-product-price",
        }
    }

    pub const fn selector(self) -> &'static str {
        match self {
            ProductField::Id => "[data-product-id]",
            ProductField::Name => "[data-product-name]",
            ProductField::Price => "[data-product-price]",
        }
    }
}

/// An element or attribute the popup relies on was not in the document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MissingElement {
    #[error("no usable <dialog> with id `{0}`")]
    Dialog(&'static str),
    #[error("edit popup has no <input> matching `{0}`")]
    Field(&'static str),
    #[error("product card has no `{0}` attribute")]
    Attribute(&'static str),
}

/// Values read off a product card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInfo {
    pub id: String,
    pub name: String,
    pub price: String,
}

impl ProductInfo {
    pub fn read<E: DomElement>(card: &E) -> Result<Self, MissingElement> {
        let read = |field: ProductField| {
            card.attribute(field.attribute())
                .ok_or(MissingElement::Attribute(field.attribute()))
        };

        Ok(Self {
            id: read(ProductField::Id)?,
            name: read(ProductField::Name)?,
            price: read(ProductField::Price)?,
        })
    }

    pub fn value(&self, field: ProductField) -> &str {
        match field {
            ProductField::Id => &self.id,
            ProductField::Name => &self.name,
            ProductField::Price => &self.price,
        }
    }
}

/// The edit dialog with its three fields resolved.
pub struct EditPopup<E> {
    dialog: E,
    fields: [E; 3],
}

impl<E: DomElement> EditPopup<E> {
    pub fn locate<D: DomDocument<Element = E>>(document: &D) -> Result<Self, MissingElement> {
        let dialog = document
            .element_by_id(EDIT_POPUP_ID)
            .filter(E::is_dialog)
            .ok_or(MissingElement::Dialog(EDIT_POPUP_ID))?;

        let field = |field: ProductField| {
            dialog
                .query_selector(field.selector())
                .filter(E::is_input)
                .ok_or(MissingElement::Field(field.selector()))
        };
        let fields = [
            field(ProductField::Id)?,
            field(ProductField::Name)?,
            field(ProductField::Price)?,
        ];

        Ok(Self { dialog, fields })
    }

    pub fn fill(&self, info: &ProductInfo) {
        for (field, input) in ProductField::ALL.into_iter().zip(&self.fields) {
            input.set_value(info.value(field));
        }
    }

    pub fn open(&self) -> Result<(), MissingElement> {
        self.dialog.show_modal()
    }
}

/// Copies a product card's id, name and price into the edit popup and opens it.
///
/// Every lookup happens before anything is written: on error no field has
/// been touched and the dialog stays closed.
pub fn copy_product_info_to_edit_popup<D: DomDocument>(
    document: &D,
    card: &D::Element,
) -> Result<(), MissingElement> {
    let popup = EditPopup::locate(document)?;
    let info = ProductInfo::read(card)?;

    popup.fill(&info);
    popup.open()
}

/// Page-load installer: wires button blur, then binds the popup copy to
/// [`Role::ProductCard`] and publishes it through `publish`.
///
/// Blur stays installed even if publishing fails; the publish error is
/// returned to the caller.
pub fn install<D, E>(
    document: &D,
    bindings: &mut Bindings<D::Element>,
    publish: impl FnOnce(Role) -> Result<(), E>,
) -> Result<(), E>
where
    D: DomDocument + Clone + 'static,
{
    install_button_blur_on_click(document);

    let doc = document.clone();
    if bindings.bind(Role::ProductCard, move |card| copy_product_info_to_edit_popup(&doc, card)) {
        publish(Role::ProductCard)?;
    }
    Ok(())
}

/// Makes every button currently in the document drop focus after a click.
///
/// Buttons inserted later (htmx swaps) are not covered.
pub fn install_button_blur_on_click<D: DomDocument>(document: &D) {
    for button in document.elements_by_tag_name("button") {
        let target = button.clone();
        button.on_click(Box::new(move || target.blur()));
    }
}
