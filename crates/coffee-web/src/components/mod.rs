mod edit_popup;
mod new_product_form;
mod order_table;
mod product_card;
mod section;

pub use edit_popup::EditProductPopup;
pub use new_product_form::NewProductForm;
pub use order_table::OrderTable;
pub use product_card::{ProductCard, ProductList};
pub use section::Section;
