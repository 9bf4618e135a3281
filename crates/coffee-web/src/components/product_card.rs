use leptos::prelude::*;

use crate::db::Product;
use crate::popup::Role;

/// One product with order, edit and delete controls.
///
/// The card carries the `data-product-*` attributes the edit popup copies
/// from; the edit button hands the card to the wasm handler.
#[component]
pub fn ProductCard(product: Product) -> impl IntoView {
    let order_vals = format!(r#"{{"product": {}}}"#, product.id);
    let edit_js = format!("{}(this.closest('.product-card'))", Role::ProductCard.global_name());
    let delete_url = format!("/hx/delete_product?id={}", product.id);
    let orders_label = match product.order_count {
        1 => "1 order".to_string(),
        n => format!("{} orders", n),
    };
    let deletable = product.order_count == 0;
    let id = product.id.to_string();
    let price = product.current_price.to_string();
    let name = product.name;
    let (data_name, data_price) = (name.clone(), price.clone());

    view! {
        <li
            class="product-card"
            data-product-id=id
            data-product-name=data_name
            data-product-price=data_price
        >
            <span class="product-name">{name}</span>
            <span class="product-price">{price}</span>
            <span class="product-orders">{orders_label}</span>
            <button type="button" class="order-button" hx-post="/hx/create_order" hx-vals=order_vals>
                "Order"
            </button>
            <button type="button" class="edit-button" onclick=edit_js>
                "Edit"
            </button>
            {deletable.then(|| view! {
                <button
                    type="button"
                    class="delete-button"
                    hx-delete=delete_url
                    hx-target="closest .product-card"
                    hx-swap="outerHTML"
                    hx-confirm="Delete this product?"
                >
                    "Delete"
                </button>
            })}
        </li>
    }
}

/// All products; the target of product-list swaps.
#[component]
pub fn ProductList(products: Vec<Product>) -> impl IntoView {
    view! {
        <ul id="product-list" class="product-list">
            {products.into_iter().map(|product| view! { <ProductCard product=product /> }).collect_view()}
        </ul>
    }
}
