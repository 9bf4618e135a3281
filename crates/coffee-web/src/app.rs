//! Page shell and the HTML fragments served to htmx.

use leptos::prelude::*;

use crate::components::{EditProductPopup, NewProductForm, OrderTable, ProductList, Section};
use crate::db::{OrderRow, Product};

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@2.0.4/dist/htmx.min.js";
const IDIOMORPH_SRC: &str = "https://unpkg.com/idiomorph@0.7.3/dist/idiomorph-ext.min.js";

/// Loads the wasm bundle built by cargo-leptos; its start function installs
/// the popup handlers.
const WASM_BOOT: &str = "import init from '/pkg/coffee-web.js'; init();";

/// Everything htmx swaps after a product or order change.
///
/// Swaps replace this element with `morph:outerHTML`, leaving the dialogs
/// outside it untouched.
#[component]
pub fn PageContent(orders: Vec<OrderRow>, products: Vec<Product>) -> impl IntoView {
    view! {
        <main id="content" hx-target="this" hx-swap="morph:outerHTML">
            <Section id="products" title="Products">
                <ProductList products=products />
                <NewProductForm />
            </Section>
            <Section id="orders" title="Orders">
                <a href="/get_csv" class="export-link" download="orders.csv">"Download CSV"</a>
                <OrderTable orders=orders />
            </Section>
        </main>
    }
}

#[component]
fn Shell(children: Children) -> impl IntoView {
    view! {
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <title>"Coffee"</title>
                <link rel="icon" href="data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>☕</text></svg>" />
                <link rel="stylesheet" href="/pkg/coffee-web.css" />
                <script src=HTMX_SRC></script>
                <script src=IDIOMORPH_SRC></script>
                <script type="module">{WASM_BOOT}</script>
            </head>
            <body hx-ext="morph">
                <header class="page-header">
                    <h1>"Coffee \u{2615}"</h1>
                </header>
                {children()}
            </body>
        </html>
    }
}

#[component]
pub fn IndexPage(orders: Vec<OrderRow>, products: Vec<Product>) -> impl IntoView {
    view! {
        <Shell>
            <PageContent orders=orders products=products />
            <EditProductPopup />
        </Shell>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <Shell>
            <main class="not-found">
                <h2>"404 - Page not found"</h2>
                <p>
                    <a href="/">"Back to orders \u{2192}"</a>
                </p>
            </main>
        </Shell>
    }
}

fn render<V: IntoView>(view: impl FnOnce() -> V) -> String {
    Owner::new().with(|| view().to_html())
}

fn render_document<V: IntoView>(view: impl FnOnce() -> V) -> String {
    format!("<!DOCTYPE html>{}", render(view))
}

/// Full page: content plus dialogs.
pub fn render_index(orders: Vec<OrderRow>, products: Vec<Product>) -> String {
    render_document(move || view! { <IndexPage orders=orders products=products /> })
}

/// `#content` only, for htmx swaps after an order or product change.
pub fn render_content(orders: Vec<OrderRow>, products: Vec<Product>) -> String {
    render(move || view! { <PageContent orders=orders products=products /> })
}

/// `#product-list` only, for swaps after a product is added.
pub fn render_product_list(products: Vec<Product>) -> String {
    render(move || view! { <ProductList products=products /> })
}

pub fn render_not_found() -> String {
    render_document(|| view! { <NotFoundPage /> })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::Price;

    fn widget() -> Product {
        Product {
            id: 42,
            name: "Widget".to_string(),
            current_price: Price::from_cents(999).unwrap(),
            order_count: 0,
        }
    }

    #[test]
    fn cards_carry_the_values_the_popup_copies() {
        let html = render_product_list(vec![widget()]);

        assert!(html.contains(r#"id="product-list""#));
        assert!(html.contains(r#"data-product-id="42""#));
        assert!(html.contains(r#"data-product-name="Widget""#));
        assert!(html.contains(r#"data-product-price="9.99""#));
        assert!(html.contains("copyProductInfoToEditPopup(this.closest"));
    }

    #[test]
    fn only_products_without_orders_can_be_deleted() {
        let ordered = Product {
            order_count: 3,
            ..widget()
        };

        assert!(render_product_list(vec![widget()]).contains("/hx/delete_product?id=42"));
        let html = render_product_list(vec![ordered]);
        assert!(!html.contains("/hx/delete_product"));
        assert!(html.contains("3 orders"));
    }

    #[test]
    fn index_has_one_edit_popup_outside_content() {
        let html = render_index(vec![], vec![widget()]);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert_eq!(html.matches(r#"id="edit-product-popup""#).count(), 1);
        let content_end = html.find("</main>").unwrap();
        let popup_start = html.find("<dialog").unwrap();
        assert!(popup_start > content_end);
        assert!(html.contains("/pkg/coffee-web.js"));
    }

    #[test]
    fn content_fragment_has_no_dialogs() {
        let html = render_content(vec![], vec![widget()]);

        assert!(html.contains(r#"id="content""#));
        assert!(!html.contains("<dialog"));
        assert!(!html.contains("<html"));
        assert!(html.contains("No orders yet."));
    }
}
