use leptos::prelude::*;

/// Form that adds a product and swaps in the refreshed product list.
#[component]
pub fn NewProductForm() -> impl IntoView {
    view! {
        <form
            class="new-product"
            hx-post="/hx/create_product"
            hx-target="#product-list"
            hx-swap="morph:outerHTML"
        >
            <input type="text" name="name" placeholder="Name" required="" />
            <input
                type="text"
                name="price"
                placeholder="0.00"
                inputmode="decimal"
                pattern="[0-9]+([.][0-9]{1,2})?"
                required=""
            />
            <button type="submit">"Add product"</button>
        </form>
    }
}
