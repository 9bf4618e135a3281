use leptos::prelude::*;

use crate::popup::EDIT_POPUP_ID;

/// Modal for editing a product.
///
/// Rendered once per page, outside `#content`, so htmx swaps never replace
/// it. Its fields start empty and are filled client-side from the clicked
/// product card via the `data-product-*` markers.
#[component]
pub fn EditProductPopup() -> impl IntoView {
    view! {
        <dialog id=EDIT_POPUP_ID class="popup">
            <form hx-post="/hx/update_product" hx-target="#content" hx-swap="morph:outerHTML">
                <h3>"Edit product"</h3>
                <input type="hidden" name="product" data-product-id="" />
                <label>
                    "Name"
                    <input type="text" name="name" required="" data-product-name="" />
                </label>
                <label>
                    "Price"
                    <input
                        type="text"
                        name="price"
                        inputmode="decimal"
                        pattern="[0-9]+([.][0-9]{1,2})?"
                        required=""
                        data-product-price=""
                    />
                </label>
                <div class="popup-actions">
                    <button type="button" onclick="this.closest('dialog').close()">
                        "Cancel"
                    </button>
                    <button type="submit" onclick="this.form.checkValidity() && this.closest('dialog').close()">
                        "Save"
                    </button>
                </div>
            </form>
        </dialog>
    }
}
