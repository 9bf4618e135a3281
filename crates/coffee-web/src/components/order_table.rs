use leptos::prelude::*;

use crate::db::OrderRow;

/// Order history, newest first, each row deletable.
#[component]
pub fn OrderTable(orders: Vec<OrderRow>) -> impl IntoView {
    if orders.is_empty() {
        return view! { <p class="empty">"No orders yet."</p> }.into_any();
    }

    view! {
        <table class="orders">
            <thead>
                <tr>
                    <th>"Time"</th>
                    <th>"Product"</th>
                    <th>"Price"</th>
                    <th></th>
                </tr>
            </thead>
            <tbody>
                {orders
                    .into_iter()
                    .map(|order| {
                        let delete_url = format!("/hx/delete_order?id={}", order.id);
                        view! {
                            <tr class="order-row">
                                <td>{order.created.format("%Y-%m-%d %H:%M").to_string()}</td>
                                <td>{order.product_name}</td>
                                <td>{order.price.to_string()}</td>
                                <td>
                                    <button type="button" hx-delete=delete_url hx-confirm="Delete this order?">
                                        "Delete"
                                    </button>
                                </td>
                            </tr>
                        }
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
    .into_any()
}
