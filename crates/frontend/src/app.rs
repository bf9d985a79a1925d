use crate::domain::a006_contract::store::provide_deal_store;
use crate::routes::routes::AppRoutes;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    // Deal store shared by the board and the deal form
    provide_deal_store();

    view! {
        <AppRoutes />
    }
}
