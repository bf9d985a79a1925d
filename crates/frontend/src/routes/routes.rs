use crate::domain::a005_funnel::ui::FunnelBoard;
use crate::domain::a006_contract::store::use_deal_store;
use crate::domain::a006_contract::ui::{DealCreatePage, DealEditPage};
use crate::shared::components::NoticeHost;
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn AppRoutes() -> impl IntoView {
    let state = *use_deal_store().state();
    let notices = Signal::derive(move || state.with(|s| s.notices.items().to_vec()));
    let on_dismiss = Callback::new(move |id: u64| state.update(|s| s.notices.dismiss(id)));

    view! {
        <Router>
            <main class="app-main">
                <Routes fallback=|| view! { <div class="not-found">"Страница не найдена"</div> }>
                    <Route path=path!("/") view=FunnelBoard />
                    <Route path=path!("/deals/new") view=DealCreatePage />
                    <Route path=path!("/deals/:id/edit") view=DealEditPage />
                </Routes>
            </main>
            <NoticeHost notices=notices on_dismiss=on_dismiss />
        </Router>
    }
}
