use crate::shared::state::Notice;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;

/// How long a toast stays on screen, ms
pub const NOTICE_TIMEOUT_MS: u32 = 4_000;

/// Toast stack in the bottom right corner
#[component]
pub fn NoticeHost(notices: Signal<Vec<Notice>>, on_dismiss: Callback<u64>) -> impl IntoView {
    view! {
        <div class="toast-host">
            <For
                each=move || notices.get()
                key=|notice: &Notice| notice.id
                children=move |notice: Notice| {
                    view! { <Toast notice=notice on_dismiss=on_dismiss /> }
                }
            />
        </div>
    }
}

#[component]
fn Toast(notice: Notice, on_dismiss: Callback<u64>) -> impl IntoView {
    let id = notice.id;

    // auto-dismiss; a toast closed by hand is simply not found later
    wasm_bindgen_futures::spawn_local(async move {
        TimeoutFuture::new(NOTICE_TIMEOUT_MS).await;
        on_dismiss.run(id);
    });

    view! {
        <div class=notice.level.css_class() role="status">
            <span class="toast__message">{notice.message}</span>
            <button class="toast__close" title="Закрыть" on:click=move |_| on_dismiss.run(id)>
                "×"
            </button>
        </div>
    }
}
