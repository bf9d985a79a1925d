use leptos::prelude::*;
use leptos_router::components::A;

/// PageHeader component - title row shared by the board and the deal form
#[component]
pub fn PageHeader(
    /// Page title (required)
    #[prop(into)]
    title: String,

    /// Optional subtitle
    #[prop(optional, into)]
    subtitle: MaybeProp<String>,

    /// Link rendered as "← Назад"
    #[prop(optional, into)]
    back_href: Option<String>,

    /// Action buttons
    #[prop(optional)]
    children: Option<Children>,
) -> impl IntoView {
    view! {
        <div class="page-header">
            <div class="page-header__content">
                {back_href.map(|href| view! {
                    <A href=href attr:class="page-header__back">"← Назад"</A>
                })}
                <div class="page-header__text">
                    <h1 class="page-header__title">{title}</h1>
                    {move || subtitle.get().map(|s| view! {
                        <div class="page-header__subtitle">{s}</div>
                    })}
                </div>
            </div>
            <div class="page-header__actions">
                {children.map(|children| children())}
            </div>
        </div>
    }
}
