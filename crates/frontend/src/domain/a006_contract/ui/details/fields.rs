use crate::domain::a006_contract::store::use_deal_store;
use contracts::domain::a001_reference::{NamedOption, ReferenceKind};
use contracts::domain::a005_funnel::FunnelOption;
use contracts::domain::a006_contract::DealField;
use leptos::ev::Event;
use leptos::prelude::*;

/// Text field bound to one scalar of the deal draft
#[component]
pub fn DealInput(
    field: DealField,
    label: &'static str,
    #[prop(optional)] input_type: Option<&'static str>,
    #[prop(optional)] multiline: bool,
) -> impl IntoView {
    let store = use_deal_store();
    let state = *store.state();
    let value = move || state.with(|s| s.form.data.get(field).to_string());
    let on_input = move |ev: Event| store.set_form_field(field, event_target_value(&ev));

    let control = if multiline {
        view! { <textarea rows="3" prop:value=value on:input=on_input></textarea> }.into_any()
    } else {
        view! {
            <input type=input_type.unwrap_or("text") prop:value=value on:input=on_input />
        }
        .into_any()
    };

    view! {
        <div class="form-group">
            <label>{label}</label>
            {control}
        </div>
    }
}

#[component]
pub fn ReferenceSelect(field: DealField, kind: ReferenceKind, label: &'static str) -> impl IntoView {
    let store = use_deal_store();
    let state = *store.state();
    let selected = move || state.with(|s| s.form.data.get(field).to_string());
    let on_change = move |ev: Event| store.set_form_field(field, event_target_value(&ev));

    view! {
        <div class="form-group">
            <label>{label}</label>
            <select prop:value=selected on:change=on_change>
                <option value="">"— не выбрано —"</option>
                <For
                    each=move || state.with(|s| s.reference.options(kind).to_vec())
                    key=|option: &NamedOption| option.id.clone()
                    children=move |option: NamedOption| {
                        let id = option.id.clone();
                        let is_selected = move || state.with(|s| s.form.data.get(field) == id);
                        let text = match option.extra {
                            Some(extra) => format!("{} ({})", option.name, extra),
                            None => option.name,
                        };
                        view! { <option value=option.id selected=is_selected>{text}</option> }
                    }
                />
            </select>
        </div>
    }
}

#[component]
pub fn FunnelSelect() -> impl IntoView {
    let store = use_deal_store();
    let state = *store.state();
    let selected = move || state.with(|s| s.form.data.funnel_id.clone());
    let on_change = move |ev: Event| store.set_form_field(DealField::FunnelId, event_target_value(&ev));

    view! {
        <div class="form-group">
            <label>"Воронка"</label>
            <select prop:value=selected on:change=on_change>
                <option value="">"Без воронки"</option>
                <For
                    each=move || state.with(|s| s.reference.funnels.clone())
                    key=|funnel: &FunnelOption| funnel.id.clone()
                    children=move |funnel: FunnelOption| {
                        let id = funnel.id.clone();
                        let is_selected = move || state.with(|s| s.form.data.funnel_id == id);
                        view! { <option value=funnel.id selected=is_selected>{funnel.name}</option> }
                    }
                />
            </select>
        </div>
    }
}
