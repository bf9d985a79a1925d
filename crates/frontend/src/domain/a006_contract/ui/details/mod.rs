mod fields;
mod products;

use self::fields::{DealInput, FunnelSelect, ReferenceSelect};
use self::products::DealProducts;
use crate::domain::a006_contract::store::{use_deal_store, FormMode};
use crate::shared::components::PageHeader;
use crate::shared::icons::icon;
use crate::shared::state::CancelFlag;
use contracts::domain::a001_reference::ReferenceKind;
use contracts::domain::a006_contract::DealField;
use leptos::ev::MouseEvent;
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};
use leptos_router::NavigateOptions;

#[component]
pub fn DealCreatePage() -> impl IntoView {
    view! { <DealDetails id=None /> }
}

#[component]
pub fn DealEditPage() -> impl IntoView {
    let params = use_params_map();
    let id = params.with_untracked(|p| p.get("id")).unwrap_or_default();
    view! { <DealDetails id=Some(id) /> }
}

/// Deal form for both create and edit
#[component]
pub fn DealDetails(id: Option<String>) -> impl IntoView {
    let store = use_deal_store();
    let state = *store.state();
    let navigate = use_navigate();
    let is_edit = id.is_some();

    let cancel = CancelFlag::new();
    {
        let store = store.clone();
        let cancel = cancel.clone();
        if id.is_none() {
            store.initialize_form(FormMode::Create);
        }
        wasm_bindgen_futures::spawn_local(async move {
            if let Some(id) = id {
                let _ = store.load_contract_for_edit(&id, &cancel).await;
            }
            let _ = store.load_reference_data(false).await;
            let _ = store.load_products(false).await;
        });
    }
    on_cleanup(move || cancel.cancel());

    let on_save = {
        let store = store.clone();
        move |_: MouseEvent| {
            let store = store.clone();
            let navigate = navigate.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if store.submit_deal().await.is_ok() {
                    navigate("/", NavigateOptions::default());
                }
            });
        }
    };
    let on_reset = {
        let store = store.clone();
        move |_: MouseEvent| {
            store.reset_deal();
            store.initialize_form(FormMode::Create);
        }
    };

    let title = if is_edit { "Редактирование сделки" } else { "Новая сделка" };

    view! {
        <div class="details-container deal-details">
            <PageHeader title=title back_href="/" />

            {move || state.with(|s| s.error.clone()).map(|e| view! { <div class="error">{e}</div> })}

            <div class="details-form deal-details__grid">
                <ReferenceSelect field=DealField::ClientId kind=ReferenceKind::Client label="Клиент" />
                <ReferenceSelect field=DealField::CounterpartyId kind=ReferenceKind::Counterparty label="Контрагент" />
                <ReferenceSelect field=DealField::CompanyId kind=ReferenceKind::Company label="Компания" />
                <FunnelSelect />
                <DealInput field=DealField::WarehouseId label="Склад" />
                <DealInput field=DealField::ContractNumber label="Номер договора" />
                <DealInput field=DealField::DealDate label="Дата сделки" input_type="date" />
                <DealInput field=DealField::DealAmount label="Сумма" />
                <DealInput field=DealField::Currency label="Валюта" />
                <DealInput field=DealField::PayCard label="Оплата картой" />
                <DealInput field=DealField::PayCash label="Оплата наличными" />
                <DealInput field=DealField::Guarantee label="Гарантия" />
                <DealInput field=DealField::Comment label="Комментарий" multiline=true />
            </div>

            <DealProducts />

            <div class="details-actions">
                <button
                    class="btn btn-primary"
                    on:click=on_save
                    disabled=move || state.with(|s| s.form.submitting)
                >
                    {icon("save")}
                    {if is_edit { "Сохранить" } else { "Создать" }}
                </button>
                {(!is_edit).then(move || view! {
                    <button class="btn btn-secondary" on:click=on_reset>
                        {icon("cancel")}
                        "Очистить"
                    </button>
                })}
            </div>
        </div>
    }
}
