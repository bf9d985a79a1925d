use crate::domain::a006_contract::store::use_deal_store;
use crate::shared::icons::icon;
use contracts::domain::a004_product::ProductOption;
use contracts::domain::a006_contract::line_item::format_amount;
use contracts::domain::a006_contract::{DealProduct, ProductField};
use leptos::ev::{Event, KeyboardEvent, MouseEvent};
use leptos::prelude::*;

/// Product lines of the deal
#[component]
pub fn DealProducts() -> impl IntoView {
    let store = use_deal_store();
    let state = *store.state();
    let barcode = RwSignal::new(String::new());
    let picked = RwSignal::new(String::new());

    let on_barcode_key = {
        let store = store.clone();
        move |ev: KeyboardEvent| {
            if ev.key() != "Enter" {
                return;
            }
            ev.prevent_default();
            let code = barcode.get_untracked();
            if code.trim().is_empty() {
                return;
            }
            if store.add_product_by_code(&code).is_some() {
                store.sync_amount_from_products();
            }
            barcode.set(String::new());
        }
    };
    let on_add = {
        let store = store.clone();
        move |_: MouseEvent| {
            let id = picked.get_untracked();
            let Some(product) = state.with_untracked(|s| s.reference.product(&id).cloned()) else {
                return;
            };
            store.add_product_to_deal(&product);
            store.sync_amount_from_products();
            picked.set(String::new());
        }
    };

    let total = move || format_amount(state.with(|s| s.form.total()));

    view! {
        <div class="deal-products">
            <h2 class="deal-products__title">{icon("products")} "Товары"</h2>

            <div class="deal-products__toolbar">
                <label class="deal-products__barcode">
                    {icon("barcode")}
                    <input
                        type="text"
                        placeholder="Штрихкод или артикул"
                        prop:value=move || barcode.get()
                        on:input=move |ev| barcode.set(event_target_value(&ev))
                        on:keydown=on_barcode_key
                    />
                </label>
                <select
                    prop:value=move || picked.get()
                    on:change=move |ev| picked.set(event_target_value(&ev))
                >
                    <option value="">"— выберите товар —"</option>
                    <For
                        each=move || state.with(|s| s.reference.products.clone())
                        key=|product: &ProductOption| product.id.clone()
                        children=move |product: ProductOption| {
                            view! { <option value=product.id>{product.name}</option> }
                        }
                    />
                </select>
                <button class="btn btn-secondary" on:click=on_add>
                    {icon("plus")}
                    "Добавить"
                </button>
            </div>

            <table class="table deal-products__lines">
                <thead>
                    <tr>
                        <th>"Товар"</th>
                        <th>"Серийный номер"</th>
                        <th>"Кол-во"</th>
                        <th>"Цена"</th>
                        <th>"НДС, %"</th>
                        <th>"Скидка, %"</th>
                        <th>"Гарантия"</th>
                        <th>"Сумма"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || state.with(|s| s.form.products.clone())
                        key=|line: &DealProduct| line.uid.clone()
                        children=move |line: DealProduct| view! { <ProductRow uid=line.uid name=line.name /> }
                    />
                </tbody>
            </table>

            <div class="deal-products__total">
                "Итого: " <strong>{total}</strong>
            </div>
        </div>
    }
}

#[component]
fn ProductRow(uid: String, name: String) -> impl IntoView {
    let store = use_deal_store();
    let state = *store.state();

    let line_total = {
        let uid = uid.clone();
        move || {
            state.with(|s| {
                s.form
                    .products
                    .iter()
                    .find(|p| p.uid == uid)
                    .map(|p| format_amount(p.line_total()))
                    .unwrap_or_default()
            })
        }
    };
    let on_remove = {
        let store = store.clone();
        let uid = uid.clone();
        move |_: MouseEvent| {
            store.remove_product_from_deal(&uid);
            store.sync_amount_from_products();
        }
    };

    view! {
        <tr>
            <td>{name}</td>
            <td><LineInput uid=uid.clone() field=ProductField::SerialNumber /></td>
            <td><LineInput uid=uid.clone() field=ProductField::Quantity /></td>
            <td><LineInput uid=uid.clone() field=ProductField::Price /></td>
            <td><LineInput uid=uid.clone() field=ProductField::Vat /></td>
            <td><LineInput uid=uid.clone() field=ProductField::Discount /></td>
            <td><LineInput uid=uid field=ProductField::Guarantee /></td>
            <td class="deal-products__sum">{line_total}</td>
            <td>
                <button class="btn-icon" title="Удалить" on:click=on_remove>
                    {icon("delete")}
                </button>
            </td>
        </tr>
    }
}

fn field_text(line: &DealProduct, field: ProductField) -> String {
    match field {
        ProductField::SerialNumber => line.serial_number.clone(),
        ProductField::Quantity => line.quantity.to_string(),
        ProductField::Price => format_amount(line.price),
        ProductField::Vat => format_amount(line.vat),
        ProductField::Discount => format_amount(line.discount),
        ProductField::Guarantee => line.guarantee.clone(),
    }
}

/// One editable cell; rejected numbers snap back on blur
#[component]
fn LineInput(uid: String, field: ProductField) -> impl IntoView {
    let store = use_deal_store();
    let state = *store.state();
    let numeric = !matches!(field, ProductField::SerialNumber | ProductField::Guarantee);

    let value = {
        let uid = uid.clone();
        move || {
            state.with(|s| {
                s.form
                    .products
                    .iter()
                    .find(|p| p.uid == uid)
                    .map(|p| field_text(p, field))
                    .unwrap_or_default()
            })
        }
    };
    let on_input = move |ev: Event| {
        if store.set_product_field(&uid, field, &event_target_value(&ev)) {
            store.sync_amount_from_products();
        }
    };

    view! {
        <input
            type="text"
            inputmode=if numeric { "decimal" } else { "text" }
            prop:value=value
            on:change=on_input
        />
    }
}
