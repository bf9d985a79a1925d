use crate::domain::a005_funnel::board::{DropZone, DRAG_MIME};
use crate::domain::a006_contract::store::use_deal_store;
use crate::shared::components::PageHeader;
use crate::shared::icons::icon;
use crate::shared::state::CancelFlag;
use contracts::domain::a005_funnel::aggregate::{is_unassigned, DEFAULT_FUNNEL_COLOR};
use contracts::domain::a005_funnel::{FunnelDto, FunnelOption};
use contracts::domain::a006_contract::line_item::format_amount;
use contracts::domain::a006_contract::ContractCard;
use leptos::ev::{Event, FocusEvent, MouseEvent, SubmitEvent};
use leptos::prelude::*;
use leptos_router::components::A;
use web_sys::DragEvent;

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

fn drag_data(ev: &DragEvent) -> String {
    ev.data_transfer()
        .and_then(|dt| dt.get_data(DRAG_MIME).ok())
        .unwrap_or_default()
}

fn start_drag(ev: &DragEvent, payload: Option<String>) {
    match (payload, ev.data_transfer()) {
        (Some(payload), Some(dt)) => {
            let _ = dt.set_data(DRAG_MIME, &payload);
            dt.set_effect_allowed("move");
        }
        _ => ev.prevent_default(),
    }
}

/// Kanban board of deals by funnel
#[component]
pub fn FunnelBoard() -> impl IntoView {
    let store = use_deal_store();
    let state = *store.state();

    let cancel = CancelFlag::new();
    {
        let store = store.clone();
        let cancel = cancel.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let _ = store.load_board(&cancel).await;
        });
    }
    on_cleanup(move || cancel.cancel());

    view! {
        <div class="funnel-board">
            <PageHeader title="Сделки" subtitle="Перетаскивайте сделки между воронками">
                <A href="/deals/new" attr:class="btn btn-primary">
                    {icon("plus")}
                    "Новая сделка"
                </A>
            </PageHeader>

            {move || state.with(|s| s.error.clone()).map(|e| view! { <div class="error">{e}</div> })}

            <FunnelCreateForm />

            <div class="funnel-board__columns">
                <For
                    each=move || state.with(|s| s.board.columns.clone())
                    key=|column: &FunnelOption| column.id.clone()
                    children=move |column: FunnelOption| view! { <BoardColumn column_id=column.id /> }
                />
            </div>
        </div>
    }
}

#[component]
fn BoardColumn(column_id: String) -> impl IntoView {
    let store = use_deal_store();
    let state = *store.state();
    let unassigned = is_unassigned(&column_id);

    let name = {
        let id = column_id.clone();
        move || state.with(|s| s.board.column(&id).map(|c| c.name.clone()).unwrap_or_default())
    };
    let style = {
        let id = column_id.clone();
        move || {
            let color = state.with(|s| s.board.column(&id).map(|c| c.color.clone()));
            format!(
                "border-top-color: {}",
                color.unwrap_or_else(|| DEFAULT_FUNNEL_COLOR.to_string())
            )
        }
    };
    let count = {
        let id = column_id.clone();
        move || state.with(|s| s.board.cards_in(&id).len())
    };
    let class = {
        let id = column_id.clone();
        move || {
            state.with(|s| {
                let mut class = String::from("funnel-column");
                if s.board.card_drag.current().is_some_and(|drag| drag.from_column_id != id) {
                    class.push_str(" funnel-column--drop-target");
                }
                if s.board.column_drag.current() == Some(&id) {
                    class.push_str(" funnel-column--dragged");
                }
                class
            })
        }
    };
    let cards = {
        let id = column_id.clone();
        move || state.with(|s| s.board.cards_in(&id).into_iter().cloned().collect::<Vec<_>>())
    };

    let on_header_dragstart = {
        let store = store.clone();
        let id = column_id.clone();
        move |ev: DragEvent| start_drag(&ev, store.begin_column_drag(&id))
    };
    let on_header_drop = {
        let store = store.clone();
        let id = column_id.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            let raw = drag_data(&ev);
            let store = store.clone();
            let zone = DropZone::ColumnHeader(id.clone());
            wasm_bindgen_futures::spawn_local(async move {
                let _ = store.drop_payload(&raw, zone).await;
            });
        }
    };
    let on_body_drop = {
        let store = store.clone();
        let id = column_id.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            let raw = drag_data(&ev);
            let store = store.clone();
            let zone = DropZone::ColumnBody(id.clone());
            wasm_bindgen_futures::spawn_local(async move {
                let _ = store.drop_payload(&raw, zone).await;
            });
        }
    };
    let on_dragend = {
        let store = store.clone();
        move |_: DragEvent| store.end_drag()
    };

    let controls = (!unassigned).then(|| view! { <ColumnControls column_id=column_id.clone() /> });

    view! {
        <section class=class style=style>
            <header
                class="funnel-column__header"
                draggable=if unassigned { "false" } else { "true" }
                on:dragstart=on_header_dragstart
                on:dragover=|ev: DragEvent| ev.prevent_default()
                on:drop=on_header_drop
                on:dragend=on_dragend
            >
                <span class="funnel-column__name">{name}</span>
                <span class="funnel-column__count">{count}</span>
                {controls}
            </header>
            <div
                class="funnel-column__body"
                on:dragover=|ev: DragEvent| ev.prevent_default()
                on:drop=on_body_drop
            >
                <For
                    each=cards
                    key=|card: &ContractCard| format!("{}|{}|{}", card.id, card.funnel_ref, card.amount)
                    children=move |card: ContractCard| view! { <DealCard card=card /> }
                />
            </div>
        </section>
    }
}

/// Header controls of a funnel column
#[component]
fn ColumnControls(column_id: String) -> impl IntoView {
    let store = use_deal_store();
    let state = *store.state();

    let order_value = {
        let id = column_id.clone();
        move || state.with(|s| s.board.display_order(&id))
    };
    let on_order_input = {
        let store = store.clone();
        let id = column_id.clone();
        move |ev: Event| store.set_order_draft(&id, event_target_value(&ev))
    };
    let on_order_blur = {
        let store = store.clone();
        let id = column_id.clone();
        move |_: FocusEvent| {
            let store = store.clone();
            let id = id.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let _ = store.commit_column_order(&id).await;
            });
        }
    };
    let on_rename = {
        let store = store.clone();
        let id = column_id.clone();
        move |_: MouseEvent| {
            let Some(column) = state.with_untracked(|s| s.board.column(&id).cloned()) else {
                return;
            };
            let entered = web_sys::window()
                .and_then(|w| w.prompt_with_message_and_default("Название воронки", &column.name).ok())
                .flatten();
            let Some(name) = entered.filter(|n| n.trim() != column.name) else {
                return;
            };
            let payload = FunnelDto {
                name: name.trim().to_string(),
                ..column.to_dto()
            };
            let store = store.clone();
            let id = id.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let _ = store.update_funnel(&id, payload).await;
            });
        }
    };
    let on_delete = {
        let store = store.clone();
        let id = column_id.clone();
        move |_: MouseEvent| {
            if !confirm("Удалить воронку?") {
                return;
            }
            let store = store.clone();
            let id = id.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let _ = store.delete_funnel(&id).await;
            });
        }
    };

    view! {
        <div class="funnel-column__controls">
            <input
                class="funnel-column__order"
                type="text"
                inputmode="numeric"
                title="Порядок"
                prop:value=order_value
                on:input=on_order_input
                on:blur=on_order_blur
            />
            <button class="btn-icon" title="Переименовать" on:click=on_rename>
                {icon("edit")}
            </button>
            <button class="btn-icon" title="Удалить" on:click=on_delete>
                {icon("delete")}
            </button>
        </div>
    }
}

#[component]
fn DealCard(card: ContractCard) -> impl IntoView {
    let store = use_deal_store();
    let state = *store.state();
    let id = card.id.clone();

    let class = {
        let id = id.clone();
        move || {
            if state.with(|s| s.board.moving_contract_id.as_deref() == Some(id.as_str())) {
                "deal-card deal-card--moving"
            } else {
                "deal-card"
            }
        }
    };
    let on_dragstart = {
        let store = store.clone();
        let id = id.clone();
        move |ev: DragEvent| {
            ev.stop_propagation();
            start_drag(&ev, store.begin_card_drag(&id));
        }
    };
    let on_dragend = {
        let store = store.clone();
        move |_: DragEvent| store.end_drag()
    };
    let on_delete = {
        let store = store.clone();
        let id = id.clone();
        move |_: MouseEvent| {
            if !confirm("Удалить сделку?") {
                return;
            }
            let store = store.clone();
            let id = id.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let _ = store.delete_contract(&id).await;
            });
        }
    };

    let title = if card.contract_number.is_empty() {
        "Без номера".to_string()
    } else {
        format!("№ {}", card.contract_number)
    };
    let client = card.client_name.clone().unwrap_or_else(|| card.client_id.clone());
    let counterparty = card
        .counterparty_name
        .clone()
        .unwrap_or_else(|| card.counterparty_id.clone());
    let amount = format!("{} {}", format_amount(card.amount), card.currency);

    view! {
        <article
            class=class
            draggable="true"
            on:dragstart=on_dragstart
            on:dragend=on_dragend
        >
            <div class="deal-card__title">{title}</div>
            <div class="deal-card__client">{client}</div>
            <div class="deal-card__counterparty">{counterparty}</div>
            <div class="deal-card__footer">
                <span class="deal-card__amount">{amount}</span>
                <span class="deal-card__date">{card.deal_date.clone()}</span>
            </div>
            <div class="deal-card__actions">
                <A href=format!("/deals/{}/edit", id) attr:class="btn-icon">
                    {icon("edit")}
                </A>
                <button class="btn-icon" title="Удалить" on:click=on_delete>
                    {icon("delete")}
                </button>
            </div>
        </article>
    }
}

/// Inline form for a new funnel
#[component]
fn FunnelCreateForm() -> impl IntoView {
    let store = use_deal_store();
    let name = RwSignal::new(String::new());
    let color = RwSignal::new(DEFAULT_FUNNEL_COLOR.to_string());

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let payload = FunnelDto {
            name: name.get_untracked().trim().to_string(),
            color: color.get_untracked(),
            comment: None,
            order: 0,
        };
        let store = store.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if store.create_funnel(payload).await.is_ok() {
                name.set(String::new());
            }
        });
    };

    view! {
        <form class="funnel-create" on:submit=on_submit>
            {icon("funnel")}
            <input
                type="text"
                placeholder="Новая воронка"
                prop:value=move || name.get()
                on:input=move |ev| name.set(event_target_value(&ev))
            />
            <input
                type="color"
                prop:value=move || color.get()
                on:input=move |ev| color.set(event_target_value(&ev))
            />
            <button class="btn btn-secondary" type="submit">
                {icon("plus")}
                "Добавить воронку"
            </button>
        </form>
    }
}
