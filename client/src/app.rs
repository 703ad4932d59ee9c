//! Root `Dashboard` component and its refresh loop.
//!
//! SYSTEM CONTEXT
//! ==============
//! `boot` mounts this into `#root`. It owns the `RwSignal<PriceBoard>`
//! context and polls the server every `REFRESH_INTERVAL_MS`. Each quote is
//! fetched independently so one failing pair leaves the others current.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};

use crate::components::price_card::PriceCard;
use crate::state::prices::{PriceBoard, TRACKED_PAIRS};

#[component]
pub fn Dashboard() -> impl IntoView {
    provide_meta_context();

    let board = RwSignal::new(PriceBoard::new(TRACKED_PAIRS));
    provide_context(board);

    #[cfg(feature = "csr")]
    {
        refresh(board);
        let interval = gloo_timers::callback::Interval::new(crate::state::prices::REFRESH_INTERVAL_MS, move || {
            refresh(board);
        });
        // The dashboard is never unmounted.
        interval.forget();
    }

    let server_time = move || {
        board.with(|b| b.server_time.as_ref().map_or_else(|| "--".to_owned(), |t| t.iso.clone()))
    };
    let error = move || board.with(|b| b.error.clone());
    let pairs = move || board.with(|b| b.pairs().map(str::to_owned).collect::<Vec<_>>());

    view! {
        <Title text="Coinboard"/>
        <main class="dashboard">
            <header class="dashboard__header">
                <h1>"Coinboard"</h1>
                <span class="dashboard__time">"Server time: " {server_time}</span>
            </header>
            <Show when=move || error().is_some()>
                <p class="dashboard__error">{move || error().unwrap_or_default()}</p>
            </Show>
            <div class="dashboard__cards">
                <For
                    each=pairs
                    key=|pair: &String| pair.clone()
                    children=move |pair| view! { <PriceCard pair=pair/> }
                />
            </div>
        </main>
    }
}

#[cfg(feature = "csr")]
fn refresh(board: RwSignal<PriceBoard>) {
    use crate::net::api::{fetch_price, fetch_time};
    use crate::net::types::PriceKind;

    leptos::task::spawn_local(async move {
        match fetch_time().await {
            Ok(time) => board.update(|b| b.server_time = Some(time)),
            Err(e) => log::warn!("dashboard: time fetch failed: {e}"),
        }
    });

    let pairs = board.with_untracked(|b| b.pairs().map(str::to_owned).collect::<Vec<_>>());
    for pair in pairs {
        for kind in PriceKind::ALL {
            let pair = pair.clone();
            leptos::task::spawn_local(async move {
                match fetch_price(&pair, kind).await {
                    Ok(price) => board.update(|b| b.apply(&pair, kind, price)),
                    Err(e) => {
                        log::warn!("dashboard: {pair} {} failed: {e}", kind.as_str());
                        board.update(|b| b.fail(&pair, kind, &e));
                    }
                }
            });
        }
    }
}
