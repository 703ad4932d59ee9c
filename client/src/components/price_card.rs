//! Card showing buy, sell, and spot quotes for one currency pair.

use leptos::prelude::*;

use crate::net::types::PriceKind;
use crate::state::prices::{PriceBoard, format_price, format_spread};

#[component]
pub fn PriceCard(pair: String) -> impl IntoView {
    let board = expect_context::<RwSignal<PriceBoard>>();

    let rows = PriceKind::ALL
        .into_iter()
        .map(|kind| {
            let pair = pair.clone();
            let value = move || board.with(|b| format_price(b.quote(&pair).and_then(|q| q.get(kind))));
            view! {
                <div class="price-card__row">
                    <span class="price-card__label">{kind.label()}</span>
                    <span class="price-card__value">{value}</span>
                </div>
            }
        })
        .collect_view();

    let spread_pair = pair.clone();
    let spread = move || board.with(|b| format_spread(b.spread(&spread_pair)));

    view! {
        <section class="price-card">
            <h2 class="price-card__pair">{pair}</h2>
            {rows}
            <div class="price-card__row price-card__row--spread">
                <span class="price-card__label">"Spread"</span>
                <span class="price-card__value">{spread}</span>
            </div>
        </section>
    }
}
