//! Dashboard UI components.
//!
//! Components read the shared `RwSignal<PriceBoard>` from Leptos context
//! provided by the `Dashboard` root.

pub mod price_card;
