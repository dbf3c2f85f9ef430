mod client;
mod normalize;
mod types;

pub use client::{ColesClient, ShoppingApi};
pub use normalize::{
    filter_for_context, find_lists_in_value, locate_raw_lists, normalize_lists, ResponseShape,
};
pub use types::{
    EnrichedItem, EnrichedList, ListItem, PriceQuote, ShoppingList, PRICE_ERROR_MARKER,
    PRICE_MISSING_MARKER,
};

pub(crate) use types::value_to_text;
