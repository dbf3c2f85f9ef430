use crate::api::{EnrichedItem, EnrichedList, ShoppingList, ShoppingApi};

/// Attaches current prices to list items, one request at a time
pub struct PriceEnricher<'a, A: ShoppingApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: ShoppingApi + ?Sized> PriceEnricher<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Price every item of every list, in order.
    ///
    /// Items without a product id are left out. A failed lookup never stops
    /// the export; the item is kept with the error marker as its price.
    pub async fn enrich(&self, lists: &[ShoppingList]) -> Vec<EnrichedList> {
        let mut enriched = Vec::with_capacity(lists.len());

        for list in lists {
            tracing::info!(
                "Pricing list {} (ID: {}), {} item(s)",
                list.list_name,
                list.list_id,
                list.items.len()
            );

            let mut items = Vec::with_capacity(list.items.len());
            for item in &list.items {
                if item.product_id.is_empty() {
                    tracing::warn!(
                        "Product ID missing for {:?} in list {}, skipping",
                        item.product_name,
                        list.list_id
                    );
                    continue;
                }

                let priced = match self.api.fetch_price(&item.product_id).await {
                    Ok(quote) => EnrichedItem::priced(item, quote.display_price()),
                    Err(e) => {
                        tracing::error!(
                            "Error fetching price for product {}: {}",
                            item.product_id,
                            e
                        );
                        EnrichedItem::price_failed(item)
                    }
                };

                tracing::debug!(
                    "{} x {} ({}) = {}",
                    priced.quantity_display(),
                    priced.product_name,
                    priced.product_id,
                    priced.current_price
                );
                items.push(priced);
            }

            enriched.push(EnrichedList {
                list_id: list.list_id.clone(),
                list_name: list.list_name.clone(),
                items,
            });
        }

        enriched
    }
}
