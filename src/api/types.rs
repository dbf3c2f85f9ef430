use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Marker stored in place of a price when the lookup failed
pub const PRICE_ERROR_MARKER: &str = "Error fetching price";

/// Marker stored when the price API answered without a usable price
pub const PRICE_MISSING_MARKER: &str = "N/A";

/// A shopping list as normalized from the lists API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    pub list_id: String,
    pub list_name: String,
    pub items: Vec<ListItem>,
}

/// A single product line in a shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    /// Empty when the API omitted it; such items are never priced
    #[serde(default, deserialize_with = "deserialize_text")]
    pub product_id: String,

    #[serde(default = "default_product_name", deserialize_with = "deserialize_product_name")]
    pub product_name: String,

    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub quantity: f64,
}

fn default_product_name() -> String {
    "Unknown product".to_string()
}

impl ListItem {
    /// Quantity without a trailing `.0` for whole numbers
    pub fn quantity_display(&self) -> String {
        format_quantity(self.quantity)
    }
}

pub(crate) fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 && quantity.abs() < 1e15 {
        format!("{}", quantity as i64)
    } else {
        quantity.to_string()
    }
}

/// A list item with its current price attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: f64,
    /// Formatted price, `N/A`, or `Error fetching price`
    pub current_price: String,
}

impl EnrichedItem {
    pub fn priced(item: &ListItem, current_price: impl Into<String>) -> Self {
        Self {
            product_id: item.product_id.clone(),
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            current_price: current_price.into(),
        }
    }

    pub fn price_failed(item: &ListItem) -> Self {
        Self::priced(item, PRICE_ERROR_MARKER)
    }

    pub fn quantity_display(&self) -> String {
        format_quantity(self.quantity)
    }

    /// True when the price is a number rather than one of the markers
    pub fn has_numeric_price(&self) -> bool {
        self.current_price.trim().parse::<f64>().is_ok()
    }
}

/// A shopping list whose items carry prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedList {
    pub list_id: String,
    pub list_name: String,
    pub items: Vec<EnrichedItem>,
}

/// Response from the per-product price API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceQuote {
    #[serde(default)]
    pub current_price: Option<Value>,
}

impl PriceQuote {
    /// The price as text, or `N/A` for any falsy value
    pub fn display_price(&self) -> String {
        match &self.current_price {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
            Some(Value::Bool(true)) => "true".to_string(),
            _ => PRICE_MISSING_MARKER.to_string(),
        }
    }
}

/// Render a JSON scalar the way it reads on the page: strings verbatim,
/// numbers in their shortest form, anything else as empty.
pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(value_to_text).unwrap_or_default())
}

fn deserialize_product_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let text = deserialize_text(deserializer)?;
    if text.is_empty() {
        Ok(default_product_name())
    } else {
        Ok(text)
    }
}

fn deserialize_quantity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    })
}
