mod context;
mod source;

pub use context::PageContext;
pub use source::PageSource;

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::error::{ColesListsError, Result};

/// Text of the page's embedded JSON data block
#[derive(Debug, Clone)]
pub struct PageData {
    text: String,
}

impl PageData {
    /// Locate the `<script id="...">` data block in a page
    pub fn locate(html: &str, block_id: &str) -> Result<Self> {
        let document = Html::parse_document(html);
        let selector = Selector::parse(&format!("script[id=\"{}\"]", block_id))
            .map_err(|e| ColesListsError::Other(format!("Invalid data block id: {:?}", e)))?;

        let script = document
            .select(&selector)
            .next()
            .ok_or(ColesListsError::MissingDataBlock)?;

        let text: String = script.text().collect();
        if text.trim().is_empty() {
            return Err(ColesListsError::EmptyDataBlock);
        }

        Ok(Self { text })
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Find a string field by name in the raw text, without parsing it
    pub fn subscription_key(&self, field: &str) -> Result<String> {
        let pattern = format!(r#""{}"\s*:\s*"([^"]+)""#, regex::escape(field));
        let regex = Regex::new(&pattern)
            .map_err(|e| ColesListsError::Other(format!("Invalid key pattern: {}", e)))?;

        regex
            .captures(&self.text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| ColesListsError::KeyNotFound(field.to_string()))
    }

    pub fn parse_json(&self) -> Result<Value> {
        serde_json::from_str(&self.text).map_err(|e| ColesListsError::MalformedJson(e.to_string()))
    }
}

/// Extract the lists API subscription key. Failure here aborts an export.
pub fn extract_subscription_key(html: &str, block_id: &str, field: &str) -> Result<String> {
    let key = PageData::locate(html, block_id)?.subscription_key(field)?;
    tracing::info!("Extracted {}", field);
    tracing::debug!("{} = {}", field, key);
    Ok(key)
}

/// Extract the page context. Failures are logged and yield `None`, which
/// callers treat as a multi-list page.
pub fn extract_page_context(html: &str, block_id: &str) -> Option<PageContext> {
    let json = match PageData::locate(html, block_id).and_then(|data| data.parse_json()) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!("Page context unavailable: {}", e);
            return None;
        }
    };

    let context = PageContext::from_page_json(&json);
    match (&context.current_list_id, &context.current_list_name) {
        (Some(id), name) if context.is_single_list_page => tracing::info!(
            "Detected single list page: {} (ID: {})",
            name.as_deref().unwrap_or(""),
            id
        ),
        _ => tracing::info!("Detected lists overview page: exporting all lists"),
    }

    Some(context)
}
