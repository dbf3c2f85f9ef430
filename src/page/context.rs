use serde::Serialize;
use serde_json::Value;

use crate::api::value_to_text;

/// What the current page says about which list the user is looking at
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    pub is_single_list_page: bool,
    pub current_list_id: Option<String>,
    pub current_list_name: Option<String>,
}

impl PageContext {
    pub fn single(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            is_single_list_page: true,
            current_list_id: Some(id.into()),
            current_list_name: Some(name.into()),
        }
    }

    pub fn multi_list() -> Self {
        Self::default()
    }

    /// Derive the context from `props.pageProps.lists`: exactly one entry
    /// means the page shows a single list.
    pub fn from_page_json(json: &Value) -> Self {
        let Some(lists) = json
            .pointer("/props/pageProps/lists")
            .and_then(Value::as_array)
        else {
            return Self::multi_list();
        };

        match lists.as_slice() {
            [only] => Self {
                is_single_list_page: true,
                current_list_id: non_empty(only.get("id")),
                current_list_name: non_empty(only.get("name")),
            },
            _ => Self::multi_list(),
        }
    }

    /// The list id to filter on, if this is a single-list page with a known id
    pub fn single_list_id(&self) -> Option<&str> {
        if self.is_single_list_page {
            self.current_list_id.as_deref().filter(|id| !id.is_empty())
        } else {
            None
        }
    }
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    value.map(value_to_text).filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn one_page_list_means_single_list_page() {
        let json = json!({ "props": { "pageProps": { "lists": [{ "id": 991, "name": "Xmas" }] } } });
        let context = PageContext::from_page_json(&json);

        assert_eq!(context, PageContext::single("991", "Xmas"));
        assert_eq!(context.single_list_id(), Some("991"));
    }

    #[test]
    fn several_page_lists_mean_overview() {
        let json = json!({ "props": { "pageProps": { "lists": [{ "id": "a" }, { "id": "b" }] } } });
        assert_eq!(PageContext::from_page_json(&json), PageContext::multi_list());
    }

    #[test]
    fn missing_page_props_mean_overview() {
        assert_eq!(PageContext::from_page_json(&json!({})), PageContext::multi_list());
        assert_eq!(
            PageContext::from_page_json(&json!({ "props": { "pageProps": { "lists": "x" } } })),
            PageContext::multi_list()
        );
    }

    #[test]
    fn single_page_without_id_does_not_filter() {
        let json = json!({ "props": { "pageProps": { "lists": [{ "name": "No id" }] } } });
        let context = PageContext::from_page_json(&json);

        assert!(context.is_single_list_page);
        assert_eq!(context.single_list_id(), None);
    }
}
