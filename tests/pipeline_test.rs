//! Export pipeline tests against an in-memory API
//!
//! These cover the behavior of one export click end to end: page data
//! extraction, list normalization and filtering, sequential pricing with
//! per-item failure recovery, rendering, and the control/alert side effects.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use coles_lists::api::{PriceQuote, ShoppingApi};
use coles_lists::control::{ControlState, ExportControl};
use coles_lists::export::{
    ExportOutcome, ExportPipeline, ExportSettings, RecordingNotifier, NO_LISTS_MESSAGE,
    NO_MATCHING_LISTS_MESSAGE, SUCCESS_MESSAGE,
};
use coles_lists::render::Presenter;
use coles_lists::{ColesListsError, Result};

/// Price behaviour for one product
#[derive(Clone)]
enum Price {
    Ok(Value),
    Status(u16),
    /// 200 with a body that is not JSON
    Garbled(&'static str),
}

struct FakeApi {
    lists: std::result::Result<Value, u16>,
    prices: HashMap<String, Price>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    fn new(lists: Value) -> Self {
        Self {
            lists: Ok(lists),
            prices: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing_lists(status: u16) -> Self {
        Self {
            lists: Err(status),
            prices: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn price(mut self, product_id: &str, price: Price) -> Self {
        self.prices.insert(product_id.to_string(), price);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShoppingApi for FakeApi {
    async fn fetch_lists(&self, subscription_key: &str) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("lists:{}", subscription_key));
        match &self.lists {
            Ok(value) => Ok(value.clone()),
            Err(status) => Err(ColesListsError::HttpError(*status)),
        }
    }

    async fn fetch_price(&self, product_id: &str) -> Result<PriceQuote> {
        self.calls.lock().unwrap().push(format!("price:{}", product_id));
        match self.prices.get(product_id) {
            Some(Price::Ok(body)) => Ok(serde_json::from_value(body.clone())?),
            Some(Price::Status(status)) => Err(ColesListsError::HttpError(*status)),
            Some(Price::Garbled(body)) => Ok(serde_json::from_str(body)?),
            None => Ok(serde_json::from_value(json!({ "current_price": "1.00" }))?),
        }
    }
}

#[derive(Default)]
struct CapturePresenter {
    documents: Mutex<Vec<String>>,
    blocked: bool,
}

impl CapturePresenter {
    fn blocked() -> Self {
        Self {
            documents: Mutex::new(Vec::new()),
            blocked: true,
        }
    }

    fn last(&self) -> String {
        self.documents.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl Presenter for CapturePresenter {
    fn present(&self, html: &str) -> Result<PathBuf> {
        if self.blocked {
            return Err(ColesListsError::PopupBlocked);
        }
        self.documents.lock().unwrap().push(html.to_string());
        Ok(PathBuf::from("memory://export.html"))
    }
}

fn page(page_props: Value) -> String {
    let data = json!({
        "props": { "pageProps": page_props },
        "runtimeConfig": { "BFF_API_SUBSCRIPTION_KEY": "sub-key-1" }
    });
    format!(
        r#"<html><body><script id="__NEXT_DATA__" type="application/json">{}</script></body></html>"#,
        data
    )
}

fn overview_page() -> String {
    page(json!({ "lists": [{ "id": "L1" }, { "id": "L2" }] }))
}

fn three_lists() -> Value {
    json!({
        "data": {
            "lists": [
                {
                    "id": "L1",
                    "name": "Weekly",
                    "items": [
                        { "productId": "111", "productName": "Bread", "quantity": 2 },
                        { "productId": "222", "productName": "Milk", "quantity": 1 }
                    ]
                },
                {
                    "id": "L2",
                    "name": "Party",
                    "items": [{ "productId": "333", "productName": "Chips", "quantity": 4 }]
                },
                { "id": "L3", "name": "Empty", "items": [] }
            ]
        }
    })
}

async fn run_export(
    api: &FakeApi,
    presenter: &CapturePresenter,
    html: &str,
) -> (Result<ExportOutcome>, RecordingNotifier, ExportControl) {
    let notifier = RecordingNotifier::new();
    let mut control = ExportControl::new();
    let result = {
        let pipeline = ExportPipeline::new(api, presenter, &notifier, ExportSettings::default());
        pipeline.run(html, &mut control).await
    };
    (result, notifier, control)
}

#[tokio::test]
async fn exports_all_lists_from_overview_page() {
    let api = FakeApi::new(three_lists()).price("111", Price::Ok(json!({ "current_price": "3.50" })));
    let presenter = CapturePresenter::default();

    let (result, notifier, control) = run_export(&api, &presenter, &overview_page()).await;
    let outcome = result.unwrap();

    let lists = outcome.lists();
    assert!(matches!(outcome, ExportOutcome::Presented { .. }));
    assert_eq!(lists.len(), 3);
    assert_eq!(lists[0].items[0].current_price, "3.50");
    assert_eq!(notifier.messages(), vec![SUCCESS_MESSAGE.to_string()]);
    assert_eq!(control.state(), ControlState::Ready);

    let html = presenter.last();
    assert!(html.contains("<h2>Weekly</h2>"));
    assert!(html.contains("<h2>Party</h2>"));
    assert!(html.contains("Price: $3.50"));
}

#[tokio::test]
async fn prices_are_requested_in_list_order_one_at_a_time() {
    let api = FakeApi::new(three_lists());
    let presenter = CapturePresenter::default();

    let (result, _, _) = run_export(&api, &presenter, &overview_page()).await;
    result.unwrap();

    assert_eq!(
        api.calls(),
        vec!["lists:sub-key-1", "price:111", "price:222", "price:333"]
    );
}

#[tokio::test]
async fn item_without_product_id_is_skipped() {
    let lists = json!({
        "lists": [{
            "id": "L1",
            "name": "Weekly",
            "items": [
                { "productName": "Mystery", "quantity": 1 },
                { "productId": "", "productName": "Blank", "quantity": 1 },
                { "productId": "222", "productName": "Milk", "quantity": 1 }
            ]
        }]
    });
    let api = FakeApi::new(lists);
    let presenter = CapturePresenter::default();

    let (result, _, _) = run_export(&api, &presenter, &overview_page()).await;
    let outcome = result.unwrap();

    let items = &outcome.lists()[0].items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product_id, "222");
    assert_eq!(api.calls(), vec!["lists:sub-key-1", "price:222"]);
}

#[tokio::test]
async fn failed_price_gets_marker_and_rest_continue() {
    let api = FakeApi::new(three_lists())
        .price("111", Price::Status(500))
        .price("222", Price::Ok(json!({ "current_price": 2.25 })))
        .price("333", Price::Ok(json!({ "current_price": "5.00" })));
    let presenter = CapturePresenter::default();

    let (result, notifier, _) = run_export(&api, &presenter, &overview_page()).await;
    let outcome = result.unwrap();

    let lists = outcome.lists();
    assert_eq!(lists[0].items[0].current_price, "Error fetching price");
    assert_eq!(lists[0].items[1].current_price, "2.25");
    assert_eq!(lists[1].items[0].current_price, "5.00");
    assert_eq!(notifier.messages(), vec![SUCCESS_MESSAGE.to_string()]);
}

#[tokio::test]
async fn unparseable_price_gets_marker_and_rest_continue() {
    let api = FakeApi::new(three_lists())
        .price("111", Price::Garbled("not json"))
        .price("222", Price::Ok(json!({ "current_price": "4.10" })));
    let presenter = CapturePresenter::default();

    let (result, _, _) = run_export(&api, &presenter, &overview_page()).await;
    let outcome = result.unwrap();

    let lists = outcome.lists();
    assert_eq!(lists[0].items[0].current_price, "Error fetching price");
    assert_eq!(lists[0].items[1].current_price, "4.10");
    assert_eq!(
        api.calls(),
        vec!["lists:sub-key-1", "price:111", "price:222", "price:333"]
    );
}

#[tokio::test]
async fn missing_current_price_reads_not_available() {
    let api = FakeApi::new(three_lists()).price("222", Price::Ok(json!({ "name": "Milk" })));
    let presenter = CapturePresenter::default();

    let (result, _, _) = run_export(&api, &presenter, &overview_page()).await;
    let outcome = result.unwrap();

    assert_eq!(outcome.lists()[0].items[1].current_price, "N/A");
}

#[tokio::test]
async fn single_list_page_exports_only_that_list() {
    let api = FakeApi::new(three_lists());
    let presenter = CapturePresenter::default();
    let html = page(json!({ "lists": [{ "id": "L2", "name": "Party" }] }));

    let (result, _, _) = run_export(&api, &presenter, &html).await;
    let outcome = result.unwrap();

    let lists = outcome.lists();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].list_id, "L2");
    assert_eq!(api.calls(), vec!["lists:sub-key-1", "price:333"]);
}

#[tokio::test]
async fn single_list_page_without_match_reports_no_matching_lists() {
    let api = FakeApi::new(three_lists());
    let presenter = CapturePresenter::default();
    let html = page(json!({ "lists": [{ "id": "L9", "name": "Deleted" }] }));

    let (result, notifier, control) = run_export(&api, &presenter, &html).await;

    assert_eq!(result.unwrap(), ExportOutcome::NoMatchingLists);
    assert_eq!(notifier.messages(), vec![NO_MATCHING_LISTS_MESSAGE.to_string()]);
    assert_eq!(control.state(), ControlState::Ready);
    assert!(presenter.documents.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_lists_response_reports_no_lists() {
    let api = FakeApi::new(json!({ "data": { "lists": [] } }));
    let presenter = CapturePresenter::default();

    let (result, notifier, _) = run_export(&api, &presenter, &overview_page()).await;

    assert_eq!(result.unwrap(), ExportOutcome::NoLists);
    assert_eq!(notifier.messages(), vec![NO_LISTS_MESSAGE.to_string()]);
}

#[tokio::test]
async fn missing_data_block_aborts_before_any_request() {
    let api = FakeApi::new(three_lists());
    let presenter = CapturePresenter::default();

    let (result, notifier, control) =
        run_export(&api, &presenter, "<html><body>signed out</body></html>").await;

    assert!(matches!(result, Err(ColesListsError::MissingDataBlock)));
    assert!(api.calls().is_empty());
    assert_eq!(
        notifier.messages(),
        vec!["Error: __NEXT_DATA__ script not found.".to_string()]
    );
    assert_eq!(
        control.history(),
        &[
            ControlState::Ready,
            ControlState::Fetching,
            ControlState::Failed,
            ControlState::Ready
        ]
    );
}

#[tokio::test]
async fn missing_subscription_key_aborts() {
    let api = FakeApi::new(three_lists());
    let presenter = CapturePresenter::default();
    let html = r#"<script id="__NEXT_DATA__">{"props":{}}</script>"#;

    let (result, notifier, _) = run_export(&api, &presenter, html).await;

    assert!(matches!(result, Err(ColesListsError::KeyNotFound(_))));
    assert!(api.calls().is_empty());
    assert_eq!(
        notifier.messages(),
        vec!["Error: BFF_API_SUBSCRIPTION_KEY not found.".to_string()]
    );
}

#[tokio::test]
async fn malformed_page_json_still_exports_all_lists() {
    let api = FakeApi::new(three_lists());
    let presenter = CapturePresenter::default();
    let html = r#"<script id="__NEXT_DATA__">{"BFF_API_SUBSCRIPTION_KEY":"k2", oops</script>"#;

    let (result, _, _) = run_export(&api, &presenter, html).await;

    assert_eq!(result.unwrap().lists().len(), 3);
    assert_eq!(api.calls()[0], "lists:k2");
}

#[tokio::test]
async fn list_fetch_failure_is_fatal_and_restores_control() {
    let api = FakeApi::failing_lists(401);
    let presenter = CapturePresenter::default();

    let (result, notifier, control) = run_export(&api, &presenter, &overview_page()).await;

    assert!(matches!(result, Err(ColesListsError::HttpError(401))));
    assert_eq!(
        notifier.messages(),
        vec!["Error: Failed to fetch shopping lists. Status: 401".to_string()]
    );
    assert!(control.is_enabled());
    assert_eq!(control.label(), "Export Shopping Lists");
}

#[tokio::test]
async fn blocked_tab_is_reported_but_not_an_error() {
    let api = FakeApi::new(three_lists());
    let presenter = CapturePresenter::blocked();

    let (result, notifier, control) = run_export(&api, &presenter, &overview_page()).await;

    let outcome = result.unwrap();
    assert!(matches!(outcome, ExportOutcome::PopupBlocked { .. }));
    assert_eq!(outcome.lists().len(), 3);
    assert_eq!(
        notifier.messages(),
        vec!["Failed to open a new tab. Please allow pop-ups for this website.".to_string()]
    );
    assert_eq!(control.state(), ControlState::Ready);
}

#[tokio::test]
async fn hostile_list_name_is_escaped_in_document() {
    let api = FakeApi::new(json!({
        "lists": [{ "id": "X", "name": "<script>alert('x')</script>", "items": [] }]
    }));
    let presenter = CapturePresenter::default();

    let (result, _, _) = run_export(&api, &presenter, &overview_page()).await;
    result.unwrap();

    let html = presenter.last();
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt;"));
}
