use std::path::PathBuf;

use serde::Serialize;

use super::enrich::PriceEnricher;
use super::notify::Notifier;
use crate::api::{filter_for_context, normalize_lists, EnrichedList, ShoppingApi, ShoppingList};
use crate::config::Config;
use crate::control::ExportControl;
use crate::error::{ColesListsError, Result};
use crate::page::{extract_page_context, extract_subscription_key, PageContext};
use crate::render::{render_document, Presenter, RenderOptions};

pub const NO_LISTS_MESSAGE: &str = "No shopping lists found.";
pub const NO_MATCHING_LISTS_MESSAGE: &str = "No matching shopping lists found.";
pub const SUCCESS_MESSAGE: &str =
    "Successfully fetched shopping lists and their current prices. Check the new tab for details.";

/// Page and rendering settings for one export
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub data_block_id: String,
    pub key_field: String,
    pub render: RenderOptions,
}

impl ExportSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            data_block_id: config.page.data_block_id.clone(),
            key_field: config.page.key_field.clone(),
            render: RenderOptions {
                product_url_base: config.api.product_url_base.clone(),
                email_subject: config.export.email_subject.clone(),
            },
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Lists fetched for a page, after the single-list filter
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLists {
    pub context: Option<PageContext>,
    /// How many lists the API returned before filtering
    pub fetched: usize,
    pub lists: Vec<ShoppingList>,
}

/// How an export that did not hit a fatal error ended
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Presented {
        location: PathBuf,
        lists: Vec<EnrichedList>,
    },
    NoLists,
    NoMatchingLists,
    /// The data was fetched but the document could not be shown
    PopupBlocked { lists: Vec<EnrichedList> },
}

impl ExportOutcome {
    pub fn lists(&self) -> &[EnrichedList] {
        match self {
            ExportOutcome::Presented { lists, .. } | ExportOutcome::PopupBlocked { lists } => {
                lists.as_slice()
            }
            ExportOutcome::NoLists | ExportOutcome::NoMatchingLists => &[],
        }
    }
}

/// Extract the key and context from a page, then fetch and filter its lists
pub async fn fetch_page_lists(
    api: &dyn ShoppingApi,
    page_html: &str,
    settings: &ExportSettings,
) -> Result<PageLists> {
    let key = extract_subscription_key(page_html, &settings.data_block_id, &settings.key_field)?;
    let context = extract_page_context(page_html, &settings.data_block_id);

    let response = api.fetch_lists(&key).await?;
    let lists = normalize_lists(&response);
    let fetched = lists.len();
    tracing::info!("Found {} shopping list(s)", fetched);

    let lists = filter_for_context(lists, context.as_ref());

    Ok(PageLists {
        context,
        fetched,
        lists,
    })
}

/// One click of the export control: page -> lists -> prices -> document
pub struct ExportPipeline<'a> {
    api: &'a dyn ShoppingApi,
    presenter: &'a dyn Presenter,
    notifier: &'a dyn Notifier,
    settings: ExportSettings,
}

impl<'a> ExportPipeline<'a> {
    pub fn new(
        api: &'a dyn ShoppingApi,
        presenter: &'a dyn Presenter,
        notifier: &'a dyn Notifier,
        settings: ExportSettings,
    ) -> Self {
        Self {
            api,
            presenter,
            notifier,
            settings,
        }
    }

    /// Run a full export.
    ///
    /// Setup failures (page data, list fetch) are alerted and returned as
    /// errors. Empty results and a refused browser tab are alerted and
    /// returned as outcomes. The control is `Ready` again on return.
    pub async fn run(
        &self,
        page_html: &str,
        control: &mut ExportControl,
    ) -> Result<ExportOutcome> {
        let mut guard = control.begin();

        match self.export(page_html).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                guard.fail();
                tracing::error!("Error fetching shopping lists and prices: {}", e);
                self.notifier.alert(&format!("Error: {}", e));
                Err(e)
            }
        }
    }

    async fn export(&self, page_html: &str) -> Result<ExportOutcome> {
        let page = fetch_page_lists(self.api, page_html, &self.settings).await?;

        if page.fetched == 0 {
            self.notifier.alert(NO_LISTS_MESSAGE);
            return Ok(ExportOutcome::NoLists);
        }

        if page.lists.is_empty() {
            self.notifier.alert(NO_MATCHING_LISTS_MESSAGE);
            return Ok(ExportOutcome::NoMatchingLists);
        }

        let lists = PriceEnricher::new(self.api).enrich(&page.lists).await;
        let html = render_document(&lists, &self.settings.render);

        match self.presenter.present(&html) {
            Ok(location) => {
                self.notifier.alert(SUCCESS_MESSAGE);
                Ok(ExportOutcome::Presented { location, lists })
            }
            Err(ColesListsError::PopupBlocked) => {
                tracing::warn!("Document rendered but could not be shown");
                self.notifier.alert(&ColesListsError::PopupBlocked.to_string());
                Ok(ExportOutcome::PopupBlocked { lists })
            }
            Err(e) => Err(e),
        }
    }
}
