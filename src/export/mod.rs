mod enrich;
mod notify;
mod pipeline;

pub use enrich::PriceEnricher;
pub use notify::{ConsoleNotifier, Notifier, RecordingNotifier};
pub use pipeline::{
    fetch_page_lists, ExportOutcome, ExportPipeline, ExportSettings, PageLists,
    NO_LISTS_MESSAGE, NO_MATCHING_LISTS_MESSAGE, SUCCESS_MESSAGE,
};
