use std::path::Path;

use colored::Colorize;

use crate::api::ColesClient;
use crate::cli::Cli;
use crate::control::ExportControl;
use crate::error::Result;
use crate::export::{ConsoleNotifier, ExportOutcome, ExportPipeline, ExportSettings};
use crate::page::PageSource;
use crate::render::{BrowserTabPresenter, FilePresenter, Presenter};
use crate::visibility::Visibility;

pub async fn run(cli: &Cli, page: &str, output: Option<&Path>, no_open: bool) -> Result<()> {
    let config = cli.load_config()?;
    let client = ColesClient::from_config(&config)?;

    let source = PageSource::parse(page);
    if let Some(path) = source.path() {
        if Visibility::for_path(&path, &config.visibility.root_path) == Visibility::Hidden {
            tracing::warn!(
                "{} is not a shopping list page; the export control would be hidden there",
                path
            );
        }
    }
    let html = source.load(&client).await?;

    let presenter: Box<dyn Presenter> = match output {
        Some(path) => Box::new(FilePresenter::new(path)),
        None if no_open || !config.export.open_browser => {
            Box::new(FilePresenter::in_dir(&config.export.output_dir()))
        }
        None => Box::new(BrowserTabPresenter::new(config.export.output_dir())),
    };

    let notifier = ConsoleNotifier;
    let pipeline = ExportPipeline::new(
        &client,
        presenter.as_ref(),
        &notifier,
        ExportSettings::from_config(&config),
    );

    let mut control = ExportControl::new();
    let outcome = pipeline.run(&html, &mut control).await?;

    if cli.json {
        let (status, location) = match &outcome {
            ExportOutcome::Presented { location, .. } => {
                ("presented", Some(location.display().to_string()))
            }
            ExportOutcome::NoLists => ("no_lists", None),
            ExportOutcome::NoMatchingLists => ("no_matching_lists", None),
            ExportOutcome::PopupBlocked { .. } => ("popup_blocked", None),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "status": status,
                "location": location,
                "lists": outcome.lists(),
            }))?
        );
        return Ok(());
    }

    if let ExportOutcome::Presented { location, lists } = &outcome {
        let items: usize = lists.iter().map(|l| l.items.len()).sum();
        println!(
            "{} Exported {} list(s), {} item(s) to {}",
            "✓".green(),
            lists.len(),
            items,
            location.display().to_string().dimmed()
        );
    }

    Ok(())
}
