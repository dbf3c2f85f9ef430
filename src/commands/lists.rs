use colored::Colorize;

use crate::api::ColesClient;
use crate::cli::Cli;
use crate::error::Result;
use crate::export::{fetch_page_lists, ExportSettings};
use crate::page::PageSource;

pub async fn run(cli: &Cli, page: &str) -> Result<()> {
    let config = cli.load_config()?;
    let client = ColesClient::from_config(&config)?;

    let html = PageSource::parse(page).load(&client).await?;
    let result = fetch_page_lists(&client, &html, &ExportSettings::from_config(&config)).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.fetched == 0 {
        println!("{} No shopping lists found", "!".yellow());
        return Ok(());
    }

    if result.lists.is_empty() {
        println!("{} No matching shopping lists found", "!".yellow());
        return Ok(());
    }

    println!("{} {} shopping list(s)\n", "✓".green(), result.lists.len());

    for list in &result.lists {
        println!(
            "{} {} {}",
            "●".cyan(),
            list.list_name.bold(),
            format!("(ID: {})", list.list_id).dimmed()
        );

        for item in &list.items {
            let id = if item.product_id.is_empty() {
                "no product id".red()
            } else {
                item.product_id.as_str().dimmed()
            };
            println!(
                "  {} x {} {}",
                item.quantity_display(),
                item.product_name,
                id
            );
        }

        println!();
    }

    Ok(())
}
