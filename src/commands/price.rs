use colored::Colorize;

use crate::api::{ColesClient, ShoppingApi};
use crate::cli::Cli;
use crate::error::Result;

pub async fn run(cli: &Cli, product_id: &str) -> Result<()> {
    let config = cli.load_config()?;
    let client = ColesClient::from_config(&config)?;

    let quote = client.fetch_price(product_id).await?;
    let price = quote.display_price();

    if cli.json {
        println!(
            "{}",
            serde_json::json!({ "productId": product_id, "currentPrice": price })
        );
    } else {
        println!("{} {}", format!("{}:", product_id).dimmed(), price.bold());
    }

    Ok(())
}
