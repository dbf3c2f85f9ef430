use colored::Colorize;

use crate::cli::Cli;
use crate::error::Result;
use crate::visibility::Visibility;

pub async fn run(cli: &Cli, path: &str) -> Result<()> {
    let config = cli.load_config()?;
    let visibility = Visibility::for_path(path, &config.visibility.root_path);

    if cli.json {
        println!(
            "{}",
            serde_json::json!({ "path": path, "visibility": visibility })
        );
    } else {
        match visibility {
            Visibility::Visible => println!("{}", "visible".green()),
            Visibility::Hidden => println!("{}", "hidden".dimmed()),
        }
    }

    Ok(())
}
