use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::Cli;
use crate::error::{ColesListsError, Result};
use crate::visibility::{NavigationHub, PathPoller, Visibility, VisibilityController};

/// One line of navigation input
#[derive(Debug, Clone, PartialEq, Eq)]
enum Navigation {
    Push(String),
    Replace(String),
    Back(String),
    /// Path changed without a history call
    Direct(String),
}

fn parse_navigation(line: &str) -> Option<Navigation> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb {
        "push" if !rest.is_empty() => Some(Navigation::Push(rest.to_string())),
        "replace" if !rest.is_empty() => Some(Navigation::Replace(rest.to_string())),
        "back" | "pop" if !rest.is_empty() => Some(Navigation::Back(rest.to_string())),
        _ if line.starts_with('/') => Some(Navigation::Direct(line.to_string())),
        _ => None,
    }
}

fn report(json: bool, path: &str, visibility: Visibility) {
    if json {
        println!(
            "{}",
            serde_json::json!({ "path": path, "visibility": visibility })
        );
    } else {
        let state = match visibility {
            Visibility::Visible => "visible".green(),
            Visibility::Hidden => "hidden".dimmed(),
        };
        println!("{} {}", state, path.dimmed());
    }
}

pub async fn run(cli: &Cli, initial_path: &str) -> Result<()> {
    let config = cli.load_config()?;

    let (hub, events) = NavigationHub::new(initial_path);
    let location = hub.location();
    let (controller, mut visibility) =
        VisibilityController::new(location.clone(), &config.visibility);
    let poller = PathPoller::new(
        location.clone(),
        config.visibility.poll_interval(),
        &hub.sender(),
    )
    .spawn();
    let controller_task = tokio::spawn(controller.run(events));

    report(cli.json, initial_path, *visibility.borrow());

    let json = cli.json;
    let reporter_location = location.clone();
    let reporter = tokio::spawn(async move {
        while visibility.changed().await.is_ok() {
            let state = *visibility.borrow_and_update();
            report(json, &reporter_location.path(), state);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_navigation(&line) {
            Some(Navigation::Push(path)) => hub.push_state(&path),
            Some(Navigation::Replace(path)) => hub.replace_state(&path),
            Some(Navigation::Back(path)) => hub.pop_state(&path),
            Some(Navigation::Direct(path)) => location.set(path),
            None if line.trim().is_empty() => {}
            None => tracing::warn!("Ignoring unrecognized navigation: {}", line.trim()),
        }
    }

    // Stdin closed: the poller follows the hub out, then pending recomputes finish
    drop(hub);

    controller_task
        .await
        .map_err(|e| ColesListsError::Other(format!("Visibility controller failed: {}", e)))?;
    reporter
        .await
        .map_err(|e| ColesListsError::Other(format!("Visibility reporter failed: {}", e)))?;
    poller
        .await
        .map_err(|e| ColesListsError::Other(format!("Path poller failed: {}", e)))?;

    Ok(())
}
