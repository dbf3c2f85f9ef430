use std::path::PathBuf;

use tokio::io::AsyncReadExt;

use crate::api::ColesClient;
use crate::error::Result;

/// Where the shopping-list page HTML comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    Stdin,
    File(PathBuf),
    /// Fetched with the configured session cookie
    Url(String),
}

impl PageSource {
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed == "-" {
            Self::Stdin
        } else if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }

    pub async fn load(&self, client: &ColesClient) -> Result<String> {
        match self {
            Self::Stdin => {
                let mut html = String::new();
                tokio::io::stdin().read_to_string(&mut html).await?;
                Ok(html)
            }
            Self::File(path) => Ok(tokio::fs::read_to_string(path).await?),
            Self::Url(url) => client.fetch_page(url).await,
        }
    }

    /// The path a browser would show for this page, when it is known
    pub fn path(&self) -> Option<String> {
        match self {
            Self::Url(url) => reqwest::Url::parse(url).ok().map(|u| u.path().to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_picks_source_kind() {
        assert_eq!(PageSource::parse("-"), PageSource::Stdin);
        assert_eq!(
            PageSource::parse("https://www.coles.com.au/lists"),
            PageSource::Url("https://www.coles.com.au/lists".to_string())
        );
        assert_eq!(
            PageSource::parse("saved/lists.html"),
            PageSource::File(PathBuf::from("saved/lists.html"))
        );
    }

    #[test]
    fn url_source_exposes_its_path() {
        let source = PageSource::parse("https://www.coles.com.au/lists/123/edit?x=1");
        assert_eq!(source.path().as_deref(), Some("/lists/123/edit"));
        assert_eq!(PageSource::parse("page.html").path(), None);
    }
}
