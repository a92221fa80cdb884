use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

#[derive(Debug, Serialize, Deserialize)]
struct BookPreview {
    id: String,
    title: String,
    author: String,
    image: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct PageResponse {
    session_id: String,
    results: Vec<BookPreview>,
    count: usize,
    total: usize,
    page: usize,
    remaining: usize,
    has_more: bool,
    no_results: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct BookDetail {
    id: String,
    title: String,
    author_name: String,
    published: DateTime<Utc>,
    published_year: i32,
    description: String,
}

const DEFAULT_SERVICE_URL: &str = "http://0.0.0.0:7004";
const MAX_READY_ATTEMPTS: usize = 30;

#[derive(Debug, Default, PartialEq, Eq)]
struct BrowseArgs {
    title: Option<String>,
    author: Option<String>,
    genre: Option<String>,
    book: Option<String>,
}

fn parse_args(args: &[String]) -> Result<BrowseArgs, String> {
    let mut parsed = BrowseArgs::default();
    let mut iter = args.iter();

    while let Some(flag) = iter.next() {
        let slot = match flag.as_str() {
            "--title" => &mut parsed.title,
            "--author" => &mut parsed.author,
            "--genre" => &mut parsed.genre,
            "--book" => &mut parsed.book,
            other => return Err(format!("Unknown argument: {}", other)),
        };
        let value = iter
            .next()
            .ok_or_else(|| format!("Missing value for {}", flag))?;
        *slot = Some(value.clone());
    }

    Ok(parsed)
}

fn expect_success(action: &str, status: StatusCode) -> Result<(), String> {
    if status.is_success() {
        Ok(())
    } else {
        Err(format!("{} failed: {}", action, status))
    }
}

struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    async fn wait_for_service(&self) -> Result<(), Box<dyn std::error::Error>> {
        info!("Waiting for catalog service at {}...", self.base_url);
        let url = format!("{}/status", self.base_url);

        for _ in 0..MAX_READY_ATTEMPTS {
            match self.client.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    info!("Catalog service is ready");
                    return Ok(());
                }
                Ok(response) => {
                    warn!("Catalog service responded with status: {}", response.status());
                }
                Err(e) => {
                    warn!("Catalog service not ready: {}", e);
                }
            }
            sleep(Duration::from_secs(2)).await;
        }

        Err(format!("Catalog service at {} never became ready", self.base_url).into())
    }

    async fn start_search(
        &self,
        args: &BrowseArgs,
    ) -> Result<PageResponse, Box<dyn std::error::Error>> {
        let mut query = Vec::new();
        for (key, value) in [
            ("title", &args.title),
            ("author", &args.author),
            ("genre", &args.genre),
        ] {
            if let Some(value) = value {
                query.push((key, value.as_str()));
            }
        }

        let url = format!("{}/sessions", self.base_url);
        let response = self.client.post(&url).query(&query).send().await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(format!("Search failed: {}", response.status()).into())
        }
    }

    async fn show_more(
        &self,
        session_id: &str,
    ) -> Result<Option<PageResponse>, Box<dyn std::error::Error>> {
        let url = format!("{}/sessions/{}/more", self.base_url, session_id);
        let response = self.client.post(&url).send().await?;

        match response.status() {
            status if status.is_success() => Ok(Some(response.json().await?)),
            StatusCode::CONFLICT => Ok(None),
            status => Err(format!("Show more failed: {}", status).into()),
        }
    }

    async fn close_session(&self, session_id: &str) -> Result<(), Box<dyn std::error::Error>> {
        let url = format!("{}/sessions/{}", self.base_url, session_id);
        let response = self.client.delete(&url).send().await?;

        expect_success(
            &format!("Closing session {}", session_id),
            response.status(),
        )?;
        Ok(())
    }

    async fn show_book(&self, book_id: &str) -> Result<(), Box<dyn std::error::Error>> {
        let url = format!("{}/books/{}", self.base_url, book_id);
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            warn!("Book {} not found", book_id);
            return Ok(());
        }
        if !response.status().is_success() {
            return Err(format!("Detail lookup failed: {}", response.status()).into());
        }

        let detail: BookDetail = response.json().await?;
        info!("📖 {}", detail.title);
        info!("   {} ({})", detail.author_name, detail.published_year);
        info!("   {}", detail.description);
        Ok(())
    }

    fn log_batch(page: &PageResponse) {
        for book in &page.results {
            info!("  [{}] {} by {}", book.id, book.title, book.author);
        }
        info!(
            "Showing {} of {} (page {}, {} remaining)",
            page.count, page.total, page.page, page.remaining
        );
    }

    async fn browse(&self, args: &BrowseArgs) -> Result<(), Box<dyn std::error::Error>> {
        info!("🔎 Searching catalog: {:?}", args);
        let first = self.start_search(args).await?;

        if first.no_results {
            info!("No results found for this search");
        } else {
            Self::log_batch(&first);
        }

        let mut has_more = first.has_more;
        while has_more {
            match self.show_more(&first.session_id).await? {
                Some(page) => {
                    Self::log_batch(&page);
                    has_more = page.has_more;
                }
                None => break,
            }
        }

        self.close_session(&first.session_id).await?;
        info!("✅ Browse complete");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("catalog_client=info")
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let browse_args = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!("{}", e);
            info!("Usage: catalog-client [--title T] [--author ID] [--genre ID] [--book ID]");
            std::process::exit(1);
        }
    };

    let base_url = std::env::var("CATALOG_SERVICE_URL")
        .unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_string());
    let client = CatalogClient::new(base_url);

    client.wait_for_service().await?;

    match &browse_args.book {
        Some(book_id) => client.show_book(book_id).await?,
        None => client.browse(&browse_args).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parses_search_flags() {
        let parsed = parse_args(&args(&["--title", "dune", "--genre", "sf"])).unwrap();

        assert_eq!(
            parsed,
            BrowseArgs {
                title: Some("dune".to_string()),
                genre: Some("sf".to_string()),
                ..BrowseArgs::default()
            }
        );
    }

    #[test]
    fn rejects_unknown_or_incomplete_flags() {
        assert!(parse_args(&args(&["--sort", "title"])).is_err());
        assert!(parse_args(&args(&["--author"])).is_err());
        assert_eq!(parse_args(&[]).unwrap(), BrowseArgs::default());
    }

    #[test]
    fn only_success_statuses_pass() {
        assert!(expect_success("Closing session s1", StatusCode::NO_CONTENT).is_ok());
        assert_eq!(
            expect_success("Closing session s1", StatusCode::NOT_FOUND),
            Err("Closing session s1 failed: 404 Not Found".to_string())
        );
        assert!(expect_success("Closing session s1", StatusCode::INTERNAL_SERVER_ERROR).is_err());
    }
}
