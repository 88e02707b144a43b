//! Serper CLI - command line interface for the Serper.dev search API.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use serper::{Client, HttpTransport, RetryTransport, SearchRequest, Transport};

/// Serper - typed CLI for the Serper.dev Google Search API
#[derive(Parser)]
#[command(name = "serper")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Search query (words are joined with spaces)
    #[arg(required = true)]
    query: Vec<String>,

    /// Serper.dev API key
    #[arg(long, env = "SERPER_API_KEY", hide_env_values = true)]
    api_key: String,

    /// API base URL
    #[arg(long, env = "SERPER_BASE_URL")]
    base_url: Option<String>,

    /// Search vertical to query
    #[arg(short, long, value_enum, default_value = "search")]
    kind: Kind,

    /// Number of results to return (1-100)
    #[arg(short, long, env = "SERPER_NUM", default_value_t = 10)]
    num: u32,

    /// Country code
    #[arg(long, env = "SERPER_GL", default_value = "us")]
    gl: String,

    /// Language code
    #[arg(long, env = "SERPER_HL", default_value = "en")]
    hl: String,

    /// Location bias (e.g., "New York")
    #[arg(short, long)]
    location: Option<String>,

    /// Result page, 1-indexed
    #[arg(short, long, default_value_t = 1)]
    page: u32,

    /// Request timeout in seconds
    #[arg(short, long, env = "SERPER_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Retry attempts for transient failures (0 disables retries)
    #[arg(short, long, default_value_t = 3)]
    retries: u32,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    /// Web search
    Search,
    /// Image search
    Images,
    /// News search
    News,
    /// Places search
    Places,
    /// Scholar search
    Scholar,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let query = cli.query.join(" ");

    let mut transport: Arc<dyn Transport> = Arc::new(HttpTransport::with_timeout(
        Duration::from_secs(cli.timeout),
    ));
    if cli.retries > 0 {
        transport = Arc::new(RetryTransport::new(
            transport,
            cli.retries,
            Duration::from_millis(500),
        ));
    }

    let mut builder = Client::builder(cli.api_key.as_str()).transport(transport);
    if let Some(base_url) = &cli.base_url {
        builder = builder.base_url(base_url.as_str());
    }
    let client = builder.build()?;

    let mut request = SearchRequest::new(query)
        .with_num(cli.num)
        .with_country(cli.gl.as_str())
        .with_language(cli.hl.as_str())
        .with_page(cli.page);
    if let Some(location) = &cli.location {
        request = request.with_location(location.as_str());
    }

    debug!(query = %request.query, num = cli.num, gl = %cli.gl, "searching");

    let output = match cli.kind {
        Kind::Search => serde_json::to_string_pretty(&client.search(&request).await?)?,
        Kind::Images => serde_json::to_string_pretty(&client.images(&request).await?)?,
        Kind::News => serde_json::to_string_pretty(&client.news(&request).await?)?,
        Kind::Places => serde_json::to_string_pretty(&client.places(&request).await?)?,
        Kind::Scholar => serde_json::to_string_pretty(&client.scholar(&request).await?)?,
    };
    println!("{}", output);

    Ok(())
}
