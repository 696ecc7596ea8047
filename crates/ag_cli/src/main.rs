use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ag_core::ArticleRequest;
use ag_inference::{create_model, Config, Provider, DEFAULT_BASE_URL, DEFAULT_MODEL_NAME};
use ag_scrapers::search::duckduckgo;
use ag_scrapers::{init_logging, ArticlePipeline, DuckDuckGoSearch, HttpFetcher};
use ag_web::auth::{DEFAULT_TOKEN_TTL_MINUTES, MAX_TOKEN_TTL_MINUTES};
use ag_web::{AppState, AuthConfig};
use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

const INSECURE_SECRET_KEY: &str = "your-secret-key-change-in-production";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate SEO-ready articles from live web context",
    long_about = None
)]
pub struct Cli {
    /// API key for the chat-completion provider
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(
        long,
        default_value = "openrouter",
        help = "Chat model provider. Available providers: openrouter (default), dummy"
    )]
    provider: Provider,
    #[arg(long, env = "OPENROUTER_MODEL", default_value = DEFAULT_MODEL_NAME)]
    model: String,
    #[arg(long, env = "OPENROUTER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    llm_base_url: String,
    #[arg(long, default_value = duckduckgo::DEFAULT_BASE_URL)]
    search_base_url: String,
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Secret used to sign access tokens
        #[arg(
            long,
            env = "SECRET_KEY",
            hide_env_values = true,
            default_value = INSECURE_SECRET_KEY
        )]
        secret_key: String,
        #[arg(
            long,
            default_value_t = DEFAULT_TOKEN_TTL_MINUTES,
            value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_TTL_MINUTES)
        )]
        token_ttl_minutes: i64,
        /// Account allowed to log in, as name:password (repeatable)
        #[arg(long = "user", value_parser = parse_user, default_value = "admin:admin123")]
        users: Vec<(String, String)>,
        /// Origin allowed by CORS (repeatable)
        #[arg(
            long = "allowed-origin",
            default_values = ["http://localhost:3000", "http://localhost:5173"]
        )]
        allowed_origins: Vec<String>,
    },
    /// Generate one article and write it to stdout or a file
    Generate {
        /// Topic to write about
        query: String,
        /// Page to use as primary context
        #[arg(long)]
        url: Option<String>,
        /// File (or directory) to write the result to
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Html,
    Json,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        }
    }
}

fn parse_user(s: &str) -> Result<(String, String), String> {
    match s.split_once(':') {
        Some((name, password)) if !name.is_empty() && !password.is_empty() => {
            Ok((name.to_string(), password.to_string()))
        }
        _ => Err(format!("expected name:password, got {}", s)),
    }
}

/// File name derived from the article title: non-alphanumerics become `_`, lowercased.
fn file_name_for(title: &str, format: OutputFormat) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    format!("{}.{}", stem, format.extension())
}

fn output_path(output: &Path, title: &str, format: OutputFormat) -> PathBuf {
    if output.is_dir() {
        output.join(file_name_for(title, format))
    } else {
        output.to_path_buf()
    }
}

impl Cli {
    fn inference_config(&self) -> Config {
        Config {
            provider: self.provider,
            api_key: self.api_key.clone(),
            model_name: Some(self.model.clone()),
            base_url: Some(self.llm_base_url.clone()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let model = create_model(Some(cli.inference_config())).await?;
    let search = DuckDuckGoSearch::new()?.with_base_url(cli.search_base_url.as_str());
    let fetcher = HttpFetcher::new()?;
    let pipeline = ArticlePipeline::new(Arc::new(fetcher), Arc::new(search), model);

    match cli.command {
        Commands::Serve {
            host,
            port,
            secret_key,
            token_ttl_minutes,
            users,
            allowed_origins,
        } => {
            if secret_key == INSECURE_SECRET_KEY {
                warn!(
                    "⚠️ Using the built-in SECRET_KEY; set SECRET_KEY before exposing this server"
                );
            }
            let addr: SocketAddr = format!("{}:{}", host, port)
                .parse()
                .with_context(|| format!("Invalid listen address {}:{}", host, port))?;
            let users: HashMap<String, String> = users.into_iter().collect();
            info!("👥 {} user(s) configured", users.len());
            let state = AppState {
                pipeline,
                auth: AuthConfig::new(secret_key, token_ttl_minutes, users)?,
                allowed_origins,
            };
            ag_web::serve(state, addr).await?;
        }
        Commands::Generate {
            query,
            url,
            output,
            format,
        } => {
            let generated = pipeline
                .generate_full_article(&ArticleRequest { query, url })
                .await?;
            let rendered = match format {
                OutputFormat::Html => generated.html.clone(),
                OutputFormat::Json => serde_json::to_string_pretty(&generated)?,
            };
            match output {
                Some(output) => {
                    let path = output_path(&output, &generated.article.title, format);
                    tokio::fs::write(&path, rendered)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("💾 Wrote {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }
    }

    Ok(())
}
