// src/config.rs
use crate::constants::{
    DEFAULT_MAX_CONCURRENCY, DEFAULT_MIN_CONCURRENCY, DEFAULT_USER_TIME_ZONE, MAX_CONCURRENCY,
};
use crate::error::AppError;
use crate::pipeline::{Emit, RenderRequest};
use crate::posts::{FeedQuery, FilterOptions, PostStatus, PostType, SortOrder};
use crate::types::{NotionId, SessionToken, ValidationError};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    Desc,
    Asc,
}

impl From<OrderArg> for SortOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Desc => SortOrder::Desc,
            OrderArg::Asc => SortOrder::Asc,
        }
    }
}

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Notion database page URL or ID
    #[arg(env = "NOTION_PAGE_ID")]
    pub notion_input: Option<String>,

    /// `token_v2` cookie for private workspaces
    #[arg(long, env = "NOTION_TOKEN_V2", hide_env_values = true)]
    pub token: Option<String>,

    /// Accepted post statuses (comma separated, e.g. "Public,PublicOnDetail")
    #[arg(long, value_delimiter = ',')]
    pub status: Vec<String>,

    /// Accepted post types (comma separated, e.g. "Post,Paper")
    #[arg(long = "type", value_delimiter = ',')]
    pub post_type: Vec<String>,

    /// Use the detail-page filter (public and detail-only posts of every type)
    #[arg(long, default_value_t = false)]
    pub detail: bool,

    /// Skip filtering and emit every assembled post
    #[arg(long, default_value_t = false, conflicts_with_all = ["status", "post_type", "detail"])]
    pub all: bool,

    /// Case-insensitive search over title, summary and tags
    #[arg(short, long)]
    pub query: Option<String>,

    /// Only posts carrying this tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Only posts in this category
    #[arg(long)]
    pub category: Option<String>,

    /// Feed order
    #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
    pub order: OrderArg,

    /// Emit a single post with its page record map
    #[arg(long, conflicts_with = "emit")]
    pub slug: Option<String>,

    /// What to print
    #[arg(long, value_enum, default_value_t = Emit::Posts)]
    pub emit: Emit,

    /// Write JSON to this file instead of stdout
    #[arg(short, long)]
    pub output_file: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, default_value_t = false)]
    pub pretty: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable response caching (always fetch fresh data)
    #[arg(long, default_value_t = false)]
    pub no_cache: bool,

    /// Cache TTL in seconds (default: 300 = 5 minutes)
    #[arg(long, default_value_t = 300)]
    pub cache_ttl: u64,

    /// Pages and user lookups in flight (default: auto, max 32; 1 = sequential)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Time zone sent with collection queries
    #[arg(long, default_value = DEFAULT_USER_TIME_ZONE)]
    pub time_zone: String,
}

/// Resolved site configuration, validated and ready to drive a run.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub root_id: NotionId,
    pub token: Option<SessionToken>,
    pub request: RenderRequest,
    pub output_file: Option<PathBuf>,
    pub pretty: bool,
    pub verbose: bool,
    pub no_cache: bool,
    pub cache_ttl: u64,
    pub concurrency: usize,
    pub time_zone: String,
}

impl SiteConfig {
    /// Resolves a complete configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let notion_input = cli.notion_input.ok_or_else(|| {
            AppError::MissingConfiguration(
                "pass a database page URL or ID, or set NOTION_PAGE_ID".to_string(),
            )
        })?;
        let root_id = NotionId::parse(&notion_input)?;

        let token = cli
            .token
            .filter(|t| !t.trim().is_empty())
            .map(SessionToken::new)
            .transpose()?;

        let filter = if cli.all {
            None
        } else {
            Some(resolve_filter(
                &cli.status,
                &cli.post_type,
                cli.detail || cli.slug.is_some(),
            )?)
        };

        let concurrency = match cli.concurrency {
            Some(n) if n == 0 || n > MAX_CONCURRENCY => {
                return Err(ValidationError::OutOfBounds {
                    value: n,
                    min: 1,
                    max: MAX_CONCURRENCY,
                }
                .into())
            }
            Some(n) => n,
            None => default_concurrency(),
        };

        Ok(SiteConfig {
            root_id,
            token,
            request: RenderRequest {
                filter,
                feed: FeedQuery {
                    q: cli.query.filter(|q| !q.is_empty()),
                    tag: cli.tag,
                    category: cli.category,
                    order: cli.order.into(),
                },
                slug: cli.slug,
                emit: cli.emit,
            },
            output_file: cli.output_file.map(PathBuf::from),
            pretty: cli.pretty,
            verbose: cli.verbose,
            no_cache: cli.no_cache,
            cache_ttl: cli.cache_ttl,
            concurrency,
            time_zone: cli.time_zone,
        })
    }
}

/// Builds filter options from a preset, overriding either list when given.
fn resolve_filter(
    statuses: &[String],
    types: &[String],
    detail: bool,
) -> Result<FilterOptions, ValidationError> {
    let mut options = if detail {
        FilterOptions::detail()
    } else {
        FilterOptions::default()
    };
    if !statuses.is_empty() {
        options.accept_status = statuses
            .iter()
            .map(|s| s.parse::<PostStatus>())
            .collect::<Result<_, _>>()?;
    }
    if !types.is_empty() {
        options.accept_type = types
            .iter()
            .map(|t| t.parse::<PostType>())
            .collect::<Result<_, _>>()?;
    }
    Ok(options)
}

/// In-flight lookups when none is configured: one per core, kept within bounds.
pub fn default_concurrency() -> usize {
    num_cpus::get().clamp(DEFAULT_MIN_CONCURRENCY, DEFAULT_MAX_CONCURRENCY)
}
