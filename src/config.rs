// src/config.rs
use crate::api::CrawlOptions;
use crate::constants::{DEFAULT_CACHE_TTL_SECS, DEFAULT_CRAWL_CONCURRENCY, MAX_CRAWL_CONCURRENCY};
use crate::error::AppError;
use crate::site_map::CanonicalIdOptions;
use crate::types::{AuthToken, PageId, PageUrlOverrides, SiteDomain, SpaceId};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

/// Environment variable holding the `token_v2` session cookie.
pub const AUTH_TOKEN_ENV: &str = "NOTION_TOKEN";

/// Parsed and validated command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Root Notion page URL or ID (e.g., "https://www.notion.so/...")
    #[arg(env = "NOTION_ROOT_PAGE_ID")]
    pub root_page: String,

    /// Restrict the crawl to this space (defaults to the root page's space)
    #[arg(long, env = "NOTION_ROOT_SPACE_ID")]
    pub space: Option<String>,

    /// Append the page ID to every derived slug
    #[arg(long, default_value_t = false)]
    pub include_notion_id_in_urls: bool,

    /// Domain the site is published under
    #[arg(long, default_value = "localhost")]
    pub domain: String,

    /// Site name
    #[arg(long, default_value = "Notion Site")]
    pub name: String,

    /// Site description
    #[arg(long)]
    pub description: Option<String>,

    /// Fixed slug for a page, as slug=page (repeatable)
    #[arg(long = "override", value_name = "SLUG=PAGE")]
    pub overrides: Vec<String>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable response caching (always fetch fresh data)
    #[arg(long, default_value_t = false)]
    pub no_cache: bool,

    /// Cache TTL in seconds (default: 300 = 5 minutes)
    #[arg(long, default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl: u64,

    /// Number of pages fetched concurrently (default: 4, max 32)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Maximum link depth below the root page (default: unlimited)
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Maximum number of pages to crawl (default: unlimited)
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Do not follow the rows of collections (databases)
    #[arg(long, default_value_t = false)]
    pub no_collections: bool,
}

/// Rendering of the finished site map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Site, canonical page map and build statistics as JSON
    #[default]
    Json,
    /// A sitemap.xml of the published pages
    SitemapXml,
}

/// The site being published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub name: String,
    pub domain: SiteDomain,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub root_notion_page_id: PageId,
    pub root_notion_space_id: Option<SpaceId>,
    pub include_notion_id_in_urls: bool,
    pub page_url_overrides: PageUrlOverrides,
}

impl SiteConfig {
    pub fn new(name: impl Into<String>, domain: SiteDomain, root_notion_page_id: PageId) -> Self {
        Self {
            name: name.into(),
            domain,
            description: None,
            root_notion_page_id,
            root_notion_space_id: None,
            include_notion_id_in_urls: false,
            page_url_overrides: PageUrlOverrides::new(),
        }
    }

    pub fn canonical_options(&self) -> CanonicalIdOptions {
        CanonicalIdOptions {
            include_raw_id: self.include_notion_id_in_urls,
        }
    }
}

/// Resolved build configuration, validated and ready to drive the build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub site: SiteConfig,
    pub auth_token: Option<AuthToken>,
    pub output_file: Option<PathBuf>,
    pub format: OutputFormat,
    pub verbose: bool,
    pub no_cache: bool,
    pub cache_ttl: u64,
    pub crawl: CrawlOptions,
}

impl BuildConfig {
    /// Resolves a complete build configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let token = std::env::var(AUTH_TOKEN_ENV).ok();
        Self::resolve_with_token(cli, token)
    }

    /// Like [`BuildConfig::resolve`], with the session token passed in.
    pub fn resolve_with_token(
        cli: CommandLineInput,
        token: Option<String>,
    ) -> Result<Self, AppError> {
        let root_page_id = PageId::parse(&cli.root_page)?;
        let root_space_id = cli.space.as_deref().map(SpaceId::parse).transpose()?;
        let domain = SiteDomain::parse(&cli.domain)?;
        let page_url_overrides = PageUrlOverrides::parse_pairs(&cli.overrides)?;

        let auth_token = token
            .filter(|token| !token.trim().is_empty())
            .map(AuthToken::new)
            .transpose()?;

        if cli.name.trim().is_empty() {
            return Err(AppError::MissingConfiguration(
                "site name cannot be empty".to_string(),
            ));
        }

        let site = SiteConfig {
            name: cli.name.trim().to_string(),
            domain,
            description: cli.description,
            root_notion_page_id: root_page_id,
            root_notion_space_id: root_space_id,
            include_notion_id_in_urls: cli.include_notion_id_in_urls,
            page_url_overrides,
        };

        let crawl = CrawlOptions {
            concurrency: cli
                .concurrency
                .unwrap_or(DEFAULT_CRAWL_CONCURRENCY)
                .clamp(1, MAX_CRAWL_CONCURRENCY),
            traverse_collections: !cli.no_collections,
            max_depth: cli.max_depth,
            max_pages: cli.max_pages,
        };

        Ok(BuildConfig {
            site,
            auth_token,
            output_file: cli.output.map(PathBuf::from),
            format: cli.format,
            verbose: cli.verbose,
            no_cache: cli.no_cache,
            cache_ttl: cli.cache_ttl,
            crawl,
        })
    }
}
