// src/main.rs

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion_site_map::{
    deliver, render, AppError, BuildConfig, CachedPageSource, ClientOptions, CommandLineInput,
    NotionHttpClient, OutputPlan, OutputReport, PageSource, SiteMap, SiteMapBuilder,
    SiteMapDelivery, SiteMapSource, SpaceCrawler,
};
use std::fs;
use std::sync::Arc;

/// Sets up logging configuration.
///
/// Console output goes to stderr so a site map printed to stdout stays clean.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion_site_map.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Builds the site map, then renders and delivers it.
async fn execute_pipeline(config: &BuildConfig) -> Result<(), AppError> {
    let pipeline = NotionSiteMap::new(config).await?;

    let site_map = pipeline.site_map().await?;
    let report = pipeline.deliver(&site_map)?;
    pipeline.report_completion(&site_map, &report);

    Ok(())
}

/// Wires the HTTP page source, the crawler and the builder for one run.
struct NotionSiteMap<'a> {
    config: &'a BuildConfig,
    builder: SiteMapBuilder,
}

impl<'a> NotionSiteMap<'a> {
    async fn new(config: &'a BuildConfig) -> Result<Self, AppError> {
        let http_client = NotionHttpClient::new(ClientOptions {
            auth_token: config.auth_token.clone(),
            ..ClientOptions::default()
        })?;

        let source: Arc<dyn PageSource> = if config.no_cache {
            log::info!("Cache disabled, all requests go to Notion");
            Arc::new(http_client)
        } else {
            log::info!("Cache enabled (TTL: {}s)", config.cache_ttl);
            Arc::new(CachedPageSource::new(http_client, config.cache_ttl).await?)
        };

        let crawler = Arc::new(SpaceCrawler::new(config.crawl.clone()));
        let builder = SiteMapBuilder::for_site(&config.site, crawler, source);

        Ok(Self { config, builder })
    }

    /// Prints a summary to stderr; stays quiet when the site map went to stdout.
    fn report_completion(&self, site_map: &SiteMap, report: &OutputReport) {
        for collision in &site_map.stats.collisions {
            eprintln!(
                "⚠️  Slug '{}' is used by {} and {}; keeping {}",
                collision.slug,
                collision.kept_page_id,
                collision.dropped_page_id,
                collision.kept_page_id
            );
        }

        for path in report.written_files() {
            eprintln!("✓ Site map saved to {}", path.display());
            eprintln!("📄 {}", site_map.stats);
        }
    }
}

#[async_trait::async_trait]
impl SiteMapSource for NotionSiteMap<'_> {
    async fn site_map(&self) -> Result<SiteMap, AppError> {
        let site = &self.config.site;
        log::info!(
            "Building site map for '{}' from {}",
            site.name,
            site.root_notion_page_id
        );

        self.builder
            .build_site_map(
                &site.root_notion_page_id,
                site.root_notion_space_id.as_ref(),
                site.clone(),
            )
            .await
    }
}

impl SiteMapDelivery for NotionSiteMap<'_> {
    fn deliver(&self, site_map: &SiteMap) -> Result<OutputReport, AppError> {
        let content = render(site_map, self.config.format)?;
        let plan = OutputPlan::for_destination(self.config.output_file.clone(), content);
        let report = deliver(plan)?;

        if !report.is_success() {
            return Err(AppError::DeliveryFailed {
                failures: report.failed.iter().map(|f| f.error.clone()).collect(),
            });
        }

        Ok(report)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = BuildConfig::resolve(cli)?;

    execute_pipeline(&config).await?;

    Ok(())
}
