//! Carta command-line interface

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use carta::{output, CrawlConfig, CrawlEvent, Crawler, ReportFormat};

#[derive(Parser, Debug)]
#[command(name = "carta")]
#[command(about = "Map a website as a tree of pages, assets, and links")]
#[command(version)]
struct Cli {
    /// Root address to crawl from
    url: String,

    /// Maximum link depth to follow (unbounded when omitted)
    #[arg(long)]
    depth: Option<u32>,

    /// Additional hosts to crawl, comma separated
    #[arg(short, long, value_delimiter = ',')]
    domains: Vec<String>,

    /// Maximum number of fetches in flight
    #[arg(short, long, default_value_t = carta::config::DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Json)]
    reporter: ReportFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,

    /// Suppress logging and the progress spinner
    #[arg(short, long)]
    quiet: bool,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "carta=error"
    } else if verbose {
        "carta=debug,info"
    } else {
        "carta=info,warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn make_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner.set_message("crawling...");
    spinner
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let config = CrawlConfig::new(&cli.url)
        .with_max_depth(cli.depth)
        .with_domains(cli.domains.clone())
        .with_concurrency(cli.concurrency);

    let crawler = Crawler::new(&config).context("failed to configure the crawl")?;
    let mut handle = crawler.start();

    let spinner = make_spinner(cli.quiet);
    let mut ctrl_c = Box::pin(tokio::signal::ctrl_c());
    let mut cancelled = false;
    let mut pages: usize = 0;
    let mut failures: usize = 0;

    loop {
        tokio::select! {
            _ = &mut ctrl_c, if !cancelled => {
                cancelled = true;
                handle.cancel();
                spinner.set_message("stopping, draining in-flight fetches...");
                info!("cancellation requested, finishing outstanding fetches");
            }
            event = handle.next_event() => match event {
                Some(CrawlEvent::Page(page)) => {
                    pages += 1;
                    spinner.set_message(format!("{} pages | {}", pages, page.url));
                }
                Some(CrawlEvent::Failure { url, error }) => {
                    failures += 1;
                    warn!(%url, %error, "broken link");
                }
                None => break,
            },
        }
    }

    spinner.finish_and_clear();

    let tree = handle.finish().await?;
    output::write_report(&tree, cli.reporter, cli.out.as_deref())?;

    info!(pages, failures, "crawl complete");
    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}
