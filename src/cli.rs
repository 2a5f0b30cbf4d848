// src/cli.rs
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::commands::{Command, HELP};
use crate::config::{AppConfig, CONFIG_PATH_ENV, FEED_URL_ENV};
use crate::dashboard::{Dashboard, DashboardState};
use crate::feed::{FeedClient, JobFeed};
use crate::filters::{FilterState, PostedWithin};
use crate::render::render_dashboard;
use crate::table::{PageSize, SortColumn, SortDirection, SortState, TableViewModel};

#[derive(Parser)]
#[command(name = "job-dashboard")]
#[command(about = "Browse entry-level and new-grad tech job postings from a JSON feed")]
pub struct Cli {
    #[command(subcommand)]
    pub command: DashboardCommand,

    /// TOML configuration file
    #[arg(long, global = true, env = CONFIG_PATH_ENV)]
    pub config: Option<PathBuf>,

    /// Feed URL or local path (overrides the config file)
    #[arg(long, global = true, env = FEED_URL_ENV)]
    pub feed_url: Option<String>,
}

#[derive(Subcommand)]
pub enum DashboardCommand {
    /// Fetch the feed once and print one page of the table
    Show(ViewArgs),
    /// Poll the feed and redraw on every delivery; type commands on stdin
    Watch(ViewArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Only show jobs whose location mentions remote
    #[arg(long)]
    pub remote_only: bool,

    /// Location contains
    #[arg(long, default_value = "")]
    pub location: String,

    /// Posted within: all, 7, 14, 30 or 60 days
    #[arg(long, default_value = "all", value_parser = parse_posted_within)]
    pub posted_within: PostedWithin,

    /// Company or title contains
    #[arg(long, default_value = "")]
    pub search: String,

    /// Sort column: company, title, role, level, location or posted
    #[arg(long, value_parser = parse_sort_column)]
    pub sort: Option<SortColumn>,

    /// Sort ascending instead of the column's default direction
    #[arg(long, conflicts_with = "descending")]
    pub ascending: bool,

    /// Sort descending instead of the column's default direction
    #[arg(long)]
    pub descending: bool,

    /// Rows per page: 10, 25 or 50
    #[arg(long, value_parser = parse_page_size)]
    pub page_size: Option<PageSize>,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

fn parse_posted_within(value: &str) -> Result<PostedWithin, String> {
    value.parse().map_err(|e: anyhow::Error| e.to_string())
}

fn parse_sort_column(value: &str) -> Result<SortColumn, String> {
    value.parse().map_err(|e: anyhow::Error| e.to_string())
}

fn parse_page_size(value: &str) -> Result<PageSize, String> {
    value.parse().map_err(|e: anyhow::Error| e.to_string())
}

impl ViewArgs {
    pub fn filters(&self) -> FilterState {
        FilterState::new()
            .with_remote_only(self.remote_only)
            .with_location(self.location.clone())
            .with_posted_within(self.posted_within)
            .with_search(self.search.clone())
    }

    pub fn table(&self, default_page_size: PageSize) -> TableViewModel {
        let mut table = TableViewModel::new().with_page_size(self.page_size.unwrap_or(default_page_size));

        let column = self.sort.unwrap_or(SortColumn::Posted);
        let direction = if self.ascending {
            SortDirection::Ascending
        } else if self.descending {
            SortDirection::Descending
        } else {
            column.initial_direction()
        };
        table.set_sort(SortState { column, direction });
        table.set_page_index(self.page.saturating_sub(1));
        table
    }
}

/// Run the selected subcommand; `--feed-url` wins over the loaded config
pub async fn handle_command(cli: Cli, config: AppConfig) -> Result<()> {
    let config = config.with_feed_url_override(cli.feed_url);
    run(cli.command, config).await
}

pub async fn run(command: DashboardCommand, config: AppConfig) -> Result<()> {
    info!(
        feed_url = %config.feed_url,
        poll_interval_secs = config.poll_interval.as_secs(),
        "Starting job dashboard"
    );

    let client = FeedClient::with_timeout(&config.feed_url, config.request_timeout)?;

    match command {
        DashboardCommand::Show(args) => show(&client, &args, &config).await,
        DashboardCommand::Watch(args) => watch(Arc::new(client), &args, &config).await,
    }
}

async fn show(feed: &dyn JobFeed, args: &ViewArgs, config: &AppConfig) -> Result<()> {
    let jobs = feed.fetch_jobs().await;
    let state = DashboardState::new()
        .with_filters(args.filters())
        .with_jobs(jobs);
    let mut table = args.table(config.page_size);

    print!("{}", render_dashboard(&state, &mut table, Utc::now()));
    Ok(())
}

enum SessionEvent {
    Delivered(bool),
    Input(std::io::Result<Option<String>>),
    Interrupted,
}

async fn watch(feed: Arc<FeedClient>, args: &ViewArgs, config: &AppConfig) -> Result<()> {
    let mut dashboard = Dashboard::mount(feed, config.poll_interval);
    dashboard.set_filters(args.filters());
    let mut table = args.table(config.page_size);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    redraw(&dashboard, &mut table, None)?;

    loop {
        let event = tokio::select! {
            alive = dashboard.next_update() => SessionEvent::Delivered(alive),
            line = lines.next_line(), if stdin_open => SessionEvent::Input(line),
            _ = tokio::signal::ctrl_c() => SessionEvent::Interrupted,
        };

        match event {
            SessionEvent::Delivered(true) => redraw(&dashboard, &mut table, None)?,
            SessionEvent::Delivered(false) => break,
            SessionEvent::Input(Ok(Some(line))) => match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(Command::Help) => redraw(&dashboard, &mut table, Some(HELP))?,
                Ok(command) => {
                    let rows = dashboard.state().filtered_jobs().len();
                    let filters = command.apply(dashboard.state().filters(), &mut table, rows);
                    dashboard.set_filters(filters);
                    redraw(&dashboard, &mut table, None)?;
                }
                Err(e) => redraw(&dashboard, &mut table, Some(&e.to_string()))?,
            },
            SessionEvent::Input(Ok(None)) => {
                info!("stdin closed, continuing to poll until interrupted");
                stdin_open = false;
            }
            SessionEvent::Input(Err(e)) => {
                warn!("Failed to read command: {}", e);
                stdin_open = false;
            }
            SessionEvent::Interrupted => {
                info!("Received Ctrl-C, stopping");
                break;
            }
        }
    }

    dashboard.shutdown().await;
    Ok(())
}

fn redraw(dashboard: &Dashboard, table: &mut TableViewModel, message: Option<&str>) -> Result<()> {
    let screen = render_dashboard(dashboard.state(), table, Utc::now());
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "\x1B[2J\x1B[H{}", screen).context("Failed to write to terminal")?;
    if let Some(message) = message {
        writeln!(stdout, "\n{}", message).context("Failed to write to terminal")?;
    }
    write!(stdout, "\n> ").context("Failed to write to terminal")?;
    stdout.flush().context("Failed to flush terminal")
}
