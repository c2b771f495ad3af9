// src/main.rs

use anyhow::Context;
use clap::Parser;
use hoppyhour::{
    format_deal_time, format_deals, AppError, Business, BusinessApi, BusinessFilter, BusinessId,
    ClientConfig, Command, CommandLineInput, Degrade, ImageProfile, ResolvedImage,
};
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use serde::Serialize;
use std::fs;
use std::time::Duration;

/// How long `image --verify` waits for each candidate to download.
const IMAGE_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("hoppyhour.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    // stdout carries command output, so logs go to stderr.
    let console_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)
        .with_context(|| format!("cannot open log file {}", log_file_path.display()))?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(log_level)))
                .build("console", Box::new(console_appender)),
        )
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(LevelFilter::Debug),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints a one-line summary per business.
fn print_businesses(businesses: &[Business]) {
    if businesses.is_empty() {
        println!("No venues found.");
        return;
    }
    for business in businesses {
        let mut line = format!("{}  {}", business.id, business.name);
        if let Some(rating) = business.rating_overall {
            line.push_str(&format!("  ★ {:.1}", rating));
        }
        if let Some(price) = business.price_label() {
            line.push_str(&format!("  {}", price));
        }
        if let Some(category) = business.category_label() {
            line.push_str(&format!("  [{}]", category));
        }
        println!("{}", line);
        for deal in business.deals_today() {
            println!(
                "    {} - {}  {}",
                format_deal_time(&deal.start_time),
                format_deal_time(&deal.end_time),
                format_deals(&deal.deals).unwrap_or_default()
            );
        }
        if !business.address.is_empty() {
            println!("    {}", business.address);
        }
    }
}

/// Downloads the currently displayed URL; local paths count as loaded.
async fn probe(client: &reqwest::Client, url: &str) -> bool {
    if url.starts_with('/') {
        return true;
    }
    match client.get(url).timeout(IMAGE_PROBE_TIMEOUT).send().await {
        Ok(response) if response.status().is_success() => true,
        Ok(response) => {
            log::debug!("{} answered {}", url, response.status());
            false
        }
        Err(e) => {
            log::debug!("{} failed: {}", url, e);
            false
        }
    }
}

/// Walks the candidates the way a browser would on load errors.
async fn verify_image(api: &BusinessApi, image: &mut ResolvedImage) -> Result<(), AppError> {
    let client = reqwest::Client::builder().build()?;
    while let Some(url) = image.url().map(str::to_string) {
        if probe(&client, &url).await {
            return Ok(());
        }
        log::warn!("Image failed to load: {}", url);
        image.advance_or_mint(api).await;
    }
    Ok(())
}

async fn show_image(
    api: &BusinessApi,
    config: &ClientConfig,
    id: &BusinessId,
    profile: ImageProfile,
    verify: bool,
) -> Result<(), AppError> {
    let business = api.get_business(id).await?;
    let mut image = config.image_resolver(profile).resolve(&business);

    if verify {
        verify_image(api, &mut image).await?;
    }

    match image.url() {
        Some(url) => println!("{}", url),
        None => println!("(image unavailable)"),
    }
    for fallback in image.remaining() {
        println!("  fallback: {}", fallback);
    }
    Ok(())
}

/// Runs one subcommand against the backend.
async fn run(command: Command, config: &ClientConfig) -> Result<(), AppError> {
    let api = config.business_api()?;

    match command {
        Command::List {
            page,
            limit,
            bar,
            restaurant,
            price_level,
            query,
            max_pages,
        } => {
            let filter = BusinessFilter {
                is_bar: bar.then_some(true),
                is_restaurant: restaurant.then_some(true),
                price_level,
                query,
            };
            if page.is_some() {
                let businesses = api.list_businesses(page, limit, &filter).await?;
                print_businesses(&businesses);
                return Ok(());
            }

            let mut pager = api.pager(filter);
            if let Some(limit) = limit {
                pager = pager.with_page_size(limit);
            }
            let failed = pager.load_all(max_pages).await.is_err();
            print_businesses(pager.loaded());
            if failed {
                eprintln!("Failed to load venues. Run the command again to retry.");
            } else if let Some(e) = pager.last_error() {
                eprintln!("⚠️  Some venues could not be loaded: {}", e);
            }
        }
        Command::Get { id } => {
            let business = api.get_business(&BusinessId::parse(&id)?).await?;
            print_json(&business)?;
        }
        Command::Deals { day, today } => {
            let day = if today {
                use chrono::Datelike;
                Some(chrono::Local::now().weekday().num_days_from_sunday())
            } else {
                day
            };
            let businesses = api
                .businesses_with_deals(day)
                .await
                .or_empty("Loading deals");
            print_businesses(&businesses);
        }
        Command::Near { lat, lng, radius } => {
            let businesses = api
                .search_by_location(lat, lng, radius)
                .await
                .or_empty("Location search");
            print_businesses(&businesses);
        }
        Command::Category { category } => {
            let businesses = api
                .search_by_category(&category)
                .await
                .or_empty("Category search");
            print_businesses(&businesses);
        }
        Command::Photos { id } => {
            let photos = api.business_photos(&BusinessId::parse(&id)?).await?;
            print_json(&photos)?;
        }
        Command::Image {
            id,
            profile,
            verify,
        } => {
            show_image(&api, config, &BusinessId::parse(&id)?, profile, verify).await?;
        }
        Command::Health => {
            let health = api.health().await?;
            if health.is_healthy() {
                println!("✓ Backend is healthy ({})", health.status);
            } else {
                println!("⚠️  Backend reports status '{}'", health.status);
            }
        }
        Command::Stats => print_json(&api.admin_stats().await?)?,
        Command::CostReport => print_json(&api.cost_report().await?)?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = ClientConfig::resolve(&cli).context("invalid client configuration")?;
    log::debug!("Using backend {}", config.api_url);

    run(cli.command, &config).await?;

    Ok(())
}
