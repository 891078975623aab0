//! The run command: execute a scrape for a list of names.

use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::names;
use crate::output::Formatter;
use blotter_domain::BookingRecord;
use blotter_export::{sort_records, write_csv_path, Statistics};
use blotter_portal::HttpPortal;
use blotter_scrape::{progress_channel, Aggregator, ProgressEvent, ScrapeConfig};
use std::fs;
use std::sync::Arc;

/// Execute portal searches for every name in the list and present the
/// consolidated results.
pub async fn execute_run(args: RunArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let queries = names::load_names(&args.names)?;

    let username = args.username.ok_or_else(|| {
        CliError::InvalidInput("portal username required (--username or BLOTTER_USERNAME)".into())
    })?;
    let password = args.password.ok_or_else(|| {
        CliError::InvalidInput("portal password required (--password or BLOTTER_PASSWORD)".into())
    })?;

    let scrape_config = ScrapeConfig {
        max_concurrency: args.workers.unwrap_or(config.search.max_workers),
        min_delay_secs: args.min_delay.unwrap_or(config.search.min_delay_secs),
        max_delay_secs: args.max_delay.unwrap_or(config.search.max_delay_secs),
    };

    let portal_url = args
        .portal_url
        .unwrap_or_else(|| config.portal_url.clone());
    let portal = HttpPortal::new(portal_url, username, password);

    tracing::info!(
        "Starting search for {} names with {} workers (delays {}-{}s)",
        queries.len(),
        scrape_config.max_concurrency,
        scrape_config.min_delay_secs,
        scrape_config.max_delay_secs
    );

    eprintln!(
        "{}",
        formatter.info(&format!("Searching {} name(s)...", queries.len()))
    );

    // Progress arrives as a push stream; print it as it comes.
    let (progress_tx, mut progress_rx) = progress_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = progress_rx.recv().await {
            match event {
                ProgressEvent::Status(line) => eprintln!("{}", line),
                ProgressEvent::TaskCompleted {
                    name,
                    completed,
                    total,
                    percent,
                    ..
                } => eprintln!("[{:3}%] {}/{} complete ({})", percent, completed, total, name),
                ProgressEvent::Finished { .. } => {}
            }
        }
    });

    let aggregator = Aggregator::new(scrape_config);
    let report = aggregator.run(Arc::new(portal), queries, progress_tx).await;
    printer.await.ok();

    let records = report.dataset.records();

    if let Some(path) = &args.output {
        if records.is_empty() {
            eprintln!("{}", formatter.warning("No data to export"));
        } else {
            write_csv_path(records, path)?;
            println!(
                "{}",
                formatter.success(&format!(
                    "Exported {} record(s) to {}",
                    records.len(),
                    path.display()
                ))
            );
        }
    }

    if let Some(path) = &args.report {
        fs::write(path, &report.combined_text)?;
        println!(
            "{}",
            formatter.success(&format!("Wrote text report to {}", path.display()))
        );
    }

    // Consumers read the dataset name-sorted, whatever order the tasks
    // completed in.
    let borrowed: Vec<&BookingRecord> = records.iter().collect();
    let sorted = sort_records(&borrowed, "Name", true);
    println!("{}", formatter.format_records(&sorted)?);

    let stats = Statistics::compute(records);
    println!("{}", formatter.format_statistics(&stats)?);

    Ok(())
}
