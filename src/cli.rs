use std::sync::Arc;

use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Text};

use mailSweep::clients::calendar_gateway::CalendarGatewayClient;
use mailSweep::clients::mail_gateway::MailGatewayClient;
use mailSweep::service::span_extractor::SpanExtractor;
use mailSweep::service::sweep_service;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Sweep {
        #[arg(long)]
        days: Option<i64>,
    },
    Extract {
        text: Option<String>,
    },
    Purge {},
}

pub async fn cli(
    mail: Arc<MailGatewayClient>,
    calendar: Arc<CalendarGatewayClient>,
    default_window_days: i64,
) {
    // Fine to panic here
    let cli = Cli::parse();
    match &cli.command {
        Commands::Sweep { days } => {
            let extractor = SpanExtractor::new();
            let window = days.unwrap_or(default_window_days);
            match sweep_service::sweep_tick(mail.as_ref(), calendar.as_ref(), &extractor, window)
                .await
            {
                Ok(report) => println!(
                    "Sweep finished: {} scanned, {} created, {} without dates, {} failed.",
                    report.scanned, report.created, report.skipped_no_date, report.failed
                ),
                Err(e) => println!("Failed to sweep mailbox: {}", e),
            }
        }
        Commands::Extract { text } => {
            if let Err(e) = extract_from_input(text.clone()) {
                println!("Failed to extract span: {}", e);
            }
        }
        Commands::Purge {} => {
            if let Err(e) = purge_with_confirmation(calendar.as_ref()).await {
                println!("Failed to purge events: {}", e);
            }
        }
    }
}

fn extract_from_input(text: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let input = match text {
        Some(value) => value,
        None => Text::new("Paste the email text.").prompt()?,
    };
    let extractor = SpanExtractor::new();
    match extractor.extract(&input) {
        Ok(Some(span)) => println!("Start: {}\nEnd:   {}", span.start, span.end),
        Ok(None) => println!("No date found in the text."),
        Err(e) => println!("A date pattern matched but the date itself is unusable: {}", e),
    }
    Ok(())
}

async fn purge_with_confirmation(
    calendar: &CalendarGatewayClient,
) -> Result<(), Box<dyn std::error::Error>> {
    let confirmed = Confirm::new("Delete every event within a year of today?")
        .with_default(false)
        .prompt()?;
    if !confirmed {
        println!("Purge canceled.");
        return Ok(());
    }
    let now = Local::now().naive_local();
    let deleted = sweep_service::purge_events(calendar, now)
        .await
        .map_err(|e| -> Box<dyn std::error::Error> { e.into() })?;
    println!("Number of events deleted: {}", deleted);
    Ok(())
}
