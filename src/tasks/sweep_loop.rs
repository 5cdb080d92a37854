use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use crate::clients::calendar_gateway::CalendarGatewayClient;
use crate::clients::mail_gateway::MailGatewayClient;
use crate::service::span_extractor::SpanExtractor;
use crate::service::sweep_service;

pub async fn run_sweep_loop(
    mail: Arc<MailGatewayClient>,
    calendar: Arc<CalendarGatewayClient>,
    interval_secs: u64,
    window_days: i64,
) {
    let extractor = SpanExtractor::new();
    loop {
        match sweep_service::sweep_tick(mail.as_ref(), calendar.as_ref(), &extractor, window_days)
            .await
        {
            Ok(report) => println!(
                "Sweep finished: {} scanned, {} created.",
                report.scanned, report.created
            ),
            Err(err) => eprintln!("Sweep failed: {}", err),
        }
        sleep(Duration::from_secs(interval_secs)).await;
    }
}
