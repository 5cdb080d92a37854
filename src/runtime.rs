use std::sync::Arc;

use serde::Deserialize;
use warp::Filter;

use crate::clients::calendar_gateway::CalendarGatewayClient;
use crate::clients::mail_gateway::MailGatewayClient;
use crate::service::span_extractor::SpanExtractor;
use crate::service::sweep_service;
use crate::tasks::sweep_loop;
use crate::tasks::task_runner::TaskRunner;

const STATUS_PAGE: &str = "<html><body>\
<h1>mailSweep</h1>\
<p>The sweep loop is running.</p>\
<p>POST /sweep runs a mailbox sweep immediately. \
POST /extract with {\"text\": ...} parses a pasted email body.</p>\
</body></html>";

#[derive(Debug, Deserialize)]
struct ExtractRequest {
    text: String,
}

pub async fn run_api(
    mail: Arc<MailGatewayClient>,
    calendar: Arc<CalendarGatewayClient>,
    port: u16,
    interval_secs: u64,
    window_days: i64,
) {
    let mut task_runner = TaskRunner::new();
    task_runner.add_task("sweep loop", {
        let mail = mail.clone();
        let calendar = calendar.clone();
        move || {
            tokio::spawn(async move {
                sweep_loop::run_sweep_loop(mail, calendar, interval_secs, window_days).await;
            });
        }
    });
    task_runner.start_all();

    let status = warp::get()
        .and(warp::path::end())
        .map(|| warp::reply::html(STATUS_PAGE));

    let sweep_mail = mail.clone();
    let sweep_calendar = calendar.clone();
    let sweep = warp::post()
        .and(warp::path("sweep"))
        .and(warp::path::end())
        .and_then(move || {
            let mail = sweep_mail.clone();
            let calendar = sweep_calendar.clone();
            async move {
                let extractor = SpanExtractor::new();
                let payload = match sweep_service::sweep_tick(
                    mail.as_ref(),
                    calendar.as_ref(),
                    &extractor,
                    window_days,
                )
                .await
                {
                    Ok(report) => serde_json::to_value(&report)
                        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() })),
                    Err(err) => serde_json::json!({ "error": err }),
                };
                Ok::<_, warp::Rejection>(warp::reply::json(&payload))
            }
        });

    let extract = warp::post()
        .and(warp::path("extract"))
        .and(warp::path::end())
        .and(warp::body::json())
        .map(|request: ExtractRequest| {
            let extractor = SpanExtractor::new();
            let payload = match extractor.extract(&request.text) {
                Ok(Some(span)) => serde_json::json!({
                    "found": true,
                    "start": span.start,
                    "end": span.end,
                }),
                Ok(None) => serde_json::json!({ "found": false }),
                Err(err) => serde_json::json!({ "found": false, "error": err.to_string() }),
            };
            warp::reply::json(&payload)
        });

    let routes = status.or(sweep).or(extract);
    println!("Listening on port {}", port);
    warp::serve(routes).run(([0, 0, 0, 0], port)).await;
}
