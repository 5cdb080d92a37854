#![allow(non_snake_case)]

mod cli;

use std::env;
use std::sync::Arc;

use mailSweep::clients::calendar_gateway::CalendarGatewayClient;
use mailSweep::clients::mail_gateway::MailGatewayClient;
use mailSweep::config::AppConfig;
use mailSweep::runtime;

const DEFAULT_RUN_MODE: &str = "cli";

#[tokio::main]
async fn main() {
    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    };

    let get_prop = |key: &str| -> Option<String> {
        config.get(key).or_else(|| env::var(key).ok())
    };

    let mail = Arc::new(MailGatewayClient::new(
        get_prop("MAIL_GATEWAY_URL").expect("MAIL_GATEWAY_URL must be set"),
        get_prop("MAIL_GATEWAY_TOKEN").expect("MAIL_GATEWAY_TOKEN must be set"),
    ));
    let calendar = Arc::new(CalendarGatewayClient::new(
        get_prop("CALENDAR_GATEWAY_URL").expect("CALENDAR_GATEWAY_URL must be set"),
        get_prop("CALENDAR_GATEWAY_TOKEN").expect("CALENDAR_GATEWAY_TOKEN must be set"),
    ));

    let window_days: i64 = get_prop("SWEEP_WINDOW_DAYS")
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);

    let run_mode = get_prop("RUN_MODE").unwrap_or(DEFAULT_RUN_MODE.to_string());
    if run_mode == "api" {
        let port: u16 = get_prop("API_PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);
        let interval_secs: u64 = get_prop("SWEEP_INTERVAL_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(300);
        runtime::run_api(mail, calendar, port, interval_secs, window_days).await;
    } else if run_mode == "cli" {
        cli::cli(mail, calendar, window_days).await;
    } else {
        println!("Invalid run mode {}", run_mode);
    }
}
