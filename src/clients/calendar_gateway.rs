use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::event::CalendarEvent;
use crate::service::sweep_service::EventSink;

#[derive(Debug, Serialize)]
struct CreateEventRequest {
    id: String,
    title: String,
    description: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Debug, Serialize)]
struct PurgeRequest {
    from: NaiveDateTime,
    to: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
struct PurgeResponse {
    deleted: usize,
}

/// Thin client for the calendar gateway's create and purge endpoints.
pub struct CalendarGatewayClient {
    base_url: String,
    api_token: String,
}

impl CalendarGatewayClient {
    pub fn new(base_url: String, api_token: String) -> Self {
        Self {
            base_url,
            api_token,
        }
    }

    async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let client = reqwest::Client::new();
        let response = client
            .post(format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?; // read the body once

        if !status.is_success() {
            println!("Error {}: {}", status, text);
            return Err(format!("Calendar request failed with status {}", status).into());
        }
        Ok(text)
    }
}

#[async_trait]
impl EventSink for CalendarGatewayClient {
    async fn create_event(&self, event: &CalendarEvent) -> Result<(), String> {
        let request = CreateEventRequest {
            id: Uuid::new_v4().to_string(),
            title: event.title.clone(),
            description: event.description.clone(),
            start: event.start,
            end: event.end,
        };
        self.post_json("/events", &request)
            .await
            .map(|_| ())
            .map_err(|e| format!("Calendar gateway error: {}", e))
    }

    async fn delete_events(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<usize, String> {
        let request = PurgeRequest { from, to };
        let text = self
            .post_json("/events/purge", &request)
            .await
            .map_err(|e| format!("Calendar gateway error: {}", e))?;
        let parsed: PurgeResponse = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse purge JSON: {}\nRaw body: {}", e, text))?;
        Ok(parsed.deleted)
    }
}
