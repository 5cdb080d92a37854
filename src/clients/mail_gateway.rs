use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::message::EmailMessage;
use crate::service::sweep_service::MessageSource;

#[derive(Debug, Serialize)]
struct SearchRequest {
    query: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    messages: Vec<MessageRecord>,
}

#[derive(Debug, Deserialize)]
struct MessageRecord {
    id: String,
    subject: String,
    body: String,
}

/// Thin client for the mail gateway's search endpoint.
pub struct MailGatewayClient {
    base_url: String,
    api_token: String,
}

impl MailGatewayClient {
    pub fn new(base_url: String, api_token: String) -> Self {
        Self {
            base_url,
            api_token,
        }
    }

    async fn search(
        &self,
        query: String,
    ) -> Result<Vec<EmailMessage>, Box<dyn std::error::Error + Send + Sync>> {
        let request = SearchRequest { query };
        let client = reqwest::Client::new();
        let response = client
            .post(format!("{}/messages/search", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?; // read the body once

        if !status.is_success() {
            println!("Error {}: {}", status, text);
            return Err(format!("Search request failed with status {}", status).into());
        }

        let parsed: SearchResponse = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse search JSON: {}\nRaw body: {}", e, text))?;

        Ok(parsed
            .messages
            .into_iter()
            .map(|record| EmailMessage {
                link: format!("{}/messages/{}", self.base_url, record.id),
                id: record.id,
                subject: record.subject,
                body: record.body,
            })
            .collect())
    }
}

#[async_trait]
impl MessageSource for MailGatewayClient {
    async fn recent_messages(&self, newer_than_days: i64) -> Result<Vec<EmailMessage>, String> {
        self.search(format!("newer_than:{}d", newer_than_days))
            .await
            .map_err(|e| format!("Mail gateway error: {}", e))
    }
}
