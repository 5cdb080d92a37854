use serde::{Deserialize, Serialize};

/// One mailbox message as returned by the mail gateway.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EmailMessage {
    pub id: String,
    pub subject: String,
    pub body: String,
    /// Permalink back to the message, used as the created event's description.
    pub link: String,
}

impl EmailMessage {
    // Keyword screening looks at subject and body as one blob.
    pub fn combined_text(&self) -> String {
        format!("{}{}", self.subject, self.body)
    }
}
