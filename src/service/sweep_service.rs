use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use regex::Regex;
use serde::Serialize;

use crate::models::event::CalendarEvent;
use crate::models::message::EmailMessage;
use crate::service::span_extractor::SpanExtractor;

#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn recent_messages(&self, newer_than_days: i64) -> Result<Vec<EmailMessage>, String>;
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn create_event(&self, event: &CalendarEvent) -> Result<(), String>;
    async fn delete_events(&self, from: NaiveDateTime, to: NaiveDateTime)
    -> Result<usize, String>;
}

/// Counters for one pass over the mailbox.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub scanned: usize,
    pub skipped_keyword: usize,
    pub skipped_no_date: usize,
    pub failed: usize,
    pub created: usize,
}

pub fn event_keywords() -> Regex {
    Regex::new(r"(?i)(event|workshop|hackathon|ticket|exam|meeting|conference|webinar)")
        .expect("keyword pattern should compile")
}

/// One pass: fetch recent messages, keep the event-related ones, extract a
/// span from each body and hand the result to the sink.
///
/// A message that fails extraction or creation is logged and skipped; it
/// never aborts the rest of the batch. Only a source failure ends the tick.
pub async fn sweep_tick<S: MessageSource + ?Sized, C: EventSink + ?Sized>(
    source: &S,
    sink: &C,
    extractor: &SpanExtractor,
    newer_than_days: i64,
) -> Result<SweepReport, String> {
    let keywords = event_keywords();
    let messages = source.recent_messages(newer_than_days).await?;
    println!(
        "Found {} messages from the last {} day(s).",
        messages.len(),
        newer_than_days
    );

    let mut report = SweepReport::default();
    for message in &messages {
        report.scanned += 1;
        if !keywords.is_match(&message.combined_text()) {
            report.skipped_keyword += 1;
            continue;
        }
        println!("Processing message with subject: {}", message.subject);
        match extractor.extract(&message.body) {
            Ok(Some(span)) => {
                let event = CalendarEvent {
                    title: message.subject.clone(),
                    description: message.link.clone(),
                    start: span.start,
                    end: span.end,
                };
                match sink.create_event(&event).await {
                    Ok(()) => {
                        report.created += 1;
                        println!(
                            "Event created: {} from {} to {}",
                            event.title, event.start, event.end
                        );
                    }
                    Err(err) => {
                        report.failed += 1;
                        eprintln!("Failed to create event for message {}: {}", message.id, err);
                    }
                }
            }
            Ok(None) => {
                report.skipped_no_date += 1;
                println!("No date found in message {}.", message.id);
            }
            Err(err) => {
                report.failed += 1;
                eprintln!("Skipping message {} with unusable date: {}", message.id, err);
            }
        }
    }
    Ok(report)
}

/// Deletes every event in a year-back/year-forward window around `now`.
pub async fn purge_events<C: EventSink + ?Sized>(
    sink: &C,
    now: NaiveDateTime,
) -> Result<usize, String> {
    let from = now - Duration::days(365);
    let to = now + Duration::days(365);
    sink.delete_events(from, to).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_match_case_insensitively() {
        let keywords = event_keywords();
        assert!(keywords.is_match("Annual HACKATHON signup"));
        assert!(keywords.is_match("your ticket is attached"));
        assert!(keywords.is_match("Webinar: intro to soldering"));
    }

    #[test]
    fn unrelated_text_does_not_match() {
        let keywords = event_keywords();
        assert!(!keywords.is_match("lunch order for tomorrow"));
        assert!(!keywords.is_match("weekly newsletter digest"));
    }
}
