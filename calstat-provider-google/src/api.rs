//! Paged reads from the Google Calendar v3 REST API.
//!
//! Events are returned as raw JSON records so the core can validate them
//! field by field.

use anyhow::{Context, Result};
use calstat_core::{Calendar, DateRange};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::session::Session;

const API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Upper bound Google accepts for `maxResults` on event listings.
const MAX_RESULTS: &str = "2500";

/// One page of a list response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page {
    #[serde(default)]
    items: Vec<Value>,
    next_page_token: Option<String>,
}

/// An entry of the user's calendar list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    /// A user-chosen name overriding `summary`
    #[serde(default)]
    pub summary_override: Option<String>,
    #[serde(default)]
    pub primary: bool,
}

impl From<CalendarEntry> for Calendar {
    fn from(entry: CalendarEntry) -> Self {
        let name = entry.summary_override.or(entry.summary);
        Calendar::new(entry.id, name)
    }
}

pub struct GoogleApi {
    http: Client,
    access_token: String,
    base_url: String,
}

impl GoogleApi {
    pub fn new(access_token: impl Into<String>) -> Self {
        GoogleApi {
            http: Client::new(),
            access_token: access_token.into(),
            base_url: API_BASE.to_string(),
        }
    }

    pub fn for_session(session: &Session) -> Self {
        Self::new(session.access_token())
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid API base URL {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("API base URL cannot have path segments"))?
            .extend(segments);
        Ok(url)
    }

    /// Follow `nextPageToken` until the listing is exhausted.
    async fn list_all(&self, url: Url) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = url.clone();
            if let Some(token) = &page_token {
                request.query_pairs_mut().append_pair("pageToken", token);
            }

            debug!(url = %url, page = ?page_token, "Fetching page");

            let response = self
                .http
                .get(request)
                .bearer_auth(&self.access_token)
                .send()
                .await
                .with_context(|| format!("Request to {} failed", url.path()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                anyhow::bail!("Google API returned {} for {}: {}", status, url.path(), body);
            }

            let page: Page = response
                .json()
                .await
                .with_context(|| format!("Invalid response from {}", url.path()))?;

            items.extend(page.items);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(items)
    }

    pub async fn calendar_entries(&self) -> Result<Vec<CalendarEntry>> {
        let url = self.url(&["users", "me", "calendarList"])?;
        self.list_all(url)
            .await?
            .into_iter()
            .map(|item| serde_json::from_value(item).context("Malformed calendar list entry"))
            .collect()
    }

    pub async fn calendars(&self) -> Result<Vec<Calendar>> {
        Ok(self
            .calendar_entries()
            .await?
            .into_iter()
            .map(Calendar::from)
            .collect())
    }

    /// Raw event records of one calendar within `range`, recurring events
    /// expanded into single instances.
    pub async fn event_records(&self, calendar_id: &str, range: &DateRange) -> Result<Vec<Value>> {
        let url = self.events_url(calendar_id, range)?;
        let records = self
            .list_all(url)
            .await
            .with_context(|| format!("Failed to fetch events of {}", calendar_id))?;

        debug!(calendar = calendar_id, count = records.len(), "Fetched events");
        Ok(records)
    }

    fn events_url(&self, calendar_id: &str, range: &DateRange) -> Result<Url> {
        let mut url = self.url(&["calendars", calendar_id, "events"])?;
        url.query_pairs_mut()
            .append_pair("timeMin", &range.from_rfc3339())
            .append_pair("timeMax", &range.to_rfc3339())
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime")
            .append_pair("maxResults", MAX_RESULTS);
        Ok(url)
    }
}

/// The account email is the id of the primary calendar.
pub async fn primary_calendar_id(access_token: &str) -> Result<String> {
    GoogleApi::new(access_token)
        .calendar_entries()
        .await?
        .into_iter()
        .find(|entry| entry.primary)
        .map(|entry| entry.id)
        .ok_or_else(|| anyhow::anyhow!("No primary calendar found"))
}

pub async fn fetch_calendars(session: &Session) -> Result<Vec<Calendar>> {
    GoogleApi::for_session(session).calendars().await
}

pub async fn fetch_event_records(
    session: &Session,
    calendar_id: &str,
    range: &DateRange,
) -> Result<Vec<Value>> {
    GoogleApi::for_session(session)
        .event_records(calendar_id, range)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_events_url_escapes_calendar_id() {
        let api = GoogleApi::new("token");
        let range = DateRange {
            from: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            to: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        };

        let url = api
            .events_url("abc#holiday@group.v.calendar.google.com", &range)
            .unwrap();

        assert_eq!(
            url.path(),
            "/calendar/v3/calendars/abc%23holiday@group.v.calendar.google.com/events"
        );

        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(query.contains(&("singleEvents".into(), "true".into())));
        assert!(query.contains(&("orderBy".into(), "startTime".into())));
        assert!(query.contains(&("timeMin".into(), "2024-01-01T00:00:00+00:00".into())));
    }

    #[test]
    fn test_parse_page() {
        let page: Page = serde_json::from_str(
            r#"{ "items": [{ "id": "a" }, { "id": "b" }], "nextPageToken": "next" }"#,
        )
        .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.next_page_token.as_deref(), Some("next"));

        let last: Page = serde_json::from_str(r#"{ "kind": "calendar#events" }"#).unwrap();
        assert!(last.items.is_empty());
        assert!(last.next_page_token.is_none());
    }

    #[test]
    fn test_calendar_entry_name() {
        let entry: CalendarEntry = serde_json::from_str(
            r#"{ "id": "me@example.com", "summary": "Work", "summaryOverride": "Job", "primary": true }"#,
        )
        .unwrap();
        assert!(entry.primary);
        assert_eq!(Calendar::from(entry).name, "Job");

        let unnamed: CalendarEntry = serde_json::from_str(r#"{ "id": "x" }"#).unwrap();
        assert_eq!(Calendar::from(unnamed).name, "No Name");
    }
}
