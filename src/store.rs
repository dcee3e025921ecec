use async_trait::async_trait;
use meeting_core::Event;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, warn};

use crate::error::StoreError;

pub const EVENTS_PATH: &str = "/api/calendar/events";

/// Remote collection of events.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Event>, StoreError>;

    /// Persists `event` and returns it as stored.
    async fn create(&self, event: &Event) -> Result<Event, StoreError>;
}

/// [`EventStore`] speaking JSON over HTTP. Failed requests are not retried.
#[derive(Debug, Clone)]
pub struct HttpEventStore {
    client: Client,
    endpoint: String,
}

impl HttpEventStore {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{EVENTS_PATH}", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EventStore for HttpEventStore {
    async fn list(&self) -> Result<Vec<Event>, StoreError> {
        debug!(endpoint = %self.endpoint, "fetching events");

        let response = self.client.get(&self.endpoint).send().await?;
        let body = ok_body(response).await?;
        let events: Vec<Event> = serde_json::from_str(&body)?;

        debug!(count = events.len(), "fetched events");
        Ok(events)
    }

    async fn create(&self, event: &Event) -> Result<Event, StoreError> {
        debug!(endpoint = %self.endpoint, title = %event.title, "creating event");

        let response = self.client.post(&self.endpoint).json(event).send().await?;
        let body = ok_body(response).await?;

        // The body is optional; without it the submitted event stands in.
        Ok(serde_json::from_str(&body).unwrap_or_else(|_| event.clone()))
    }
}

async fn ok_body(response: Response) -> Result<String, StoreError> {
    let status = response.status();
    let body = response.text().await?;

    if status != StatusCode::OK {
        warn!(%status, %body, "event store request failed");
        return Err(StoreError::Status {
            status: status.as_u16(),
            message: body,
        });
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use meeting_core::EventTime;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn sync_event() -> Event {
        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        Event {
            id: None,
            title: "Sync".into(),
            start: EventTime::DateTime(day.and_hms_opt(9, 0, 0).unwrap()),
            end: EventTime::DateTime(day.and_hms_opt(9, 30, 0).unwrap()),
            all_day: false,
        }
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let store = HttpEventStore::new("https://localhost:5001/");
        assert_eq!(
            store.endpoint(),
            "https://localhost:5001/api/calendar/events"
        );
    }

    #[tokio::test]
    async fn list_parses_events() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(EVENTS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "1", "title": "Réunion", "start": "2024-03-04", "end": "2024-03-04", "allDay": true},
                {"id": "2", "title": "Sync", "start": "2024-03-04T09:00:00", "end": "2024-03-04T09:30:00", "allDay": false}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let events = HttpEventStore::new(&mock_server.uri()).list().await.unwrap();

        assert_eq!(events.len(), 2);
        assert!(events[0].all_day);
        assert_eq!(events[1].id.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn list_reports_non_ok_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(EVENTS_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&mock_server)
            .await;

        let err = HttpEventStore::new(&mock_server.uri())
            .list()
            .await
            .unwrap_err();

        match err {
            StoreError::Status { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn list_reports_garbage_payload() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(EVENTS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&mock_server)
            .await;

        let err = HttpEventStore::new(&mock_server.uri())
            .list()
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[tokio::test]
    async fn create_posts_event_without_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(EVENTS_PATH))
            .and(body_json(serde_json::json!({
                "title": "Sync",
                "start": "2024-03-04T09:00:00",
                "end": "2024-03-04T09:30:00",
                "allDay": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "abc",
                "title": "Sync",
                "start": "2024-03-04T09:00:00",
                "end": "2024-03-04T09:30:00",
                "allDay": false
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let stored = HttpEventStore::new(&mock_server.uri())
            .create(&sync_event())
            .await
            .unwrap();

        assert_eq!(stored.id.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn create_falls_back_to_submitted_event_on_empty_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(EVENTS_PATH))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let stored = HttpEventStore::new(&mock_server.uri())
            .create(&sync_event())
            .await
            .unwrap();

        assert_eq!(stored, sync_event());
    }

    #[tokio::test]
    async fn create_surfaces_rejection_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(EVENTS_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_string("meeting title is empty"))
            .mount(&mock_server)
            .await;

        let err = HttpEventStore::new(&mock_server.uri())
            .create(&sync_event())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "event store answered 400: meeting title is empty"
        );
    }
}
