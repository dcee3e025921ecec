use std::{io, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use meeting_core::{to_ics, validate_title, Event};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub type Store = Arc<RwLock<Vec<Event>>>;

pub const EVENTS_PATH: &str = "/api/calendar/events";
pub const EVENT_PATH: &str = "/api/calendar/events/:id";
pub const ICS_PATH: &str = "/api/calendar.ics";

pub fn router(store: Store) -> Router {
    Router::new()
        .route(EVENTS_PATH, get(list_events).post(create_event))
        .route(EVENT_PATH, get(get_event))
        .route(ICS_PATH, get(export_calendar))
        .fallback(|| async { (StatusCode::NOT_FOUND, "Not found") })
        .with_state(store)
}

/// Serves the store on an already bound listener until the server fails.
pub async fn serve(listener: TcpListener, store: Store) -> io::Result<()> {
    axum::serve(listener, router(store)).await
}

async fn list_events(State(store): State<Store>) -> Json<Vec<Event>> {
    let mut events = store.read().await.clone();
    events.sort_by_key(|event| event.start.as_datetime());

    debug!(count = events.len(), "listing events");
    Json(events)
}

async fn get_event(State(store): State<Store>, Path(id): Path<String>) -> Response {
    let events = store.read().await;

    match events.iter().find(|event| event.id.as_deref() == Some(id.as_str())) {
        Some(event) => Json(event.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, format!("No event with id {id}")).into_response(),
    }
}

async fn create_event(State(store): State<Store>, Json(mut event): Json<Event>) -> Response {
    if let Err(message) = check_event(&event) {
        warn!(title = %event.title, %message, "rejected event");
        return (StatusCode::BAD_REQUEST, message).into_response();
    }

    let id = Uuid::new_v4().to_string();
    event.id = Some(id.clone());
    store.write().await.push(event.clone());

    info!(%id, title = %event.title, start = %event.start, "stored event");
    Json(event).into_response()
}

async fn export_calendar(State(store): State<Store>) -> Response {
    let events = store.read().await;

    (
        [("content-type", "text/calendar")],
        to_ics("Meetings", &events).to_string(),
    )
        .into_response()
}

fn check_event(event: &Event) -> Result<(), String> {
    validate_title(&event.title).map_err(|err| err.to_string())?;

    if !event.is_ordered() {
        return Err(format!(
            "Event ends ({}) before it starts ({})",
            event.end, event.start
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use meeting_core::EventTime;

    use super::*;

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn event(title: &str, day: u32, hour: u32) -> Event {
        Event {
            id: None,
            title: title.into(),
            start: EventTime::DateTime(march(day).and_hms_opt(hour, 0, 0).unwrap()),
            end: EventTime::DateTime(march(day).and_hms_opt(hour + 1, 0, 0).unwrap()),
            all_day: false,
        }
    }

    #[tokio::test]
    async fn create_assigns_ids_and_list_orders_by_start() {
        let store = Store::default();

        for (title, day) in [("Mercredi", 6), ("Lundi", 4)] {
            let response = create_event(State(store.clone()), Json(event(title, day, 9))).await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        let Json(events) = list_events(State(store.clone())).await;
        assert_eq!(
            events.iter().map(|e| e.title.as_str()).collect::<Vec<_>>(),
            ["Lundi", "Mercredi"]
        );
        assert!(events.iter().all(Event::is_persisted));
        assert_ne!(events[0].id, events[1].id);
    }

    #[tokio::test]
    async fn create_rejects_bad_titles_and_reversed_ranges() {
        let store = Store::default();

        let response = create_event(State(store.clone()), Json(event("Réu@nion", 4, 9))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let mut reversed = event("Sync", 4, 9);
        std::mem::swap(&mut reversed.start, &mut reversed.end);
        let response = create_event(State(store.clone()), Json(reversed)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert!(store.read().await.is_empty());
    }

    #[tokio::test]
    async fn get_finds_stored_events_by_id() {
        let store = Store::default();
        create_event(State(store.clone()), Json(event("Sync", 4, 9))).await;
        let id = store.read().await[0].id.clone().unwrap();

        let found = get_event(State(store.clone()), Path(id)).await;
        assert_eq!(found.status(), StatusCode::OK);

        let missing = get_event(State(store), Path("nope".to_string())).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn exports_calendar_as_ics() {
        let store = Store::default();
        store.write().await.push(Event {
            id: Some("1".into()),
            title: "Séminaire".into(),
            start: EventTime::Date(march(4)),
            end: EventTime::Date(march(4)),
            all_day: true,
        });

        let response = export_calendar(State(store)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/calendar"
        );
    }
}
