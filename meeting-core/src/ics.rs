use std::borrow::Cow;

use ics::{
    components::Parameter,
    properties::{DtEnd, DtStart, Summary},
    ICalendar,
};

use crate::{Event, EventTime};

/// Builds an iCalendar document holding every event. Times are written as
/// floating local times.
#[must_use]
pub fn to_ics<'a, S: Into<Cow<'a, str>>>(name: S, events: &'a [Event]) -> ICalendar<'a> {
    let mut icalendar = ICalendar::new("2.0", name);

    for event in events {
        icalendar.add_event(event.to_ics());
    }

    icalendar
}

impl Event {
    #[must_use]
    pub fn to_ics(&self) -> ics::Event<'_> {
        let (start, end) = if self.all_day {
            let start = self.start.date();
            // Stored ends are inclusive, DTEND is exclusive for whole days.
            let last = self.end.date().max(start);
            let end = last.succ_opt().unwrap_or(last);
            (
                start.format("%Y%m%d").to_string(),
                end.format("%Y%m%d").to_string(),
            )
        } else {
            (format_date_time(&self.start), format_date_time(&self.end))
        };

        let id = match &self.id {
            Some(id) => id.clone(),
            None => format!("{}_{}", start, self.title.replace(' ', "-")),
        };

        let mut ics_event = ics::Event::new(id, start.clone());

        let mut dtstart = DtStart::new(start);
        let mut dtend = DtEnd::new(end);

        if self.all_day {
            dtstart.add(Parameter::new("VALUE", "DATE"));
            dtend.add(Parameter::new("VALUE", "DATE"));
        }

        ics_event.push(dtstart);
        ics_event.push(dtend);
        ics_event.push(Summary::new(&self.title));

        ics_event
    }
}

fn format_date_time(time: &EventTime) -> String {
    time.as_datetime().format("%Y%m%dT%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};

    use super::*;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    #[test]
    fn exports_timed_and_all_day_events() {
        let events = vec![
            Event {
                id: Some("abc".into()),
                title: "Sync".into(),
                start: EventTime::DateTime(monday().and_hms_opt(9, 0, 0).unwrap()),
                end: EventTime::DateTime(monday().and_hms_opt(10, 30, 0).unwrap()),
                all_day: false,
            },
            Event {
                id: None,
                title: "Séminaire annuel".into(),
                start: EventTime::Date(monday()),
                end: EventTime::Date(monday()),
                all_day: true,
            },
            Event {
                id: Some("retraite".into()),
                title: "Retraite".into(),
                start: EventTime::Date(monday() + Days::new(7)),
                end: EventTime::Date(monday() + Days::new(8)),
                all_day: true,
            },
        ];

        let output = to_ics("Réunions", &events).to_string();

        assert!(output.contains("BEGIN:VCALENDAR"));
        assert!(output.contains("UID:abc"));
        assert!(output.contains("DTSTART:20240304T090000"));
        assert!(output.contains("DTEND:20240304T103000"));
        assert!(output.contains("UID:20240304_Séminaire-annuel"));
        assert!(output.contains("DTSTART;VALUE=DATE:20240304"));
        assert!(output.contains("DTEND;VALUE=DATE:20240305"));
        assert!(output.contains("DTSTART;VALUE=DATE:20240311"));
        assert!(output.contains("DTEND;VALUE=DATE:20240313"));
        assert!(!output.contains("DTEND;VALUE=DATE:20240312"));
    }
}
