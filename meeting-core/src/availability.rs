//! Legal start hours and meeting durations for a business window.

use crate::BusinessWindow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartHour {
    pub hour: u32,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationChoice {
    pub minutes: u32,
    pub label: &'static str,
}

/// Every duration a meeting may last, shortest first.
pub const DURATIONS: [DurationChoice; 8] = [
    DurationChoice { minutes: 10, label: "10 minutes" },
    DurationChoice { minutes: 30, label: "30 minutes" },
    DurationChoice { minutes: 60, label: "1H" },
    DurationChoice { minutes: 90, label: "1H30" },
    DurationChoice { minutes: 120, label: "2H" },
    DurationChoice { minutes: 180, label: "3H" },
    DurationChoice { minutes: 240, label: "4H" },
    DurationChoice { minutes: 300, label: "5H" },
];

/// Hours a timed meeting may start at, ascending.
#[must_use]
pub fn legal_start_hours(window: &BusinessWindow) -> Vec<StartHour> {
    (window.start_hour()..window.end_hour())
        .map(|hour| StartHour {
            hour,
            label: format!("{hour}H"),
        })
        .collect()
}

/// Durations that keep a meeting starting at `start_hour` inside the window.
///
/// Without a start hour, or with one outside the window, nothing can be
/// chosen and the result is empty.
#[must_use]
pub fn legal_durations(window: &BusinessWindow, start_hour: Option<u32>) -> Vec<DurationChoice> {
    let Some(start_hour) = start_hour.filter(|&hour| window.contains_hour(hour)) else {
        return Vec::new();
    };

    let closing = window.end_hour() * 60;

    DURATIONS
        .into_iter()
        .filter(|choice| start_hour * 60 + choice.minutes <= closing)
        .collect()
}

/// Looks a duration up by its label (`1H30`) or by its length in minutes (`90`).
#[must_use]
pub fn duration_by_label(label: &str) -> Option<DurationChoice> {
    let label = label.trim();

    DURATIONS.into_iter().find(|choice| {
        choice.label.eq_ignore_ascii_case(label) || label.parse::<u32>().ok() == Some(choice.minutes)
    })
}
