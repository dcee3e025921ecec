mod cli;

use std::{env, io, process};

use chrono::{Local, NaiveDate};
use meeting_core::{legal_durations, legal_start_hours, Event, SelectionRange, SessionError};
use meeting_scheduler::{
    CalendarController, Config, ControllerError, EventGrid, GridRenderer, HttpEventStore,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cli::Command;

type Controller = CalendarController<HttpEventStore, EventGrid>;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli::Args { config, command } = cli::parse(env::args().skip(1).collect());

    match command {
        Command::Hours => {
            for hour in legal_start_hours(&config.window) {
                println!("{}", hour.label);
            }
        }
        Command::Durations(hour) => {
            for choice in legal_durations(&config.window, Some(hour)) {
                println!("{}\t{} min", choice.label, choice.minutes);
            }
        }
        Command::List => {
            let mut controller = controller(config);
            if let Err(err) = controller.refresh().await {
                eprintln!("Failed to load events: {err}");
                process::exit(1);
            }
            print_grid(controller.renderer());
        }
        Command::Book { date, title, slot } => {
            let mut controller = controller(config);
            if let Err(err) = controller.refresh().await {
                warn!(error = %err, "booking without the current events");
            }

            match book(&mut controller, date, title, slot).await {
                Ok(event) => println!("Booked {}", describe(&event)),
                Err(ControllerError::Session(SessionError::InvalidDraft)) => {
                    explain_invalid(&controller);
                    process::exit(1);
                }
                Err(err) => {
                    eprintln!("Failed to book meeting: {err}");
                    process::exit(1);
                }
            }
        }
    }
}

fn controller(config: Config) -> Controller {
    let mut grid = EventGrid::new(Local::now().date_naive());
    grid.set_view(config.view);

    CalendarController::new(HttpEventStore::new(&config.store_url), grid, config.window)
}

async fn book(
    controller: &mut Controller,
    date: NaiveDate,
    title: String,
    slot: Option<(u32, u32)>,
) -> Result<Event, ControllerError> {
    controller.on_date_select(SelectionRange::all_day(date, date))?;

    let session = controller.session_mut();
    session.set_title(title)?;

    if let Some((hour, minutes)) = slot {
        session.set_all_day(false)?;
        session.set_start_hour(Some(hour))?;
        session.set_duration(Some(minutes))?;
    }

    controller.on_confirm().await
}

fn explain_invalid(controller: &Controller) {
    let session = controller.session();

    if let Some(err) = session.title_error() {
        eprintln!("Cannot book meeting: {err}");
        return;
    }

    let start_hour = session.draft().and_then(|draft| draft.start_hour());

    if !start_hour.is_some_and(|hour| session.window().contains_hour(hour)) {
        let hours = session
            .start_hours()
            .into_iter()
            .map(|hour| hour.label)
            .collect::<Vec<_>>();
        eprintln!(
            "Cannot book meeting: start hour must be one of {}",
            hours.join(", ")
        );
    } else {
        let durations = session
            .durations()
            .iter()
            .map(|choice| choice.label)
            .collect::<Vec<_>>();
        eprintln!(
            "Cannot book meeting: duration must be one of {}",
            durations.join(", ")
        );
    }
}

fn print_grid(grid: &EventGrid) {
    let range = grid.visible_range();
    println!("{} view, {} to {}", grid.view(), range.start, range.end);

    for event in grid.visible_events() {
        println!("  {}", describe(event));
    }
}

fn describe(event: &Event) -> String {
    if event.all_day {
        format!("{} (all day {})", event.title, event.start)
    } else {
        format!("{} ({} to {})", event.title, event.start, event.end)
    }
}
