use std::process;

use chrono::NaiveDate;
use getopts::{Matches, Options};
use meeting_core::duration_by_label;
use meeting_scheduler::config::{parse_hour, Config};

pub enum Command {
    List,
    Hours,
    Durations(u32),
    Book {
        date: NaiveDate,
        title: String,
        /// Start hour and duration in minutes; all-day when absent.
        slot: Option<(u32, u32)>,
    },
}

pub struct Args {
    pub config: Config,
    pub command: Command,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "s",
        "store",
        "Base URL of the event store [Default: $MEETING_STORE_URL or http://127.0.0.1:5001]",
        "URL",
    );
    opts.optopt(
        "o",
        "open-hour",
        "First hour meetings may start at [Default: 8]",
        "HOUR",
    );
    opts.optopt(
        "c",
        "close-hour",
        "Hour by which meetings must be over [Default: 18]",
        "HOUR",
    );
    opts.optopt(
        "w",
        "weekdays",
        "Business days, comma separated [Default: mon,tue,wed,thu,fri]",
        "DAYS",
    );
    opts.optopt(
        "v",
        "view",
        "Calendar view used by `list`: month, week or day [Default: month]",
        "VIEW",
    );
    opts
}

fn usage(opts: &Options) -> String {
    let brief = format!(
        "Usage: {} [options] COMMAND\n\n\
         Commands:\n    \
         list                              List the events of the current view\n    \
         hours                             List the hours a meeting may start at\n    \
         durations HOUR                    List the durations available from HOUR\n    \
         book DATE TITLE [HOUR DURATION]   Book a meeting (all day without HOUR)",
        env!("CARGO_PKG_NAME")
    );
    opts.usage(&brief)
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{message}");
    process::exit(1);
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        println!("{}", usage(&opts));
        process::exit(0);
    }

    let config = match config(&matches) {
        Ok(config) => config,
        Err(err) => fail(format!("Invalid configuration: {err}")),
    };

    let command = match command(&matches.free, &config) {
        Some(command) => command,
        None => fail(usage(&opts)),
    };

    Args { config, command }
}

fn config(matches: &Matches) -> Result<Config, meeting_scheduler::config::ConfigError> {
    Config::from_options(
        matches.opt_str("store"),
        matches.opt_str("open-hour").as_deref(),
        matches.opt_str("close-hour").as_deref(),
        matches.opt_str("weekdays").as_deref(),
        matches.opt_str("view").as_deref(),
    )
}

/// Parses a start hour and checks it against the configured window.
fn start_hour(value: &str, config: &Config) -> u32 {
    let hour = parse_hour(value).unwrap_or_else(|err| fail(err));

    if !config.window.contains_hour(hour) {
        fail(format!(
            "Meetings start between {}H and {}H, not at {hour}H",
            config.window.start_hour(),
            config.window.end_hour() - 1
        ));
    }

    hour
}

fn command(free: &[String], config: &Config) -> Option<Command> {
    let (name, rest) = free.split_first()?;

    match (name.as_str(), rest) {
        ("list", []) => Some(Command::List),
        ("hours", []) => Some(Command::Hours),
        ("durations", [hour]) => Some(Command::Durations(start_hour(hour, config))),
        ("book", [date, title, slot @ ..]) => {
            let date = match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                Ok(date) => date,
                Err(err) => fail(format!("Provided date `{date}` is invalid: {err}")),
            };

            let slot = match slot {
                [] => None,
                [hour, duration] => {
                    let hour = start_hour(hour, config);
                    let Some(duration) = duration_by_label(duration) else {
                        fail(format!("Unknown meeting duration `{duration}`"));
                    };
                    Some((hour, duration.minutes))
                }
                _ => return None,
            };

            Some(Command::Book {
                date,
                title: title.clone(),
                slot,
            })
        }
        _ => None,
    }
}
