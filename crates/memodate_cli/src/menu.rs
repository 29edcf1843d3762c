//! Interactive numbered menu.
//!
//! # Responsibility
//! - Present the command list, parse selections and per-command input.
//! - Translate service errors into user-visible messages.
//!
//! # Invariants
//! - Malformed ids and dates are caught here; they never reach the
//!   service layer.
//! - Invalid selections redisplay the menu instead of crashing.

use log::warn;
use memodate_core::{
    format_date, parse_date, Celebration, CelebrationRepository, CelebrationService, Event,
    EventRepository, EventService,
};
use std::io::{self, BufRead, Write};

const COMMANDS: &[&str] = &[
    "List all memorable dates",
    "Add a memorable date",
    "Edit a memorable date",
    "Delete a memorable date",
    "Find memorable dates by day",
    "List celebrations of a memorable date",
    "Add a celebration",
    "Edit a celebration",
    "Delete a celebration",
    "Exit",
];

const DATE_PROMPT_SUFFIX: &str = "(in the form 12.05.2007)";

/// Runs the menu loop until the user exits or stdin is exhausted.
pub fn run<E: EventRepository, C: CelebrationRepository>(
    events: &EventService<E, C>,
    celebrations: &CelebrationService<E, C>,
) {
    loop {
        print_commands();
        let Some(input) = prompt("Choose a command:") else {
            break;
        };
        let choice = match parse_menu_choice(&input, COMMANDS.len()) {
            Ok(choice) => choice,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        if choice == COMMANDS.len() {
            println!("Bye!");
            break;
        }
        if dispatch(choice, events, celebrations).is_none() {
            break;
        }
    }
}

fn dispatch<E: EventRepository, C: CelebrationRepository>(
    choice: usize,
    events: &EventService<E, C>,
    celebrations: &CelebrationService<E, C>,
) -> Option<()> {
    match choice {
        1 => list_events(events),
        2 => add_event(events),
        3 => edit_event(events),
        4 => delete_event(events),
        5 => events_by_date(events),
        6 => event_celebrations(events),
        7 => add_celebration(celebrations),
        8 => edit_celebration(celebrations),
        9 => delete_celebration(celebrations),
        _ => Some(()),
    }
}

fn list_events<E: EventRepository, C: CelebrationRepository>(
    events: &EventService<E, C>,
) -> Option<()> {
    match events.get_all_events() {
        Ok(all) if all.is_empty() => println!("No memorable dates yet"),
        Ok(all) => {
            for event in &all {
                println!("{}", render_event(event));
            }
        }
        Err(err) => report_service_error(&err),
    }
    Some(())
}

fn add_event<E: EventRepository, C: CelebrationRepository>(
    events: &EventService<E, C>,
) -> Option<()> {
    let name = prompt("Enter the name of the memorable date:")?;
    let description = prompt("Enter the description:")?;
    let date_input = prompt(&format!("Enter the date {DATE_PROMPT_SUFFIX}:"))?;
    let date = match parse_date(&date_input) {
        Ok(date) => date,
        Err(err) => {
            eprintln!("{err}");
            return Some(());
        }
    };

    let mut event = Event::new(name, description, date);
    match events.add_event(&mut event) {
        Ok(id) => println!("Memorable date added with id {id}"),
        Err(err) => report_service_error(&err),
    }
    Some(())
}

fn edit_event<E: EventRepository, C: CelebrationRepository>(
    events: &EventService<E, C>,
) -> Option<()> {
    let Some(id) = prompt_id("Enter the memorable date id:")? else {
        return Some(());
    };
    let name = prompt("Enter the new name:")?;
    let description = prompt("Enter the new description:")?;
    let date_input = prompt(&format!("Enter the new date {DATE_PROMPT_SUFFIX}:"))?;
    let date = match parse_date(&date_input) {
        Ok(date) => date,
        Err(err) => {
            eprintln!("{err}");
            return Some(());
        }
    };

    match events.edit_event(id, name, description, date) {
        Ok(()) => println!("Memorable date updated"),
        Err(err) => report_service_error(&err),
    }
    Some(())
}

fn delete_event<E: EventRepository, C: CelebrationRepository>(
    events: &EventService<E, C>,
) -> Option<()> {
    let Some(id) = prompt_id("Enter the memorable date id:")? else {
        return Some(());
    };
    match events.delete_event_by_id(id) {
        Ok(()) => println!("Memorable date deleted"),
        Err(err) => report_service_error(&err),
    }
    Some(())
}

fn events_by_date<E: EventRepository, C: CelebrationRepository>(
    events: &EventService<E, C>,
) -> Option<()> {
    let date_input = prompt(&format!("Enter the date {DATE_PROMPT_SUFFIX}:"))?;
    let date = match parse_date(&date_input) {
        Ok(date) => date,
        Err(err) => {
            eprintln!("{err}");
            return Some(());
        }
    };

    match events.get_events_by_date(date) {
        Ok(found) if found.is_empty() => println!("No memorable dates on this day"),
        Ok(found) => {
            println!("Memorable dates on {}:", format_date(date));
            for event in &found {
                println!("{}", render_event(event));
            }
        }
        Err(err) => report_service_error(&err),
    }
    Some(())
}

fn event_celebrations<E: EventRepository, C: CelebrationRepository>(
    events: &EventService<E, C>,
) -> Option<()> {
    let Some(event_id) = prompt_id("Enter the memorable date id:")? else {
        return Some(());
    };
    match events.get_celebrations_by_event_id(event_id) {
        Ok(found) if found.is_empty() => println!("No celebrations for this memorable date"),
        Ok(found) => {
            for celebration in &found {
                println!("{}", render_celebration(celebration));
            }
        }
        Err(err) => report_service_error(&err),
    }
    Some(())
}

fn add_celebration<E: EventRepository, C: CelebrationRepository>(
    celebrations: &CelebrationService<E, C>,
) -> Option<()> {
    let Some(event_id) = prompt_id("Enter the memorable date id:")? else {
        return Some(());
    };
    let name = prompt("Enter the celebration name:")?;
    let description = prompt("Enter the celebration description:")?;
    let date_input = prompt(&format!("Enter the celebration date {DATE_PROMPT_SUFFIX}:"))?;
    let date = match parse_date(&date_input) {
        Ok(date) => date,
        Err(err) => {
            eprintln!("{err}");
            return Some(());
        }
    };
    let place = prompt("Enter the celebration place:")?;

    match celebrations.add_celebration(event_id, name, description, date, place) {
        Ok(id) => println!("Celebration added with id {id}"),
        Err(err) => report_service_error(&err),
    }
    Some(())
}

fn edit_celebration<E: EventRepository, C: CelebrationRepository>(
    celebrations: &CelebrationService<E, C>,
) -> Option<()> {
    let Some(id) = prompt_id("Enter the celebration id:")? else {
        return Some(());
    };
    let name = prompt("Enter the new name:")?;
    let description = prompt("Enter the new description:")?;
    let date_input = prompt(&format!("Enter the new date {DATE_PROMPT_SUFFIX}:"))?;
    let date = match parse_date(&date_input) {
        Ok(date) => date,
        Err(err) => {
            eprintln!("{err}");
            return Some(());
        }
    };
    let place = prompt("Enter the new place:")?;

    match celebrations.edit_celebration(id, name, description, date, place) {
        Ok(()) => println!("Celebration updated"),
        Err(err) => report_service_error(&err),
    }
    Some(())
}

fn delete_celebration<E: EventRepository, C: CelebrationRepository>(
    celebrations: &CelebrationService<E, C>,
) -> Option<()> {
    let Some(id) = prompt_id("Enter the celebration id:")? else {
        return Some(());
    };
    match celebrations.delete_celebration_by_id(id) {
        Ok(()) => println!("Celebration deleted"),
        Err(err) => report_service_error(&err),
    }
    Some(())
}

fn print_commands() {
    for (index, command) in COMMANDS.iter().enumerate() {
        println!("{}) {}", index + 1, command);
    }
}

/// Prints the prompt and reads one trimmed line.
///
/// Returns `None` when stdin is exhausted, which ends the menu loop.
fn prompt(message: &str) -> Option<String> {
    println!("{message}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(err) => {
            warn!("event=stdin_read module=cli status=error error={err}");
            None
        }
    }
}

/// Prompts for an id; `Some(None)` means the input was malformed and was
/// already reported.
fn prompt_id(message: &str) -> Option<Option<i64>> {
    let input = prompt(message)?;
    match parse_id(&input) {
        Ok(id) => Some(Some(id)),
        Err(message) => {
            eprintln!("{message}");
            Some(None)
        }
    }
}

fn parse_menu_choice(input: &str, command_count: usize) -> Result<usize, String> {
    let choice: usize = input
        .trim()
        .parse()
        .map_err(|_| "Invalid input format".to_string())?;
    if choice == 0 || choice > command_count {
        return Err("No such command".to_string());
    }
    Ok(choice)
}

fn parse_id(input: &str) -> Result<i64, String> {
    input
        .trim()
        .parse()
        .map_err(|_| "Invalid id format".to_string())
}

fn render_event(event: &Event) -> String {
    format!(
        "{}. {} - {} ({})",
        event.id.unwrap_or_default(),
        event.name,
        event.description,
        format_date(event.date)
    )
}

fn render_celebration(celebration: &Celebration) -> String {
    format!(
        "{}. {} - {} at {} ({})",
        celebration.id.unwrap_or_default(),
        celebration.name,
        celebration.description,
        celebration.place,
        format_date(celebration.date)
    )
}

fn report_service_error(err: &memodate_core::RepoError) {
    eprintln!("{err}");
}

#[cfg(test)]
mod tests {
    use super::{parse_id, parse_menu_choice, render_celebration, render_event, COMMANDS};
    use memodate_core::{parse_date, Celebration, Event};

    #[test]
    fn menu_choice_accepts_every_listed_command() {
        for number in 1..=COMMANDS.len() {
            assert_eq!(
                parse_menu_choice(&number.to_string(), COMMANDS.len()),
                Ok(number)
            );
        }
    }

    #[test]
    fn menu_choice_rejects_non_numeric_input() {
        assert_eq!(
            parse_menu_choice("exit", COMMANDS.len()),
            Err("Invalid input format".to_string())
        );
    }

    #[test]
    fn menu_choice_rejects_out_of_range_numbers() {
        assert_eq!(
            parse_menu_choice("0", COMMANDS.len()),
            Err("No such command".to_string())
        );
        assert_eq!(
            parse_menu_choice("11", COMMANDS.len()),
            Err("No such command".to_string())
        );
    }

    #[test]
    fn id_parsing_trims_and_rejects_garbage() {
        assert_eq!(parse_id(" 42 "), Ok(42));
        assert!(parse_id("forty-two").is_err());
    }

    #[test]
    fn event_rendering_uses_console_date_format() {
        let mut event = Event::new(
            "Conference",
            "Annual tech conference",
            parse_date("05.10.2025").unwrap(),
        );
        event.id = Some(7);
        assert_eq!(
            render_event(&event),
            "7. Conference - Annual tech conference (05.10.2025)"
        );
    }

    #[test]
    fn celebration_rendering_includes_place() {
        let mut celebration = Celebration::new(
            7,
            "Breakfast Meetup",
            "Morning networking breakfast",
            parse_date("05.10.2025").unwrap(),
            "Lobby",
        );
        celebration.id = Some(3);
        assert_eq!(
            render_celebration(&celebration),
            "3. Breakfast Meetup - Morning networking breakfast at Lobby (05.10.2025)"
        );
    }
}
