use salon_session::{BookingSession, Field, SubmissionOutcome};
use std::fmt::Write;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  set <field> <value>   name, phone, email, service, stylist, date, time, notes
  pick <n>              choose the n-th offered time
  slots                 list offered times
  show                  form, hold and status
  submit                book it
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set(Field, String),
    Pick(usize),
    Slots,
    Show,
    Submit,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// `None` for a blank line.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "set" => {
            let (name, value) = match rest.split_once(char::is_whitespace) {
                Some((name, value)) => (name, value.trim()),
                None => (rest, ""),
            };
            if name.is_empty() {
                return Err(CommandError::Usage("set <field> <value>"));
            }
            let field = Field::parse(name).ok_or_else(|| CommandError::UnknownField(name.to_string()))?;
            Command::Set(field, value.to_string())
        }
        "pick" => {
            let n = rest.parse::<usize>().map_err(|_| CommandError::Usage("pick <n>"))?;
            if n == 0 {
                return Err(CommandError::Usage("pick <n>"));
            }
            Command::Pick(n)
        }
        "slots" => Command::Slots,
        "show" => Command::Show,
        "submit" | "book" => Command::Submit,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub async fn execute(session: &mut BookingSession, command: Command) -> Flow {
    match command {
        Command::Set(field, value) => {
            session.set_field(field, &value).await;
            println!("{}", status_line(session));
        }
        Command::Pick(n) => {
            let value = n
                .checked_sub(1)
                .and_then(|i| session.view().time.real_options().nth(i))
                .map(|o| o.value.clone());
            match value {
                Some(value) => {
                    session.select_time(&value).await;
                    println!("Selected {}", value);
                }
                None => println!("No time #{}", n),
            }
        }
        Command::Slots => print!("{}", render_slots(session)),
        Command::Show => print!("{}", render_summary(session)),
        Command::Submit => {
            let outcome = session.submit().await;
            println!("{}", status_line(session));
            match outcome {
                SubmissionOutcome::Succeeded { redirect, .. } => {
                    println!("Continue at {}", redirect);
                    return Flow::Quit;
                }
                SubmissionOutcome::Conflict { .. } => print!("{}", render_slots(session)),
                _ => {}
            }
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}

pub fn status_line(session: &BookingSession) -> String {
    match session.view().status.error() {
        Some(error) => format!("! {}", error),
        None => session.view().status.status().to_string(),
    }
}

pub fn render_slots(session: &BookingSession) -> String {
    let mut out = String::new();
    for (i, option) in session.view().time.real_options().enumerate() {
        let _ = writeln!(out, "  {}. {}  ({})", i + 1, option.label, option.value);
    }
    if out.is_empty() {
        out.push_str("  No available times\n");
    }
    out
}

pub fn render_summary(session: &BookingSession) -> String {
    let form = session.form();
    let mut out = String::new();
    for field in Field::ALL {
        let marker = if field.is_required() { "*" } else { " " };
        let _ = writeln!(out, "{} {:<8} {}", marker, field.as_str(), form.get(field));
    }
    let hold = match session.hold() {
        Some(hold) => format!("held until {} ({})", hold.expires_at, session.view().hold_timer),
        None if session.view().hold_timer.is_empty() => "none".to_string(),
        None => session.view().hold_timer.clone(),
    };
    let _ = writeln!(out, "  hold     {}", hold);
    let _ = writeln!(out, "  status   {}", status_line(session));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set() {
        assert_eq!(
            parse("set name  Ana Maria ").unwrap(),
            Some(Command::Set(Field::Name, "Ana Maria".to_string()))
        );
        assert_eq!(parse("SET stylist").unwrap(), Some(Command::Set(Field::Stylist, String::new())));
        assert_eq!(parse("set colour red"), Err(CommandError::UnknownField("colour".to_string())));
        assert_eq!(parse("set"), Err(CommandError::Usage("set <field> <value>")));
    }

    #[test]
    fn test_parse_pick() {
        assert_eq!(parse("pick 2").unwrap(), Some(Command::Pick(2)));
        assert!(parse("pick 0").is_err());
        assert!(parse("pick two").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse("   ").unwrap(), None);
        assert_eq!(parse("book").unwrap(), Some(Command::Submit));
        assert_eq!(parse("exit").unwrap(), Some(Command::Quit));
        assert_eq!(parse("dance"), Err(CommandError::Unknown("dance".to_string())));
    }
}
