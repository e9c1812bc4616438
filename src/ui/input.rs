//! Line-oriented command input

use std::io::{self, BufRead};

use clap::ValueEnum;
use colored::Colorize;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{
    catalog::{Catalog, PatternKey, SessionKey},
    tasks::{Command, DriverHandle},
};

/// A parsed line of user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Status,
    List,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  <Enter>, s, toggle     start or stop a session
  pattern <box|478|calm> choose the pattern for the next session
  session <60|180|300|continuous>
                         choose the session length for the next session
  status                 print the current state as JSON
  list                   print the available patterns and session lengths
  help                   show this message
  quit                   exit";

/// Parse a line typed by the user; an empty line is the primary action
pub fn parse_line(line: &str) -> Result<Input, String> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(Input::Command(Command::PrimaryAction));
    };
    let argument = words.next();

    match word.to_lowercase().as_str() {
        "s" | "toggle" => Ok(Input::Command(Command::PrimaryAction)),
        "p" | "pattern" => parse_key::<PatternKey>(argument, "pattern")
            .map(|key| Input::Command(Command::SelectPattern(key))),
        "l" | "length" | "session" => parse_key::<SessionKey>(argument, "session length")
            .map(|key| Input::Command(Command::SelectSession(key))),
        "status" => Ok(Input::Status),
        "list" => Ok(Input::List),
        "h" | "help" | "?" => Ok(Input::Help),
        "q" | "quit" | "exit" => Ok(Input::Quit),
        other => Err(format!("Unknown command: {} (type \"help\" for a list)", other)),
    }
}

fn parse_key<T: ValueEnum>(argument: Option<&str>, what: &str) -> Result<T, String> {
    let argument =
        argument.ok_or_else(|| format!("Missing {} (expected one of: {})", what, names::<T>()))?;

    T::from_str(argument, true).map_err(|_| {
        format!("Unknown {}: {} (expected one of: {})", what, argument, names::<T>())
    })
}

fn names<T: ValueEnum>() -> String {
    T::value_variants()
        .iter()
        .filter_map(|variant| variant.to_possible_value())
        .map(|value| value.get_name().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read stdin on a dedicated thread so a pending read never holds up shutdown
fn spawn_stdin_reader() -> mpsc::Receiver<io::Result<String>> {
    let (tx, rx) = mpsc::channel(16);

    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    rx
}

/// Forward commands typed on stdin to the driver until the user quits
pub async fn input_task(handle: DriverHandle) -> Result<(), String> {
    read_input(handle, spawn_stdin_reader()).await
}

/// Forward each line to the driver until the user quits or input ends
///
/// When input ends (EOF) while a session runs, including one started by a
/// command still in the driver's queue, waits for it to finish first.
pub async fn read_input(
    handle: DriverHandle,
    mut lines: mpsc::Receiver<io::Result<String>>,
) -> Result<(), String> {
    loop {
        let Some(line) = lines.recv().await else {
            info!("Input closed, waiting for any running session to finish");
            handle.wait_idle().await?;
            debug!("Input closed");
            return Ok(());
        };
        let line = line.map_err(|e| format!("Failed to read input: {}", e))?;

        match parse_line(&line) {
            Ok(Input::Command(command)) => handle.send(command)?,
            Ok(Input::Status) => {
                let json = serde_json::to_string_pretty(&handle.view())
                    .map_err(|e| format!("Failed to format status: {}", e))?;
                println!("{}", json);
            }
            Ok(Input::List) => {
                let json = serde_json::to_string_pretty(&Catalog::new())
                    .map_err(|e| format!("Failed to format catalog: {}", e))?;
                println!("{}", json);
            }
            Ok(Input::Help) => println!("{}", HELP),
            Ok(Input::Quit) => return Ok(()),
            Err(e) => println!("{}", e.red()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::{task::JoinHandle, time::Instant};

    use super::*;
    use crate::{
        state::{timing::SAMPLE_PERIOD, Coach},
        tasks::SessionDriver,
    };

    #[test]
    fn empty_line_toggles() {
        assert_eq!(parse_line(""), Ok(Input::Command(Command::PrimaryAction)));
        assert_eq!(parse_line("   "), Ok(Input::Command(Command::PrimaryAction)));
        assert_eq!(parse_line("s"), Ok(Input::Command(Command::PrimaryAction)));
    }

    #[test]
    fn selects_pattern_and_session() {
        assert_eq!(
            parse_line("pattern 478"),
            Ok(Input::Command(Command::SelectPattern(PatternKey::FourSevenEight)))
        );
        assert_eq!(
            parse_line("P Calm"),
            Ok(Input::Command(Command::SelectPattern(PatternKey::Calm)))
        );
        assert_eq!(
            parse_line("session continuous"),
            Ok(Input::Command(Command::SelectSession(SessionKey::Continuous)))
        );
        assert_eq!(
            parse_line("l 300"),
            Ok(Input::Command(Command::SelectSession(SessionKey::FiveMinutes)))
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = parse_line("pattern square").unwrap_err();
        assert!(err.contains("box, 478, calm"));

        let err = parse_line("session").unwrap_err();
        assert!(err.starts_with("Missing session length"));

        assert!(parse_line("dance").is_err());
    }

    fn spawn_driver(pattern: PatternKey, session: SessionKey) -> (JoinHandle<()>, DriverHandle) {
        let (driver, handle) = SessionDriver::new(Coach::new(pattern, session));
        (tokio::spawn(driver.run()), handle)
    }

    #[tokio::test(start_paused = true)]
    async fn eof_waits_for_queued_session() {
        let (task, handle) = spawn_driver(PatternKey::Box, SessionKey::OneMinute);
        let started = Instant::now();

        handle.send(Command::PrimaryAction).unwrap();
        let (tx, rx) = mpsc::channel(1);
        drop(tx);
        read_input(handle.clone(), rx).await.unwrap();

        assert!(started.elapsed() > Duration::from_secs(60));
        assert!(!handle.view().is_running());

        handle.shutdown().unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn eof_while_idle_returns_at_once() {
        let (task, handle) = spawn_driver(PatternKey::Box, SessionKey::OneMinute);
        let started = Instant::now();

        let (tx, rx) = mpsc::channel(1);
        drop(tx);
        read_input(handle.clone(), rx).await.unwrap();

        assert!(started.elapsed() < SAMPLE_PERIOD);

        handle.shutdown().unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn typed_lines_reach_the_driver() {
        let (task, handle) = spawn_driver(PatternKey::Box, SessionKey::Continuous);

        let (tx, rx) = mpsc::channel(4);
        for line in ["pattern calm", "session 60", ""] {
            tx.send(Ok(line.to_string())).await.unwrap();
        }
        drop(tx);
        read_input(handle.clone(), rx).await.unwrap();

        let view = handle.view();
        assert!(!view.is_running());
        assert_eq!(view.pattern, PatternKey::Calm);
        assert_eq!(view.session, SessionKey::OneMinute);

        handle.shutdown().unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn quit_returns_without_waiting() {
        let (task, handle) = spawn_driver(PatternKey::Calm, SessionKey::Continuous);

        let (tx, rx) = mpsc::channel(4);
        tx.send(Ok(String::new())).await.unwrap();
        tx.send(Ok("quit".to_string())).await.unwrap();
        read_input(handle.clone(), rx).await.unwrap();

        handle.shutdown().unwrap();
        task.await.unwrap();
        assert!(!handle.view().is_running());
    }

    #[test]
    fn other_inputs() {
        assert_eq!(parse_line("status"), Ok(Input::Status));
        assert_eq!(parse_line("list"), Ok(Input::List));
        assert_eq!(parse_line("?"), Ok(Input::Help));
        assert_eq!(parse_line("quit"), Ok(Input::Quit));
    }
}
