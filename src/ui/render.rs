//! Line renderer for the terminal display

use std::io::IsTerminal;

use colored::Colorize;
use tokio::sync::watch;
use tracing::debug;

use crate::{catalog::Phase, state::CoachView};

/// Number of cells in the text progress ring
pub const RING_WIDTH: usize = 20;

/// Text rendition of the progress ring, filled proportionally to `progress`
pub fn ring_bar(progress: f64, width: usize) -> String {
    let progress = progress.clamp(0.0, 1.0);
    let filled = ((width as f64) * progress).round() as usize;

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format whole seconds as m:ss
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn paint(label: &str, phase: Phase, color: bool) -> String {
    if !color {
        return label.to_string();
    }

    match phase {
        Phase::Inhale => label.cyan().bold().to_string(),
        Phase::Hold => label.yellow().bold().to_string(),
        Phase::Exhale => label.green().bold().to_string(),
    }
}

/// Render one display line for `view`
pub fn render_line(view: &CoachView, color: bool) -> String {
    let bar = ring_bar(view.ring_progress, RING_WIDTH);

    if !view.is_running() {
        let pattern = view.pattern.pattern().label;
        let session = view.session.option().label;
        return format!("{}  [{}]  {}, {}", view.caption(), bar, pattern, session);
    }

    let mut line = format!("{} {}", paint(view.caption(), view.phase, color), view.countdown);
    if view.is_transitioning {
        line.push_str(&format!(
            " > {} {}",
            paint(view.next_caption(), view.next_phase, color),
            view.next_countdown
        ));
    }
    line.push_str(&format!("  [{}]", bar));

    match view.session_remaining_secs {
        Some(_) if view.stop_at_cycle_end => line.push_str("  finishing cycle"),
        Some(secs) => line.push_str(&format!("  {} left", format_clock(secs))),
        None => line.push_str("  continuous"),
    }

    line
}

/// Print a line whenever the rendered view changes, until the driver closes
pub async fn render_task(mut views: watch::Receiver<CoachView>) {
    let color = std::io::stdout().is_terminal();
    let mut last = String::new();

    loop {
        let line = render_line(&views.borrow_and_update(), color);
        if line != last {
            println!("{}", line);
            last = line;
        }

        if views.changed().await.is_err() {
            debug!("View channel closed, renderer exiting");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::{
        catalog::{PatternKey, SessionKey},
        state::Coach,
    };

    #[test]
    fn ring_bar_fills_proportionally() {
        assert_eq!(ring_bar(1.0, 4), "████");
        assert_eq!(ring_bar(0.5, 4), "██░░");
        assert_eq!(ring_bar(0.0, 4), "░░░░");
        assert_eq!(ring_bar(3.0, 2), "██");
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(59), "0:59");
        assert_eq!(format_clock(180), "3:00");
    }

    #[test]
    fn idle_line_shows_selection() {
        let coach = Coach::new(PatternKey::Calm, SessionKey::Continuous);
        let line = render_line(&coach.view(Instant::now()), false);

        let ring = "█".repeat(RING_WIDTH);
        assert_eq!(
            line,
            format!("Take a breath  [{}]  Calm (5 in, 5 out), Continuous", ring)
        );
    }

    #[test]
    fn running_line_shows_countdown_and_time_left() {
        let start = Instant::now();
        let mut coach = Coach::new(PatternKey::Box, SessionKey::OneMinute);
        coach.start(start);

        let line = render_line(&coach.view(start + Duration::from_millis(1_500)), false);

        assert!(line.starts_with("Inhale 3  ["));
        assert!(line.ends_with("0:59 left"));
    }

    #[test]
    fn crossfade_line_shows_both_phases() {
        let start = Instant::now();
        let mut coach = Coach::new(PatternKey::Calm, SessionKey::Continuous);
        coach.start(start);
        coach.tick(start + Duration::from_millis(4_500));

        let line = render_line(&coach.view(start + Duration::from_millis(4_600)), false);

        assert!(line.starts_with("Inhale 1 > Exhale 5  ["));
        assert!(line.ends_with("continuous"));
    }
}
