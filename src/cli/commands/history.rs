use super::open_tracker;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::session::DailySession;
use crate::ui::messages::info;
use crate::utils::colors::target_mark;
use crate::utils::date::weekday_initial;
use crate::utils::table::{Column, Table};
use crate::utils::time::{describe_target, format_hms};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::History { last, all } = cmd {
        let tracker = open_tracker(cfg)?;
        let history = &tracker.state().history;
        let target = tracker.workday_target_ms();

        if history.is_empty() {
            info("No sessions recorded yet.");
            return Ok(());
        }

        let window = if *all {
            history.entries()
        } else {
            history.recent_window(*last)
        };

        println!(
            "🗓️  Last {} of {} sessions (target {}):\n",
            window.len(),
            history.len(),
            describe_target(target)
        );
        print!("{}", render(window, target));

        let total: u64 = window.iter().map(|s| s.duration_ms).sum();
        println!("\nTotal: {}", format_hms(total));
    }

    Ok(())
}

/// Weekly-chart rows: date, weekday initial, hours with one decimal,
/// duration and whether the target was met.
pub fn render(sessions: &[DailySession], target_ms: u64) -> String {
    let mut table = Table::new(vec![
        Column::left("Date"),
        Column::left("Day"),
        Column::right("Hours"),
        Column::right("Duration"),
        Column::left("Target"),
    ]);

    for s in sessions {
        table.add_row(vec![
            s.date_str(),
            weekday_initial(s.date).to_string(),
            format!("{:.1}", s.hours()),
            format_hms(s.duration_ms),
            target_mark(s.meets_target(target_ms)),
        ]);
    }

    table.render()
}
