use crate::db::log::{LogRow, load_log};
use crate::errors::AppResult;
use ansi_term::Colour;
use rusqlite::Connection;

const OP_TARGET_WIDTH: usize = 40;

/// Colour for each audited operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "start" => Colour::Green,
        "stop" => Colour::Red,
        "complete" => Colour::Cyan,
        "mode" => Colour::Yellow,
        "setup" => Colour::Blue,
        "reset" => Colour::Fixed(196),
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51), // orange
        _ => Colour::White,
    }
}

fn op_target(row: &LogRow) -> String {
    if row.target.is_empty() {
        row.operation.clone()
    } else {
        format!("{} ({})", row.operation, row.target)
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let mut out: String = s.chars().take(width.saturating_sub(3)).collect();
        out.push_str("...");
        out
    } else {
        s.to_string()
    }
}

pub struct LogLogic;

impl LogLogic {
    /// Render the audit rows as aligned, coloured lines.
    pub fn render(rows: &[LogRow]) -> Vec<String> {
        let id_w = rows.iter().map(|r| r.id.to_string().len()).max().unwrap_or(1);
        let date_w = rows.iter().map(|r| r.date.len()).max().unwrap_or(10);
        let op_w = rows
            .iter()
            .map(|r| op_target(r).chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_TARGET_WIDTH);

        rows.iter()
            .map(|row| {
                let visible = truncate(&op_target(row), OP_TARGET_WIDTH);
                let padding = " ".repeat(op_w.saturating_sub(visible.chars().count()));

                // only the operation word is coloured
                let color = color_for_operation(&row.operation);
                let colored = match visible.split_once(' ') {
                    Some((op, rest)) => format!("{} {}", color.paint(op), rest),
                    None => color.paint(visible.as_str()).to_string(),
                };

                format!(
                    "{:>id_w$}: {:<date_w$} | {}{} => {}",
                    row.id,
                    row.date,
                    colored,
                    padding,
                    row.message,
                    id_w = id_w,
                    date_w = date_w
                )
            })
            .collect()
    }

    pub fn print_log(conn: &Connection, limit: Option<usize>) -> AppResult<()> {
        let rows = load_log(conn, limit)?;

        if rows.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        println!("📜 Internal log:\n");
        for line in Self::render(&rows) {
            println!("{}", line);
        }

        Ok(())
    }
}
