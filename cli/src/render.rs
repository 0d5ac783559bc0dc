//! Text rendering of the calendar view-model.
//!
//! The grid is 7 cells wide starting on Sunday, mirroring the calendar the
//! dashboard renders: padding cells before day 1, one marker per active pill
//! per day, today's cell bracketed.

use std::fmt::Write;

use pill_tracker_core::{CalendarDay, CalendarMonth, DayType};
use shared::{DateKey, Pill};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Render the month grid. Each day cell shows the day number followed by one
/// marker per active pill: `*` given, `.` not given.
pub fn calendar(calendar: &CalendarMonth, today: DateKey) -> String {
    let pill_count = calendar
        .days
        .iter()
        .find(|d| d.day_type == DayType::MonthDay)
        .map(|d| d.doses.len())
        .unwrap_or(0);
    let width = (5 + pill_count).max(6);

    let mut out = String::new();
    let _ = writeln!(out, "{}", calendar.month);
    for name in WEEKDAYS {
        let _ = write!(out, "{name:<width$}");
    }
    out.push('\n');

    let today_here = calendar.month.contains(today);
    for week in calendar.days.chunks(7) {
        for cell in week {
            let _ = write!(out, "{:<width$}", render_cell(cell, today_here, today));
        }
        out.push('\n');
    }

    if pill_count == 0 {
        out.push_str("No pills added yet.\n");
    } else {
        out.push_str("Pills: ");
        let names: Vec<String> = calendar
            .days
            .iter()
            .find(|d| d.day_type == DayType::MonthDay)
            .map(|d| d.doses.iter().map(|dose| dose.pill_name.clone()).collect())
            .unwrap_or_default();
        out.push_str(&names.join(", "));
        out.push_str("  (* given, . not given)\n");
    }
    out
}

fn render_cell(cell: &CalendarDay, today_here: bool, today: DateKey) -> String {
    if cell.day_type == DayType::PaddingBefore {
        return String::new();
    }
    let day = if today_here && cell.day == today.day() {
        format!("[{:>2}]", cell.day)
    } else {
        format!(" {:>2} ", cell.day)
    };
    let markers: String = cell
        .doses
        .iter()
        .map(|dose| if dose.given { '*' } else { '.' })
        .collect();
    format!("{day}{markers}")
}

/// One pill per line, id first so it can be fed back into other commands.
pub fn pill_list(pills: &[&Pill]) -> String {
    if pills.is_empty() {
        return "No pills added yet.\n".to_string();
    }
    let mut out = String::new();
    for pill in pills {
        let note = if pill.active { "" } else { "  (inactive)" };
        let _ = writeln!(out, "{}  {}{}", pill.id, pill.name, note);
    }
    out
}
