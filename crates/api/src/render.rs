//! Plain-text rendering of calendar views
//!
//! Month cells read `DD` followed by a one-letter marker for the dominant
//! state and `+` when secondary records or appointments exist on that day.

use std::fmt::Write as _;

use chrono::Datelike;
use cyclarc_core::calendar::{DayCell, MonthCell, MonthGrid, TimeGrid};
use cyclarc_core::{CalendarView, ClassTag, Classification};

const WEEKDAY_HEADER: &str = "Mo   Tu   We   Th   Fr   Sa   Su";

/// One-letter marker of the dominant state, `.` when there is none.
pub const fn marker(classification: &Classification) -> char {
    match classification.dominant {
        Some(ClassTag::Menses) => 'M',
        Some(ClassTag::Pregnancy(_)) => 'P',
        Some(ClassTag::Ovulation) => 'O',
        Some(ClassTag::Fertility) => 'F',
        Some(ClassTag::MensesExpectation) => 'E',
        _ => '.',
    }
}

fn has_extras(cell: &DayCell) -> bool {
    !cell.schedule.is_empty() || cell.classification.indicators.iter().any(|tag| tag.is_secondary())
}

/// Render `view` as plain text.
pub fn render_view(view: &CalendarView) -> String {
    match view {
        CalendarView::Month(grid) => render_month(grid),
        CalendarView::Week(grid) | CalendarView::Day(grid) => render_time_grid(grid),
    }
}

/// One line per week, dominant tag per day.
pub fn render_month(grid: &MonthGrid) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", grid.month_start.format("%B %Y"));
    let _ = writeln!(out, "{WEEKDAY_HEADER}");
    for row in &grid.rows {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| match cell {
                MonthCell::Blank => "    ".to_string(),
                MonthCell::Day(day) => format!(
                    "{:>2}{}{}",
                    day.date.day(),
                    marker(&day.classification),
                    if has_extras(day) { '+' } else { ' ' }
                ),
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join(" ").trim_end());
    }
    out
}

/// A block per day listing the occupied hour rows.
pub fn render_time_grid(grid: &TimeGrid) -> String {
    let mut out = String::new();
    for column in &grid.columns {
        let _ = writeln!(
            out,
            "{} [{}]",
            column.date.format("%a %Y-%m-%d"),
            marker(&column.classification)
        );
        for slot in &column.slots {
            if slot.schedule.is_empty() {
                continue;
            }
            let headings: Vec<String> = slot
                .schedule
                .iter()
                .map(|event| format!("{} {}", event.event_beginning.format("%H:%M"), event.heading))
                .collect();
            let _ = writeln!(out, "  {:02}:00  {}", slot.hour, headings.join(", "));
        }
    }
    out
}
