//! Month view-model for calendar rendering.
//!
//! Pure presentation shaping: the grid is 7 cells wide starting on Sunday,
//! padded before day 1, and every month day carries one dose status per
//! active pill. All business state stays in the registry and the log index.

use chrono::Datelike;

use shared::{Month, Pill};

use crate::log_index::LogIndex;

/// Per-pill administration status for one day cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoseStatus {
    pub pill_id: String,
    pub pill_name: String,
    pub given: bool,
}

/// Role of a cell in the 7-wide grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayType {
    /// Empty padding cell before the first day of the month.
    PaddingBefore,
    /// Actual day within the month.
    MonthDay,
}

/// A single cell. `day` is 0 for padding cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub day: u32,
    pub day_type: DayType,
    pub doses: Vec<DoseStatus>,
}

/// A month ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonth {
    pub month: Month,
    /// Weekday of day 1 (Sunday = 0); equals the number of padding cells.
    pub first_day_of_week: u32,
    pub days: Vec<CalendarDay>,
}

/// Build the view-model for `month` from the active pills and the loaded
/// log set.
pub fn build_month(month: Month, pills: &[&Pill], logs: &LogIndex) -> CalendarMonth {
    let first_day_of_week = month
        .first_day()
        .as_naive()
        .weekday()
        .num_days_from_sunday();

    let mut days = Vec::with_capacity((first_day_of_week + month.days()) as usize);
    for _ in 0..first_day_of_week {
        days.push(CalendarDay {
            day: 0,
            day_type: DayType::PaddingBefore,
            doses: Vec::new(),
        });
    }
    for day in 1..=month.days() {
        let doses = match month.day(day) {
            Some(date) => pills
                .iter()
                .map(|pill| DoseStatus {
                    pill_id: pill.id.clone(),
                    pill_name: pill.name.clone(),
                    given: logs.is_given(&pill.id, date),
                })
                .collect(),
            None => Vec::new(),
        };
        days.push(CalendarDay {
            day,
            day_type: DayType::MonthDay,
            doses,
        });
    }

    CalendarMonth {
        month,
        first_day_of_week,
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use shared::DateKey;

    fn pill(id: &str, name: &str) -> Pill {
        Pill {
            id: id.to_string(),
            name: name.to_string(),
            active: true,
        }
    }

    #[tokio::test]
    async fn grid_pads_to_the_first_weekday() {
        let store = MemoryStore::new();
        let mut logs = LogIndex::new(store.clone());
        let feb = Month::new(2024, 2).unwrap();
        logs.select_range(feb.range());
        logs.load_range(feb.range()).await.unwrap();

        let heartgard = pill("p1", "Heartgard");
        let calendar = build_month(feb, &[&heartgard], &logs);

        // 2024-02-01 is a Thursday.
        assert_eq!(calendar.first_day_of_week, 4);
        assert_eq!(calendar.days.len(), 4 + 29);
        assert!(calendar.days[..4]
            .iter()
            .all(|d| d.day_type == DayType::PaddingBefore && d.day == 0));
        assert_eq!(calendar.days[4].day, 1);
        assert_eq!(calendar.days.last().unwrap().day, 29);
    }

    #[tokio::test]
    async fn dose_flags_come_from_the_log_index() {
        let store = MemoryStore::new();
        store.seed_log("p1", DateKey::from_ymd(2024, 2, 10).unwrap(), "Sam");

        let mut logs = LogIndex::new(store.clone());
        let feb = Month::new(2024, 2).unwrap();
        logs.select_range(feb.range());
        logs.load_range(feb.range()).await.unwrap();

        let heartgard = pill("p1", "Heartgard");
        let apoquel = pill("p2", "Apoquel");
        let calendar = build_month(feb, &[&heartgard, &apoquel], &logs);

        let day10 = calendar
            .days
            .iter()
            .find(|d| d.day == 10 && d.day_type == DayType::MonthDay)
            .unwrap();
        assert_eq!(day10.doses.len(), 2);
        assert!(day10.doses[0].given);
        assert!(!day10.doses[1].given);

        let day11 = calendar.days.iter().find(|d| d.day == 11).unwrap();
        assert!(day11.doses.iter().all(|dose| !dose.given));
    }
}
