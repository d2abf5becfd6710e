use std::fmt;
use std::str::FromStr;

use crate::models::{ApplicationRecord, Position, Status};

/// The coarse status pre-filter. Distinct from, and additive with, the
/// status filter: both may narrow on status at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    All,
    Status(Status),
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::All => f.pad("all"),
            Tab::Status(status) => f.pad(status.as_str()),
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Tab::All)
        } else {
            s.parse::<Status>().map(Tab::Status)
        }
    }
}

impl Tab {
    pub fn next(self) -> Tab {
        match self {
            Tab::All => Tab::Status(Status::ALL[0]),
            Tab::Status(status) => {
                let idx = Status::ALL.iter().position(|s| *s == status).unwrap_or(0);
                match Status::ALL.get(idx + 1) {
                    Some(next) => Tab::Status(*next),
                    None => Tab::All,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub tab: Tab,
    pub search: String,
    pub status: Option<Status>,
    pub position: Option<Position>,
}

fn matches(record: &ApplicationRecord, state: &FilterState) -> bool {
    if let Tab::Status(status) = state.tab {
        if record.status != status {
            return false;
        }
    }
    if !state.search.is_empty() {
        let term = state.search.to_lowercase();
        let hit = record.name.to_lowercase().contains(&term)
            || record.email.to_lowercase().contains(&term)
            || record.position.as_str().to_lowercase().contains(&term);
        if !hit {
            return false;
        }
    }
    if let Some(status) = state.status {
        if record.status != status {
            return false;
        }
    }
    if let Some(position) = state.position {
        if record.position != position {
            return false;
        }
    }
    true
}

/// Project the collection under the filter state. Pure and deterministic:
/// surviving records keep their original relative order.
pub fn apply(records: &[ApplicationRecord], state: &FilterState) -> Vec<ApplicationRecord> {
    records
        .iter()
        .filter(|record| matches(record, state))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, name: &str, position: Position, status: Status) -> ApplicationRecord {
        ApplicationRecord {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            contact: "0811111111".to_string(),
            position,
            status,
            applied_date: chrono::NaiveDate::from_ymd_opt(2023, 5, 1).unwrap(),
            interview_date: None,
            documents: Vec::new(),
            notes: Vec::new(),
        }
    }

    fn sample() -> Vec<ApplicationRecord> {
        vec![
            record(1, "John Doe", Position::FrontendDeveloper, Status::Lolos),
            record(2, "Jane Roe", Position::BackendDeveloper, Status::Pending),
            record(3, "Budi Santoso", Position::UiDesigner, Status::Wawancara),
            record(4, "Siti Rahma", Position::FrontendDeveloper, Status::Pending),
        ]
    }

    #[test]
    fn test_neutral_filter_is_identity() {
        let records = sample();
        let out = apply(&records, &FilterState::default());
        let ids: Vec<u64> = out.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_output_is_an_order_preserving_subsequence() {
        let records = sample();
        let state = FilterState {
            status: Some(Status::Pending),
            ..Default::default()
        };
        let out = apply(&records, &state);
        let ids: Vec<u64> = out.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_filtering_twice_changes_nothing() {
        let records = sample();
        let state = FilterState {
            tab: Tab::Status(Status::Pending),
            search: "e".to_string(),
            ..Default::default()
        };
        let once = apply(&records, &state);
        let twice = apply(&once, &state);
        let once_ids: Vec<u64> = once.iter().map(|r| r.id).collect();
        let twice_ids: Vec<u64> = twice.iter().map(|r| r.id).collect();
        assert_eq!(once_ids, twice_ids);
    }

    #[test]
    fn test_tab_hides_other_statuses() {
        let records = vec![record(1, "A", Position::FrontendDeveloper, Status::Pending)];
        let state = FilterState {
            tab: Tab::Status(Status::Lolos),
            ..Default::default()
        };
        assert!(apply(&records, &state).is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_across_name_email_position() {
        let records = sample();

        // "front" hits the position of records 1 and 4
        let state = FilterState {
            search: "front".to_string(),
            ..Default::default()
        };
        let ids: Vec<u64> = apply(&records, &state).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 4]);

        // name match, mixed case
        let state = FilterState {
            search: "jOhN".to_string(),
            ..Default::default()
        };
        assert_eq!(apply(&records, &state).len(), 1);

        // email match
        let state = FilterState {
            search: "jane.roe@".to_string(),
            ..Default::default()
        };
        assert_eq!(apply(&records, &state)[0].id, 2);
    }

    #[test]
    fn test_tab_and_status_filter_both_narrow() {
        let records = sample();
        // Tab narrows to pending, then the dropdown narrows to a different
        // status: nothing can satisfy both
        let state = FilterState {
            tab: Tab::Status(Status::Pending),
            status: Some(Status::Lolos),
            ..Default::default()
        };
        assert!(apply(&records, &state).is_empty());

        // Agreeing values behave like the tab alone
        let state = FilterState {
            tab: Tab::Status(Status::Pending),
            status: Some(Status::Pending),
            ..Default::default()
        };
        assert_eq!(apply(&records, &state).len(), 2);
    }

    #[test]
    fn test_position_filter_composes_with_search() {
        let records = sample();
        let state = FilterState {
            search: "e".to_string(),
            position: Some(Position::FrontendDeveloper),
            ..Default::default()
        };
        let out = apply(&records, &state);
        assert!(out.iter().all(|r| r.position == Position::FrontendDeveloper));
    }

    #[test]
    fn test_tab_cycles_through_every_status_and_back() {
        let mut tab = Tab::All;
        let mut seen = Vec::new();
        for _ in 0..6 {
            tab = tab.next();
            seen.push(tab);
        }
        assert_eq!(seen.last(), Some(&Tab::All));
        assert_eq!(seen.len() - 1, Status::ALL.len());
    }

    #[test]
    fn test_tab_parses_all_and_status_names() {
        assert_eq!("all".parse::<Tab>().unwrap(), Tab::All);
        assert_eq!("lolos".parse::<Tab>().unwrap(), Tab::Status(Status::Lolos));
        assert!("nope".parse::<Tab>().is_err());
    }
}
