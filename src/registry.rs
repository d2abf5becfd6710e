use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{ApplicationDraft, ApplicationRecord, Note, Position, Status};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The ordered, in-memory collection of application records. Ids come from a
/// strictly monotonic counter, so a removed id is never handed out again.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApplicationStore {
    records: Vec<ApplicationRecord>,
    next_id: u64,
}

impl Default for ApplicationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationStore {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    pub fn from_records(records: Vec<ApplicationRecord>) -> Self {
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        Self { records, next_id }
    }

    /// The demo collection a fresh installation starts with.
    pub fn with_sample_data() -> Self {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
        Self::from_records(vec![ApplicationRecord {
            id: 1,
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            contact: "08123456789".to_string(),
            position: Position::FrontendDeveloper,
            status: Status::Lolos,
            applied_date: date(2023, 5, 1),
            interview_date: Some(date(2023, 5, 15)),
            documents: vec![
                "CV_JohnDoe.pdf".to_string(),
                "Portfolio_JohnDoe.pdf".to_string(),
            ],
            notes: vec![
                Note {
                    text: "Strong React skills".to_string(),
                    author: "HR Team".to_string(),
                    date: date(2023, 5, 10),
                },
                Note {
                    text: "Passed technical test".to_string(),
                    author: "Tech Lead".to_string(),
                    date: date(2023, 5, 12),
                },
            ],
        }])
    }

    pub fn list(&self) -> &[ApplicationRecord] {
        &self.records
    }

    pub fn get(&self, id: u64) -> Option<&ApplicationRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    fn validate(draft: &ApplicationDraft) -> Result<()> {
        if draft.name.trim().is_empty() {
            return Err(Error::Validation("name"));
        }
        if draft.email.trim().is_empty() {
            return Err(Error::Validation("email"));
        }
        if draft.contact.trim().is_empty() {
            return Err(Error::Validation("contact"));
        }
        Ok(())
    }

    pub fn create(&mut self, draft: ApplicationDraft) -> Result<ApplicationRecord> {
        Self::validate(&draft)?;
        let record = ApplicationRecord {
            id: self.next_id,
            name: draft.name,
            email: draft.email,
            contact: draft.contact,
            position: draft.position,
            status: draft.status,
            applied_date: draft.applied_date.unwrap_or_else(today),
            interview_date: draft.interview_date,
            documents: Vec::new(),
            notes: Vec::new(),
        };
        self.next_id += 1;
        self.records.push(record.clone());
        Ok(record)
    }

    /// Overwrite the record's fields, keeping its id, notes and documents.
    /// Returns false (a no-op) when the id is absent.
    pub fn update(&mut self, id: u64, draft: ApplicationDraft) -> Result<bool> {
        Self::validate(&draft)?;
        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        record.name = draft.name;
        record.email = draft.email;
        record.contact = draft.contact;
        record.position = draft.position;
        record.status = draft.status;
        record.applied_date = draft.applied_date.unwrap_or(record.applied_date);
        record.interview_date = draft.interview_date;
        Ok(true)
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    /// Flat transition: any status may move to any other, in both directions.
    pub fn set_status(&mut self, id: u64, status: Status) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.status = status;
                true
            }
            None => false,
        }
    }

    pub fn append_note(&mut self, id: u64, text: &str, author: &str) -> Result<bool> {
        if text.trim().is_empty() {
            return Err(Error::EmptyNote);
        }
        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        record.notes.push(Note {
            text: text.to_string(),
            author: author.to_string(),
            date: today(),
        });
        Ok(true)
    }

    /// Appends file names verbatim: no de-duplication, no content.
    pub fn append_documents<I>(&mut self, id: u64, names: I) -> bool
    where
        I: IntoIterator<Item = String>,
    {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.documents.extend(names);
                true
            }
            None => false,
        }
    }
}
