use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::error::Result;
use crate::models::ApplicationRecord;

pub const DEFAULT_EXPORT_FILE: &str = "job_applications.xlsx";

const HEADERS: [&str; 7] = [
    "Name",
    "Email",
    "Contact",
    "Position",
    "Status",
    "Applied Date",
    "Interview Date",
];

/// Write one worksheet named "Applications" with a header row and one flat
/// row per record. Callers pass the already-filtered view.
pub fn write_xlsx(records: &[ApplicationRecord], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Applications")?;

    let bold = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *header, &bold)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        worksheet.write(row, 0, record.name.as_str())?;
        worksheet.write(row, 1, record.email.as_str())?;
        worksheet.write(row, 2, record.contact.as_str())?;
        worksheet.write(row, 3, record.position.as_str())?;
        worksheet.write(row, 4, record.status.as_str())?;
        worksheet.write(row, 5, record.applied_date.to_string())?;
        let interview = record
            .interview_date
            .map(|d| d.to_string())
            .unwrap_or_default();
        worksheet.write(row, 6, interview)?;
    }

    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Position, Status};
    use chrono::NaiveDate;

    fn record(id: u64, name: &str) -> ApplicationRecord {
        ApplicationRecord {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            contact: "0811111111".to_string(),
            position: Position::UiDesigner,
            status: Status::Test,
            applied_date: NaiveDate::from_ymd_opt(2023, 5, 1).unwrap(),
            interview_date: None,
            documents: Vec::new(),
            notes: Vec::new(),
        }
    }

    #[test]
    fn test_export_writes_a_nonempty_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(DEFAULT_EXPORT_FILE);

        write_xlsx(&[record(1, "Alice"), record(2, "Bob")], &path).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
    }

    #[test]
    fn test_export_of_an_empty_view_still_produces_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("empty.xlsx");

        write_xlsx(&[], &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_export_to_an_impossible_path_fails_without_panicking() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing-dir").join("out.xlsx");

        assert!(write_xlsx(&[record(1, "Alice")], &path).is_err());
    }
}
