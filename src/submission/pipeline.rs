use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::AppError;
use crate::report;
use crate::storage::{self, Storage};

use super::{RawForm, ReportForm};

pub struct PipelineResult {
    pub file_name: String,
    pub conditions: usize,
    pub corrections: usize,
}

/// Parse, build and save one submission. Blocking; run it off the runtime.
pub fn run(storage: &Storage, raw: &RawForm, now: NaiveDateTime) -> Result<PipelineResult, AppError> {
    storage.ensure_dirs()?;

    let form = ReportForm::from_raw(raw, storage, now)?;
    let document = report::to_bytes(report::build(&form, storage.logo_path())?)?;

    let stem = storage::report_stem(now);
    for file_name in storage::report_candidates(&stem) {
        let path = storage
            .generated_path(&file_name)
            .ok_or_else(|| AppError::Internal(format!("Invalid report name: {file_name}")))?;

        match write_new(&path, &document) {
            Ok(()) => {
                return Ok(PipelineResult {
                    file_name,
                    conditions: form.conditions.len(),
                    corrections: form.corrections.len(),
                });
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                tracing::debug!("{file_name} already exists, trying next name");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::Internal("No free report file name".to_string()))
}

/// Write `bytes` to a file that must not exist yet.
fn write_new(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(bytes)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::submission::field;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    #[test]
    fn writes_report_into_generated_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::in_dir(dir.path());

        let mut raw = RawForm::new();
        raw.push_field(field::CLIENT, "ACME");
        raw.push_field(field::CONDITIONS, r#"[{"text":"Frenos","checked":true}]"#);
        raw.push_field(field::CORRECTION_DESCRIPTIONS, "Ajuste");

        let result = run(&storage, &raw, now()).unwrap();
        assert_eq!(result.file_name, "reporte_mantenimiento_20240102_030405.docx");
        assert_eq!(result.conditions, 1);
        assert_eq!(result.corrections, 1);
        assert!(storage.generated_dir().join(&result.file_name).is_file());
    }

    #[test]
    fn same_second_submissions_get_distinct_names() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::in_dir(dir.path());
        let raw = RawForm::new();

        let first = run(&storage, &raw, now()).unwrap();
        let second = run(&storage, &raw, now()).unwrap();
        let third = run(&storage, &raw, now()).unwrap();

        assert_eq!(first.file_name, "reporte_mantenimiento_20240102_030405.docx");
        assert_eq!(second.file_name, "reporte_mantenimiento_20240102_030405_2.docx");
        assert_eq!(third.file_name, "reporte_mantenimiento_20240102_030405_3.docx");
    }

    #[test]
    fn unstorable_text_fails_without_writing_a_report() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::in_dir(dir.path());

        let mut raw = RawForm::new();
        raw.push_field(field::CLIENT, "ACME\u{1b}[0m");

        let err = run(&storage, &raw, now()).err().unwrap();
        assert!(matches!(
            err,
            AppError::Document(report::ReportError::InvalidText { field: "cliente", .. })
        ));
        assert_eq!(std::fs::read_dir(storage.generated_dir()).unwrap().count(), 0);
    }
}
