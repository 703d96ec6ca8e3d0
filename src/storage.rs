use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::config::Config;

pub const REPORT_PREFIX: &str = "reporte_mantenimiento_";
pub const REPORT_EXTENSION: &str = "docx";

/// On-disk locations for uploaded photos and generated reports.
#[derive(Debug, Clone)]
pub struct Storage {
    upload_dir: PathBuf,
    generated_dir: PathBuf,
    logo_path: PathBuf,
}

impl Storage {
    pub fn new(config: &Config) -> Self {
        Self {
            upload_dir: config.upload_dir(),
            generated_dir: config.generated_dir(),
            logo_path: config.logo_path(),
        }
    }

    /// Layout rooted at `dir`, with the logo expected under `dir/static`.
    #[cfg(test)]
    pub(crate) fn in_dir(dir: &Path) -> Self {
        Self {
            upload_dir: dir.join("uploads"),
            generated_dir: dir.join("generated"),
            logo_path: dir.join("static").join("img").join("logo.png"),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn generated_dir(&self) -> &Path {
        &self.generated_dir
    }

    pub fn logo_path(&self) -> &Path {
        &self.logo_path
    }

    /// Idempotent; concurrent callers may race here harmlessly.
    pub fn ensure_dirs(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.upload_dir)?;
        std::fs::create_dir_all(&self.generated_dir)?;
        Ok(())
    }

    pub fn upload_path(&self, file_name: &str) -> Option<PathBuf> {
        resolve(&self.upload_dir, file_name)
    }

    pub fn generated_path(&self, file_name: &str) -> Option<PathBuf> {
        resolve(&self.generated_dir, file_name)
    }
}

/// Joins `file_name` onto `dir` only if it names a plain file directly inside
/// it. Separators, `..` and hidden names are rejected.
fn resolve(dir: &Path, file_name: &str) -> Option<PathBuf> {
    if file_name.is_empty()
        || file_name.starts_with('.')
        || file_name.contains(['/', '\\', '\0'])
    {
        return None;
    }
    Some(dir.join(file_name))
}

/// Base report name for a timestamp, e.g. `reporte_mantenimiento_20240102_030405`.
pub fn report_stem(now: NaiveDateTime) -> String {
    format!("{REPORT_PREFIX}{}", now.format("%Y%m%d_%H%M%S"))
}

/// Candidate file names for a report: the plain stem first, then `_2`, `_3`, ...
pub fn report_candidates(stem: &str) -> impl Iterator<Item = String> + '_ {
    (1u32..).map(move |n| match n {
        1 => format!("{stem}.{REPORT_EXTENSION}"),
        n => format!("{stem}_{n}.{REPORT_EXTENSION}"),
    })
}
