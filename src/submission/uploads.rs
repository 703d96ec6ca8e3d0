use std::io::{self, Write};
use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::storage::Storage;

use super::parser::UploadedFile;

pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// A photo persisted in the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub file_name: String,
    pub path: PathBuf,
}

pub fn is_allowed(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ALLOWED_IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Reduce a client-supplied file name to `[A-Za-z0-9_.-]`, folding common
/// accented letters, turning whitespace runs into `_` and trimming leading and
/// trailing dots and underscores.
pub fn secure_filename(name: &str) -> String {
    let folded: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' => ' ',
            _ => fold_accent(c),
        })
        .collect();

    let joined = folded.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        'Á' | 'À' | 'Ä' | 'Â' | 'Ã' => 'A',
        'É' | 'È' | 'Ë' | 'Ê' => 'E',
        'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
        'Ó' | 'Ò' | 'Ö' | 'Ô' | 'Õ' => 'O',
        'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
        'Ñ' => 'N',
        'Ç' => 'C',
        other => other,
    }
}

/// `foto` at 2024-01-02 03:04:05.678901 becomes `foto_20240102030405678901`.
pub fn timestamped_stem(stem: &str, now: NaiveDateTime) -> String {
    let stem = if stem.is_empty() { "imagen" } else { stem };
    format!("{stem}_{}", now.format("%Y%m%d%H%M%S%6f"))
}

/// Persist an uploaded photo if its extension is allowed.
///
/// Returns `Ok(None)` when the file is ignored. Names are claimed with
/// create-new semantics; a clash gets a numeric suffix.
pub fn save(
    storage: &Storage,
    file: &UploadedFile,
    now: NaiveDateTime,
) -> io::Result<Option<StoredImage>> {
    if !is_allowed(&file.file_name) {
        tracing::debug!("Ignoring upload with disallowed extension: {}", file.file_name);
        return Ok(None);
    }

    let Some((stem, ext)) = file.file_name.rsplit_once('.') else {
        return Ok(None);
    };
    let stem = timestamped_stem(&secure_filename(stem), now);

    for n in 1u32.. {
        let file_name = match n {
            1 => format!("{stem}.{ext}"),
            n => format!("{stem}_{n}.{ext}"),
        };
        let Some(path) = storage.upload_path(&file_name) else {
            return Ok(None);
        };

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(mut out) => {
                out.write_all(&file.bytes)?;
                tracing::debug!("Stored upload {file_name} ({} bytes)", file.bytes.len());
                return Ok(Some(StoredImage { file_name, path }));
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::other("exhausted upload name candidates"))
}
