use std::collections::HashMap;

use axum::http::HeaderMap;
use bytes::Bytes;

/// A file part of a multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Multipart fields as submitted, repeated names kept in order.
///
/// File inputs left empty by the browser still produce a part; those are kept
/// as `None` so parallel lists stay aligned by index.
#[derive(Debug, Clone, Default)]
pub struct RawForm {
    fields: HashMap<String, Vec<String>>,
    files: HashMap<String, Vec<Option<UploadedFile>>>,
}

impl RawForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(name.into()).or_default().push(value.into());
    }

    pub fn push_file(&mut self, name: impl Into<String>, file: Option<UploadedFile>) {
        self.files.entry(name.into()).or_default().push(file);
    }

    /// First value of a scalar field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn get_list(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn files(&self, name: &str) -> &[Option<UploadedFile>] {
        self.files.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Parse multipart form data using multer.
pub async fn parse_multipart(headers: &HeaderMap, body: Bytes) -> Result<RawForm, String> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut form = RawForm::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        let name = field.name().unwrap_or("unknown").to_string();
        let file_name = field.file_name().map(str::to_string);
        // Browsers send empty file inputs with an empty filename and an
        // octet-stream content type; plain fields carry neither.
        if file_name.is_none() && field.content_type().is_none() {
            let value = field
                .text()
                .await
                .map_err(|e| format!("Field read error: {e}"))?;
            form.push_field(name, value);
        } else {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| format!("File read error: {e}"))?;
            let file = file_name
                .filter(|f| !f.is_empty())
                .map(|file_name| UploadedFile { file_name, bytes });
            form.push_file(name, file);
        }
    }

    Ok(form)
}
