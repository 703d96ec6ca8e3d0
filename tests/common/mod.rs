use std::io::{Cursor, Read};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use tempfile::TempDir;

use maintenance_report::config::Config;

/// A running test server with its own data directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn generated_dir(&self) -> PathBuf {
        self.dir.path().join("generated")
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    /// POST the form; returns status and `Location` header.
    pub async fn submit(&self, form: Form) -> (StatusCode, Option<String>) {
        let resp = self
            .client
            .post(self.url("/submit"))
            .multipart(form)
            .send()
            .await
            .expect("submit request failed");
        let status = resp.status();
        let location = resp
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        (status, location)
    }

    /// Submit, follow the result redirect and download the report.
    /// Returns the report file name and its `word/document.xml`.
    pub async fn submit_and_download(&self, form: Form) -> (String, String) {
        let (status, location) = self.submit(form).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        let location = location.expect("missing Location header");
        let file_name = location
            .strip_prefix("/result/")
            .unwrap_or_else(|| panic!("unexpected redirect {location}"))
            .to_string();

        let resp = self
            .client
            .get(self.url(&format!("/generated/{file_name}")))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = resp.bytes().await.unwrap();

        (file_name, read_part(&bytes, "word/document.xml"))
    }
}

pub fn read_part(docx: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx)).expect("not a zip archive");
    let mut file = archive.by_name(name).expect("missing part");
    let mut out = String::new();
    file.read_to_string(&mut out).unwrap();
    out
}

/// All footer parts of a package, concatenated.
pub fn read_footers(docx: &[u8]) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx)).expect("not a zip archive");
    let mut out = String::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        if file.name().starts_with("word/footer") {
            file.read_to_string(&mut out).unwrap();
        }
    }
    out
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::new_rgb8(width, height);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

pub fn image_part(bytes: Vec<u8>, file_name: &str) -> Part {
    Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str("application/octet-stream")
        .unwrap()
}

/// Base form with the general data filled in.
pub fn base_form() -> Form {
    Form::new()
        .text("fecha", "2024-05-06")
        .text("cliente", "Transportes del Sur")
        .text("equipo", "Camión 12")
        .text("kilometraje", "154000")
        .text("horas", "3200")
}

pub fn test_config(data_dir: &Path) -> Config {
    Config {
        secret_key: "test-secret-key".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        debug: false,
        data_dir: data_dir.to_path_buf(),
        static_dir: data_dir.join("static"),
        max_body_size: 1_048_576,
        log_level: "warn".to_string(),
    }
}

/// Spawn a test app on a random port with a fresh data directory.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Like [`spawn_app`], with a chance to adjust the config first.
pub async fn spawn_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = test_config(dir.path());
    configure(&mut config);
    let app = maintenance_report::build_app(config);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp { addr, client, dir }
}
