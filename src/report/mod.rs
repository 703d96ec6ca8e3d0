//! Maintenance report layout.
//!
//! Renders a [`ReportForm`] into the fixed corporate template with `docx-rs`:
//! header band, general data, checklist, one block per correction and a
//! paginated footer. Picture problems degrade to placeholder text; text that
//! cannot be represented in XML aborts the build.

mod picture;
mod text;

use std::io::Cursor;
use std::path::Path;

use docx_rs::{
    AlignmentType, BorderType, Docx, FieldCharType, Footer, HeightRule, InstrText, PageMargin,
    Paragraph, Run, Shading, ShdType, Table, TableAlignmentType, TableBorder,
    TableBorderPosition, TableCell, TableCellBorder, TableCellBorderPosition, TableLayoutType,
    TableRow, VAlignType, WidthType,
};

use crate::submission::{Correction, ReportForm};

pub use picture::Picture;

pub const LOGO_FALLBACK: &str = "NAVITRANS\nMantenimiento";
pub const NO_IMAGE: &str = "(Sin imagen)";
pub const IMAGE_FAILED: &str = "(No se pudo insertar la imagen)";
pub const NO_DESCRIPTION: &str = "(Sin descripción)";
pub const CHECKED: char = '☑';
pub const UNCHECKED: char = '☐';

const BRAND_RED: &str = "E30613";
const WHITE: &str = "FFFFFF";
const BLACK: &str = "000000";
const ROW_FILLS: [&str; 2] = ["E6E6E6", "D0D0D0"];
const DESCRIPTION_FILL: &str = "F5F5F5";

// Eighths of a point.
const THIN_BORDER: usize = 4;
const THICK_BORDER: usize = 12;

const LOGO_HEIGHT: f64 = 0.6;
const CORRECTION_IMAGE_WIDTH: f64 = 1.55;

// US Letter with 1" top/bottom and 1.25" side margins.
const PAGE_WIDTH: u32 = 12_240;
const PAGE_HEIGHT: u32 = 15_840;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported image: {0}")]
    Image(#[from] image::ImageError),
    #[error("{field} contains a character that cannot be stored (U+{:04X})", u32::from(*ch))]
    InvalidText { field: &'static str, ch: char },
    #[error("could not write document package: {0}")]
    Package(String),
}

pub(crate) fn twips(inches: f64) -> usize {
    (inches * 1440.0).round() as usize
}

pub(crate) fn emu(inches: f64) -> u32 {
    (inches * 914_400.0).round() as u32
}

/// Build the report document. `logo` is embedded when it exists and decodes.
pub fn build(form: &ReportForm, logo: &Path) -> Result<Docx, ReportError> {
    check_form(form)?;

    let mut doc = Docx::new()
        .page_size(PAGE_WIDTH, PAGE_HEIGHT)
        .page_margin(
            PageMargin::new()
                .top(1440)
                .bottom(1440)
                .left(1800)
                .right(1800),
        )
        .default_fonts(text::fonts());

    doc = doc
        .add_table(header(form, logo))
        .add_paragraph(Paragraph::new())
        .add_table(section_title("1. DATOS GENERALES"))
        .add_paragraph(Paragraph::new())
        .add_table(general_data(form))
        .add_paragraph(Paragraph::new())
        .add_table(section_title("2. CONDICIONES"));

    for condition in &form.conditions {
        let mark = if condition.checked { CHECKED } else { UNCHECKED };
        doc = doc.add_paragraph(
            Paragraph::new().add_run(text::run(&format!("{mark} {}", condition.text), 10)),
        );
    }

    doc = doc
        .add_table(section_title("3. CORRECCIONES"))
        .add_paragraph(Paragraph::new());
    for (i, correction) in form.corrections.iter().enumerate() {
        if i > 0 {
            doc = doc.add_paragraph(Paragraph::new());
        }
        doc = doc
            .add_table(correction_table(correction))
            .add_paragraph(Paragraph::new());
    }

    Ok(doc.footer(page_footer()))
}

/// Serialize the package into memory.
pub fn to_bytes(doc: Docx) -> Result<Vec<u8>, ReportError> {
    let mut buf = Cursor::new(Vec::new());
    doc.build()
        .pack(&mut buf)
        .map_err(|e| ReportError::Package(e.to_string()))?;
    Ok(buf.into_inner())
}

fn check_form(form: &ReportForm) -> Result<(), ReportError> {
    text::check("fecha", &form.date)?;
    text::check("cliente", &form.client)?;
    text::check("equipo", &form.equipment)?;
    text::check("kilometraje", &form.odometer)?;
    text::check("horas", &form.hours)?;
    for condition in &form.conditions {
        text::check("condiciones", &condition.text)?;
    }
    for correction in &form.corrections {
        text::check("título de corrección", &correction.title)?;
        text::check("descripción de corrección", &correction.description)?;
    }
    Ok(())
}

fn centered(run: Run) -> Paragraph {
    Paragraph::new().align(AlignmentType::Center).add_run(run)
}

fn shading(fill: &str) -> Shading {
    Shading::new().shd_type(ShdType::Clear).color("auto").fill(fill)
}

fn cell(width_in: f64) -> TableCell {
    TableCell::new().width(twips(width_in), WidthType::Dxa)
}

fn boxed(cell: TableCell) -> TableCell {
    [
        TableCellBorderPosition::Top,
        TableCellBorderPosition::Left,
        TableCellBorderPosition::Bottom,
        TableCellBorderPosition::Right,
    ]
    .into_iter()
    .fold(cell, |cell, position| {
        cell.set_border(
            TableCellBorder::new(position)
                .border_type(BorderType::Single)
                .size(THIN_BORDER)
                .color(BLACK),
        )
    })
}

/// Fixed-layout, centred table without borders.
fn table(columns_in: &[f64], rows: Vec<TableRow>) -> Table {
    Table::new(rows)
        .set_grid(columns_in.iter().map(|w| twips(*w)).collect())
        .align(TableAlignmentType::Center)
        .layout(TableLayoutType::Fixed)
        .clear_all_border()
}

fn row(cells: Vec<TableCell>, height_in: f64) -> TableRow {
    TableRow::new(cells)
        .row_height(twips(height_in) as f32)
        .height_rule(HeightRule::AtLeast)
}

fn header(form: &ReportForm, logo: &Path) -> Table {
    let logo_cell = boxed(cell(1.5))
        .vertical_align(VAlignType::Center)
        .add_paragraph(centered(logo_run(logo)));

    let title_cell = boxed(cell(2.0))
        .vertical_align(VAlignType::Center)
        .shading(shading(BRAND_RED))
        .add_paragraph(centered(
            text::run("REPORTE TÉCNICO\nSERVICIO TALLER", 11)
                .bold()
                .color(WHITE),
        ));

    let version_row = |label: &str| {
        row(
            vec![
                boxed(cell(0.85))
                    .vertical_align(VAlignType::Center)
                    .add_paragraph(centered(text::run(label, 8).bold())),
            ],
            0.3,
        )
    };
    let version_table = table(
        &[0.85],
        vec![
            version_row("VERSIÓN: 01"),
            version_row(&format!("FECHA: {}", form.date_or_placeholder())),
        ],
    );
    // A cell must end with a paragraph.
    let meta_cell = boxed(cell(1.0))
        .vertical_align(VAlignType::Center)
        .add_table(version_table)
        .add_paragraph(Paragraph::new());

    table(
        &[1.5, 2.0, 1.0],
        vec![row(vec![logo_cell, title_cell, meta_cell], 0.8)],
    )
}

fn logo_run(logo: &Path) -> Run {
    if logo.is_file() {
        match Picture::load(logo) {
            Ok(picture) => {
                return Run::new().add_image(picture.fit_height(LOGO_HEIGHT));
            }
            Err(e) => tracing::warn!("Logo {} not usable, using text: {e}", logo.display()),
        }
    }
    text::run(LOGO_FALLBACK, 9).bold()
}

/// Full-width red banner with white bold text.
fn section_title(title: &str) -> Table {
    table(
        &[6.0],
        vec![TableRow::new(vec![
            cell(6.0)
                .shading(shading(BRAND_RED))
                .add_paragraph(Paragraph::new().add_run(text::run(title, 12).bold().color(WHITE))),
        ])],
    )
}

fn general_data(form: &ReportForm) -> Table {
    let rows = form
        .general_data()
        .into_iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let fill = ROW_FILLS[i % ROW_FILLS.len()];
            TableRow::new(vec![
                cell(1.5)
                    .shading(shading(fill))
                    .vertical_align(VAlignType::Center)
                    .add_paragraph(centered(text::run(label, 11).bold())),
                cell(2.0)
                    .shading(shading(fill))
                    .vertical_align(VAlignType::Center)
                    .add_paragraph(centered(text::run(value, 11))),
            ])
        })
        .collect();

    table(&[1.5, 2.0], rows)
}

fn correction_table(correction: &Correction) -> Table {
    let title = cell(4.0)
        .grid_span(2)
        .shading(shading(BRAND_RED))
        .vertical_align(VAlignType::Center)
        .add_paragraph(centered(text::run(&correction.title, 11).bold().color(WHITE)));

    let image = cell(1.75)
        .vertical_align(VAlignType::Center)
        .add_paragraph(centered(correction_image(correction)));

    let description = if correction.description.is_empty() {
        NO_DESCRIPTION
    } else {
        correction.description.as_str()
    };
    let description = cell(2.25)
        .shading(shading(DESCRIPTION_FILL))
        .vertical_align(VAlignType::Center)
        .add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Both)
                .add_run(text::run(description, 10)),
        );

    let outer = [
        TableBorderPosition::Top,
        TableBorderPosition::Left,
        TableBorderPosition::Bottom,
        TableBorderPosition::Right,
    ];
    outer.into_iter().fold(
        table(
            &[1.75, 2.25],
            vec![TableRow::new(vec![title]), TableRow::new(vec![image, description])],
        ),
        |table, position| {
            table.set_border(
                TableBorder::new(position)
                    .border_type(BorderType::Single)
                    .size(THICK_BORDER)
                    .color(BLACK),
            )
        },
    )
}

fn correction_image(correction: &Correction) -> Run {
    let Some(stored) = &correction.image else {
        return text::run(NO_IMAGE, 10);
    };

    match Picture::load(&stored.path) {
        Ok(picture) => Run::new().add_image(picture.fit_width(CORRECTION_IMAGE_WIDTH)),
        Err(e) => {
            tracing::warn!("Could not embed {}: {e}", stored.file_name);
            text::run(IMAGE_FAILED, 10)
        }
    }
}

/// "Página N" with N as a PAGE field Word fills in on render.
fn page_footer() -> Footer {
    let field_run = || Run::new().fonts(text::fonts()).size(18);

    Footer::new().add_paragraph(
        Paragraph::new()
            .align(AlignmentType::Center)
            .add_run(text::run("Página ", 9))
            .add_run(field_run().add_field_char(FieldCharType::Begin, false))
            .add_run(field_run().add_instr_text(InstrText::Unsupported("PAGE".to_string())))
            .add_run(field_run().add_field_char(FieldCharType::Separate, false))
            .add_run(field_run().add_text("1"))
            .add_run(field_run().add_field_char(FieldCharType::End, false)),
    )
}
