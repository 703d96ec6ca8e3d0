pub mod conditions;
pub mod parser;
pub mod pipeline;
pub mod uploads;

use chrono::NaiveDateTime;

use crate::storage::Storage;

pub use conditions::Condition;
pub use parser::RawForm;
pub use uploads::StoredImage;

/// Multipart field names posted by the form page.
pub mod field {
    pub const DATE: &str = "fecha";
    pub const CLIENT: &str = "cliente";
    pub const EQUIPMENT: &str = "equipo";
    pub const ODOMETER: &str = "kilometraje";
    pub const HOURS: &str = "horas";
    pub const CONDITIONS: &str = "conditions_json";
    pub const CORRECTION_DESCRIPTIONS: &str = "corrections_desc[]";
    pub const CORRECTION_TITLES: &str = "corrections_title[]";
    pub const CORRECTION_IMAGES: &str = "corrections_img[]";
}

pub const DATE_PLACEHOLDER: &str = "XXXXXXXX";
pub const VALUE_PLACEHOLDER: &str = "XXXXXXXXXX";

/// One maintenance action: title, description, optional photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub title: String,
    pub description: String,
    pub image: Option<StoredImage>,
}

/// A parsed maintenance report submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportForm {
    pub date: String,
    pub client: String,
    pub equipment: String,
    pub odometer: String,
    pub hours: String,
    pub conditions: Vec<Condition>,
    pub corrections: Vec<Correction>,
}

impl ReportForm {
    /// Build the form from raw multipart fields, persisting allowed photos.
    pub fn from_raw(
        raw: &RawForm,
        storage: &Storage,
        now: NaiveDateTime,
    ) -> std::io::Result<Self> {
        let scalar = |name: &str| raw.get(name).unwrap_or("").trim().to_string();

        let conditions = conditions::decode(raw.get(field::CONDITIONS).unwrap_or("[]"));

        let descriptions = raw.get_list(field::CORRECTION_DESCRIPTIONS);
        let titles = raw.get_list(field::CORRECTION_TITLES);
        let images = raw.files(field::CORRECTION_IMAGES);

        let mut corrections = Vec::new();
        for (idx, description) in descriptions.iter().enumerate() {
            let description = description.trim().to_string();
            let title = titles.get(idx).map(|t| t.trim()).unwrap_or("").to_string();

            let image = match images.get(idx).and_then(Option::as_ref) {
                Some(file) => uploads::save(storage, file, now)?,
                None => None,
            };

            if description.is_empty() && title.is_empty() && image.is_none() {
                continue;
            }

            corrections.push(Correction {
                title: if title.is_empty() {
                    format!("Corrección {}", idx + 1)
                } else {
                    title
                },
                description,
                image,
            });
        }

        Ok(ReportForm {
            date: scalar(field::DATE),
            client: scalar(field::CLIENT),
            equipment: scalar(field::EQUIPMENT),
            odometer: scalar(field::ODOMETER),
            hours: scalar(field::HOURS),
            conditions,
            corrections,
        })
    }

    pub fn date_or_placeholder(&self) -> &str {
        or_placeholder(&self.date, DATE_PLACEHOLDER)
    }

    /// Label/value rows of the general data table.
    pub fn general_data(&self) -> [(&'static str, &str); 4] {
        [
            ("CLIENTE:", or_placeholder(&self.client, VALUE_PLACEHOLDER)),
            ("EQUIPO:", or_placeholder(&self.equipment, VALUE_PLACEHOLDER)),
            ("KILOMETRAJE:", or_placeholder(&self.odometer, VALUE_PLACEHOLDER)),
            ("HORAS:", or_placeholder(&self.hours, VALUE_PLACEHOLDER)),
        ]
    }
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'static str) -> &'a str {
    if value.is_empty() { placeholder } else { value }
}
