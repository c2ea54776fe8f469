use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::normalization;

/// The value `imageUri` takes when a record has no attached photo, or
/// when persisting the photo failed at creation.
pub const NO_IMAGE: &str = "";

/// A single brewing session in the journal.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// The ID of the record.
    id: Uuid,

    /// The resolved reference to the attached photo: a path into the
    /// app-owned image directory, an inline-encoded image or URL, or
    /// [`NO_IMAGE`].
    #[serde(default)]
    image_uri: String,

    /// The date and time the session was recorded.
    #[serde(with = "time::serde::timestamp")]
    created_at: OffsetDateTime,

    /// The user-submitted session data.
    #[serde(flatten)]
    data: RecordData,
}

impl Record {
    pub(crate) fn new(
        id: Uuid,
        created_at: OffsetDateTime,
        image_uri: String,
        data: RecordData,
    ) -> Self {
        Record {
            id,
            image_uri,
            created_at,
            data,
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn image_uri(&self) -> &str {
        &self.image_uri
    }

    pub fn has_image(&self) -> bool {
        self.image_uri != NO_IMAGE
    }

    pub fn data(&self) -> &RecordData {
        &self.data
    }
}

/// The user-editable fields of a record: everything except the ID, the
/// creation timestamp, and the resolved image reference.
///
/// Rating fields are always present; an unset rating is stored as 0,
/// never as an absence.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordData {
    /// The name of the beans. Normalized on deserialization.
    #[serde(deserialize_with = "normalization::deserialize")]
    pub name: String,

    /// The bean variety.
    pub variety: String,

    /// The growing region.
    pub production_area: String,

    /// The roasting degree, one of the app's preset labels.
    pub roasting_degree: String,

    /// The extraction method, e.g. paper drip.
    pub extraction_method: String,

    /// The manufacturer of the extraction equipment.
    pub extraction_maker: String,

    /// The grind size.
    pub grind_size: String,

    /// How the dose was measured.
    pub measurement_method: String,

    /// The total extraction time, as entered.
    pub extraction_time: String,

    /// Free-form notes.
    pub memo: String,

    /// The brew water temperature in degrees Celsius. Non-negative.
    pub temperature: f64,

    /// The dose of ground coffee in grams. Non-negative.
    pub coffee_amount: f64,

    /// The amount of brew water in grams. Non-negative.
    pub water_amount: f64,

    /// Taste axis ratings, 0–5 in 0.5 steps.
    pub acidity: f64,
    pub bitterness: f64,
    pub body: f64,
    pub aroma: f64,
    pub aftertaste: f64,

    /// The overall rating, 1–5, or 0 when unset.
    pub overall: u8,
}

/// A partial update: every field optional, merged shallowly over the
/// stored record. Fields left `None` retain their prior value.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordPatch {
    #[serde(deserialize_with = "normalization::deserialize_option")]
    pub name: Option<String>,
    pub variety: Option<String>,
    pub production_area: Option<String>,
    pub roasting_degree: Option<String>,
    pub extraction_method: Option<String>,
    pub extraction_maker: Option<String>,
    pub grind_size: Option<String>,
    pub measurement_method: Option<String>,
    pub extraction_time: Option<String>,
    pub memo: Option<String>,
    pub temperature: Option<f64>,
    pub coffee_amount: Option<f64>,
    pub water_amount: Option<f64>,
    pub acidity: Option<f64>,
    pub bitterness: Option<f64>,
    pub body: Option<f64>,
    pub aroma: Option<f64>,
    pub aftertaste: Option<f64>,
    pub overall: Option<u8>,

    /// A replacement image reference. The store accepts whatever string
    /// is given here; any re-resolution happens at the caller before
    /// the update.
    pub image_uri: Option<String>,
}

impl RecordPatch {
    pub(crate) fn apply(self, record: &mut Record) {
        let data = &mut record.data;

        if let Some(name) = self.name {
            data.name = name;
        }
        if let Some(variety) = self.variety {
            data.variety = variety;
        }
        if let Some(production_area) = self.production_area {
            data.production_area = production_area;
        }
        if let Some(roasting_degree) = self.roasting_degree {
            data.roasting_degree = roasting_degree;
        }
        if let Some(extraction_method) = self.extraction_method {
            data.extraction_method = extraction_method;
        }
        if let Some(extraction_maker) = self.extraction_maker {
            data.extraction_maker = extraction_maker;
        }
        if let Some(grind_size) = self.grind_size {
            data.grind_size = grind_size;
        }
        if let Some(measurement_method) = self.measurement_method {
            data.measurement_method = measurement_method;
        }
        if let Some(extraction_time) = self.extraction_time {
            data.extraction_time = extraction_time;
        }
        if let Some(memo) = self.memo {
            data.memo = memo;
        }
        if let Some(temperature) = self.temperature {
            data.temperature = temperature;
        }
        if let Some(coffee_amount) = self.coffee_amount {
            data.coffee_amount = coffee_amount;
        }
        if let Some(water_amount) = self.water_amount {
            data.water_amount = water_amount;
        }
        if let Some(acidity) = self.acidity {
            data.acidity = acidity;
        }
        if let Some(bitterness) = self.bitterness {
            data.bitterness = bitterness;
        }
        if let Some(body) = self.body {
            data.body = body;
        }
        if let Some(aroma) = self.aroma {
            data.aroma = aroma;
        }
        if let Some(aftertaste) = self.aftertaste {
            data.aftertaste = aftertaste;
        }
        if let Some(overall) = self.overall {
            data.overall = overall;
        }
        if let Some(image_uri) = self.image_uri {
            record.image_uri = image_uri;
        }
    }
}

/// A raw image reference as supplied at creation, before the image
/// adapter resolves it into a durable `imageUri`.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageSource {
    /// A picked file somewhere on the device.
    File(PathBuf),

    /// An already-encoded inline image (a data URI) or a URL.
    Encoded(String),
}
