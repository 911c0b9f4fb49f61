//! Data types shared by the decision pipelines.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Bottle fullness label emitted by the vision classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fullness {
    Full,
    Medium,
    Empty,
}

impl Fullness {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "full" => Some(Fullness::Full),
            "medium" => Some(Fullness::Medium),
            "empty" => Some(Fullness::Empty),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Fullness::Full => "full",
            Fullness::Medium => "medium",
            Fullness::Empty => "empty",
        }
    }
}

/// Keep/discard action attached to a bottle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    Keep,
    Discard,
}

impl Disposition {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "keep" => Some(Disposition::Keep),
            "discard" => Some(Disposition::Discard),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Disposition::Keep => "keep",
            Disposition::Discard => "discard",
        }
    }
}

/// Sticker outline shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Triangle,
    Square,
    Hexagon,
}

impl Shape {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "circle" => Some(Shape::Circle),
            "triangle" => Some(Shape::Triangle),
            "square" => Some(Shape::Square),
            "hexagon" => Some(Shape::Hexagon),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Triangle => "triangle",
            Shape::Square => "square",
            Shape::Hexagon => "hexagon",
        }
    }
}

/// Sticker color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Green,
    Blue,
    Yellow,
    Red,
}

impl Color {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "green" => Some(Color::Green),
            "blue" => Some(Color::Blue),
            "yellow" => Some(Color::Yellow),
            "red" => Some(Color::Red),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Red => "red",
        }
    }
}

/// Per-airline mapping from fullness class to disposition. Exactly one rule
/// set exists per airline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirlineRule {
    pub airline_id: i64,
    pub airline_name: String,
    pub empty: Disposition,
    pub partial: Disposition,
    pub full: Disposition,
}

impl AirlineRule {
    /// Selects the disposition configured for the given fullness class.
    pub fn disposition_for(&self, fullness: Fullness) -> Disposition {
        match fullness {
            Fullness::Full => self.full,
            Fullness::Medium => self.partial,
            Fullness::Empty => self.empty,
        }
    }
}

/// Reference row tying one shape+color combination to its expiry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerReference {
    pub shape: Shape,
    pub color: Color,
    pub expires_on: NaiveDate,
}

/// One bottle prediction as normalized from the classifier response.
///
/// `predicted_class` stays a raw string here so an out-of-vocabulary label
/// survives long enough to be rejected with context; `confidence` is part of
/// the upstream contract but unused by the decision logic.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawPrediction {
    pub confidence: f64,
    pub file_name: String,
    pub predicted_class: String,
}

/// Number of stickers of one shape+color detected in a single image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedStickerCount {
    pub shape: Shape,
    pub color: Color,
    pub count: u64,
}

/// Disposition decided for one photographed bottle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BottleAction {
    pub filename: String,
    pub prediction: Fullness,
    pub action: Disposition,
}

/// One expiry bucket: total sticker instances plus the per shape+color
/// breakdown, one detail row per distinct combination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpiryBucket {
    pub total: u64,
    pub details: Vec<DetectedStickerCount>,
}

/// Expired / not-expired split for one analyzed image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpiryReport {
    pub expired: ExpiryBucket,
    pub not_expired: ExpiryBucket,
}
