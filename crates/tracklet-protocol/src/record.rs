//! Form records and their positional command encodings.

use crate::{
    CHAT_TAG, EncodeError, EncodeRequest, HABIT_TAG, MEASUREMENT_TAG, WebhookRequest, Workflow,
};
use serde::{Deserialize, Serialize};

/// One of the four tracked daily habits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitKind {
    Study,
    Project,
    Sport,
    Social,
}

impl HabitKind {
    /// All habits in encoding order.
    pub const ALL: [HabitKind; 4] = [
        HabitKind::Study,
        HabitKind::Project,
        HabitKind::Sport,
        HabitKind::Social,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            HabitKind::Study => "Study",
            HabitKind::Project => "Project",
            HabitKind::Sport => "Sport",
            HabitKind::Social => "Social",
        }
    }
}

/// Daily habit flags plus a free-text note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitRecord {
    pub study: bool,
    pub project: bool,
    pub sport: bool,
    pub social: bool,
    #[serde(default)]
    pub note: String,
}

impl HabitRecord {
    /// Whether a habit is marked done.
    pub fn is_set(&self, kind: HabitKind) -> bool {
        match kind {
            HabitKind::Study => self.study,
            HabitKind::Project => self.project,
            HabitKind::Sport => self.sport,
            HabitKind::Social => self.social,
        }
    }

    /// Mark a habit done or not done.
    pub fn set(&mut self, kind: HabitKind, done: bool) {
        match kind {
            HabitKind::Study => self.study = done,
            HabitKind::Project => self.project = done,
            HabitKind::Sport => self.sport = done,
            HabitKind::Social => self.social = done,
        }
    }

    /// Flip a habit and return its new state.
    pub fn toggle(&mut self, kind: HabitKind) -> bool {
        let next = !self.is_set(kind);
        self.set(kind, next);
        next
    }

    /// Encode as `-msg {study},{project},{sport},{social},{note}`.
    ///
    /// The note is not escaped: a comma inside it shifts the fields the
    /// backend parses.
    pub fn command(&self) -> String {
        let flags: Vec<String> = HabitKind::ALL
            .iter()
            .map(|kind| u8::from(self.is_set(*kind)).to_string())
            .collect();
        format!("{HABIT_TAG} {},{}", flags.join(","), self.note)
    }
}

impl EncodeRequest for HabitRecord {
    fn to_request(&self) -> Result<WebhookRequest, EncodeError> {
        Ok(WebhookRequest::new(Workflow::Habit, self.command()))
    }
}

/// One of the seven body measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementField {
    Weight,
    Height,
    Waist,
    Neck,
    Hip,
    Shoulder,
    Chest,
}

impl MeasurementField {
    /// All fields in encoding order.
    pub const ALL: [MeasurementField; 7] = [
        MeasurementField::Weight,
        MeasurementField::Height,
        MeasurementField::Waist,
        MeasurementField::Neck,
        MeasurementField::Hip,
        MeasurementField::Shoulder,
        MeasurementField::Chest,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            MeasurementField::Weight => "Weight",
            MeasurementField::Height => "Height",
            MeasurementField::Waist => "Waist",
            MeasurementField::Neck => "Neck",
            MeasurementField::Hip => "Hip",
            MeasurementField::Shoulder => "Shoulder",
            MeasurementField::Chest => "Chest",
        }
    }

    /// Unit the backend expects.
    pub fn unit(self) -> &'static str {
        match self {
            MeasurementField::Weight => "kg",
            _ => "cm",
        }
    }
}

/// Body measurements plus a free-text note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub weight: f64,
    pub height: f64,
    pub waist: f64,
    pub neck: f64,
    pub hip: f64,
    pub shoulder: f64,
    pub chest: f64,
    #[serde(default)]
    pub note: String,
}

impl MeasurementRecord {
    /// Read a field.
    pub fn get(&self, field: MeasurementField) -> f64 {
        match field {
            MeasurementField::Weight => self.weight,
            MeasurementField::Height => self.height,
            MeasurementField::Waist => self.waist,
            MeasurementField::Neck => self.neck,
            MeasurementField::Hip => self.hip,
            MeasurementField::Shoulder => self.shoulder,
            MeasurementField::Chest => self.chest,
        }
    }

    /// Write a field.
    pub fn set(&mut self, field: MeasurementField, value: f64) {
        let slot = match field {
            MeasurementField::Weight => &mut self.weight,
            MeasurementField::Height => &mut self.height,
            MeasurementField::Waist => &mut self.waist,
            MeasurementField::Neck => &mut self.neck,
            MeasurementField::Hip => &mut self.hip,
            MeasurementField::Shoulder => &mut self.shoulder,
            MeasurementField::Chest => &mut self.chest,
        };
        *slot = value;
    }

    /// Write a field from raw user text, coercing unparsable input to 0.
    pub fn set_text(&mut self, field: MeasurementField, text: &str) -> f64 {
        let value = coerce_measurement(text);
        self.set(field, value);
        value
    }

    /// Body-mass index derived from weight and height.
    pub fn bmi(&self) -> f64 {
        bmi(self.weight, self.height)
    }

    /// Encode as `-msr {weight},{height},{waist},{neck},{hip},{shoulder},{chest},{note}`.
    pub fn command(&self) -> String {
        let values: Vec<String> = MeasurementField::ALL
            .iter()
            .map(|field| self.get(*field).to_string())
            .collect();
        format!("{MEASUREMENT_TAG} {},{}", values.join(","), self.note)
    }
}

impl EncodeRequest for MeasurementRecord {
    fn to_request(&self) -> Result<WebhookRequest, EncodeError> {
        Ok(WebhookRequest::new(Workflow::Physique, self.command()))
    }
}

/// Parse a measurement typed by the user.
///
/// Reads the longest leading decimal number, so `"72kg"` is 72 and `"80,5"`
/// is 80. No leading number, or a non-finite one, becomes 0.
pub fn coerce_measurement(text: &str) -> f64 {
    let text = text.trim_start();
    text[..numeric_prefix_len(text)]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Byte length of `[+-]digits[.digits][(e|E)[+-]digits]` at the start of `text`.
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer = digits_from(end);
    end += integer;
    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        if integer > 0 || fraction > 0 {
            end += 1 + fraction;
        }
    }
    if integer == 0 && fraction == 0 {
        return 0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent = digits_from(end + 1 + sign);
        if exponent > 0 {
            end += 1 + sign + exponent;
        }
    }
    end
}

/// BMI = weight / (height in metres)², or 0 when either input is not positive.
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    if !(weight_kg > 0.0 && height_cm > 0.0) {
        return 0.0;
    }
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// WHO adult BMI band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Classify a BMI value.
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// Free-text chat message addressed to the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl EncodeRequest for ChatMessage {
    fn to_request(&self) -> Result<WebhookRequest, EncodeError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(EncodeError::EmptyMessage);
        }
        Ok(WebhookRequest::new(
            Workflow::Chat,
            format!("{CHAT_TAG} {text}"),
        ))
    }
}
