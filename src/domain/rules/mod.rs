// Domain rules - Parameter clamping and response policies

use std::num::IntErrorKind;

use url::Url;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Message shown when the service gives no usable explanation
pub const GENERIC_FAILURE_MESSAGE: &str = "Error while processing the video";

/// Parse `raw` as a float and clamp it into `[min, max]`.
///
/// Parsing follows the leading-number rule: `"0.5abc"` reads as `0.5`,
/// anything without a numeric prefix (or NaN) yields `fallback`. The only
/// spelled-out infinity accepted is `Infinity`, case-sensitive.
pub fn clamp_float(raw: &str, min: f64, max: f64, fallback: f64) -> f64 {
    match parse_leading_float(raw) {
        Some(value) => value.clamp(min, max),
        None => fallback,
    }
}

/// Parse `raw` as an integer and clamp it into `[min, max]`.
///
/// Fractional input is truncated at the decimal point (`"12.7"` reads as 12).
pub fn clamp_int(raw: &str, min: i64, max: i64, fallback: i64) -> i64 {
    match parse_leading_int(raw) {
        Some(value) => value.clamp(min, max),
        None => fallback,
    }
}

fn parse_leading_float(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let unsigned = trimmed.strip_prefix(|c| c == '+' || c == '-').unwrap_or(trimmed);
    if unsigned.starts_with("Infinity") {
        return Some(if trimmed.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }
    // `str::parse` also takes `inf`, `infinity` and `nan` in any case
    if unsigned.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    if let Ok(value) = trimmed.parse::<f64>() {
        return Some(value);
    }

    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }
    // Exponent only counts when it has digits
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    trimmed[..end].parse::<f64>().ok()
}

fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }

    match trimmed[..end].parse::<i64>() {
        Ok(value) => Some(value),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// Identifies one of the processing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKey {
    MinAreaRatio,
    MaxAreaRatio,
    SkipFrames,
}

impl ParameterKey {
    /// Multipart field name
    pub fn form_name(&self) -> &'static str {
        match self {
            ParameterKey::MinAreaRatio => "min_area_ratio",
            ParameterKey::MaxAreaRatio => "max_area_ratio",
            ParameterKey::SkipFrames => "skip_frames",
        }
    }
}

/// How a field is entered
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Decimal { step: f64 },
    Integer,
}

/// Inclusive bounds plus the value used for unparsable input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub min: f64,
    pub max: f64,
    pub fallback: f64,
}

/// Clamped value produced by a field's clamp function
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Decimal(f64),
    Integer(i64),
}

/// Declarative description of one input control
#[derive(Debug, Clone, Copy)]
pub struct ParameterField {
    pub key: ParameterKey,
    pub label: &'static str,
    pub kind: FieldKind,
    pub bounds: FieldBounds,
    pub clamp: fn(&str) -> FieldValue,
}

fn clamp_area_ratio(raw: &str) -> FieldValue {
    FieldValue::Decimal(clamp_float(raw, AREA_RATIO_MIN, AREA_RATIO_MAX, AREA_RATIO_MIN))
}

fn clamp_skip_frames(raw: &str) -> FieldValue {
    FieldValue::Integer(clamp_int(raw, SKIP_FRAMES_MIN, SKIP_FRAMES_MAX, SKIP_FRAMES_MIN))
}

const AREA_BOUNDS: FieldBounds = FieldBounds {
    min: AREA_RATIO_MIN,
    max: AREA_RATIO_MAX,
    fallback: AREA_RATIO_MIN,
};

/// Every processing parameter, in display order
pub const PARAMETER_FIELDS: [ParameterField; 3] = [
    ParameterField {
        key: ParameterKey::MinAreaRatio,
        label: "Minimum object size (0.01 - 1)",
        kind: FieldKind::Decimal { step: 0.01 },
        bounds: AREA_BOUNDS,
        clamp: clamp_area_ratio,
    },
    ParameterField {
        key: ParameterKey::MaxAreaRatio,
        label: "Maximum object size (0.01 - 1)",
        kind: FieldKind::Decimal { step: 0.01 },
        bounds: AREA_BOUNDS,
        clamp: clamp_area_ratio,
    },
    ParameterField {
        key: ParameterKey::SkipFrames,
        label: "Frames to skip between detections (1 - 140)",
        kind: FieldKind::Integer,
        bounds: FieldBounds {
            min: SKIP_FRAMES_MIN as f64,
            max: SKIP_FRAMES_MAX as f64,
            fallback: SKIP_FRAMES_MIN as f64,
        },
        clamp: clamp_skip_frames,
    },
];

impl ParameterField {
    /// Descriptor for a key
    pub fn for_key(key: ParameterKey) -> &'static ParameterField {
        match key {
            ParameterKey::MinAreaRatio => &PARAMETER_FIELDS[0],
            ParameterKey::MaxAreaRatio => &PARAMETER_FIELDS[1],
            ParameterKey::SkipFrames => &PARAMETER_FIELDS[2],
        }
    }

    /// Current value of this field rendered for display
    pub fn display_value(&self, params: &ProcessingParameters) -> String {
        match self.key {
            ParameterKey::MinAreaRatio => params.min_area_ratio.to_string(),
            ParameterKey::MaxAreaRatio => params.max_area_ratio.to_string(),
            ParameterKey::SkipFrames => params.skip_frames.to_string(),
        }
    }

    /// Clamp `raw` and store it; other fields are left untouched
    pub fn apply(&self, params: &mut ProcessingParameters, raw: &str) -> FieldValue {
        let value = (self.clamp)(raw);
        match (self.key, value) {
            (ParameterKey::MinAreaRatio, FieldValue::Decimal(v)) => params.min_area_ratio = v,
            (ParameterKey::MaxAreaRatio, FieldValue::Decimal(v)) => params.max_area_ratio = v,
            (ParameterKey::SkipFrames, FieldValue::Integer(v)) => {
                params.skip_frames = u32::try_from(v).unwrap_or(SKIP_FRAMES_MIN as u32)
            }
            (key, value) => {
                tracing::warn!(?key, ?value, "Clamp produced a value of the wrong kind");
            }
        }
        value
    }
}

impl ProcessingParameters {
    /// Apply a raw user edit to one field
    pub fn edit(&mut self, key: ParameterKey, raw: &str) -> FieldValue {
        ParameterField::for_key(key).apply(self, raw)
    }
}

/// Resolve the service's result location against its base origin
pub fn resolve_result_location(base: &Url, location: &str) -> Result<Url, DomainError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(DomainError::InvalidResponse(
            "Empty result_video location".to_string(),
        ));
    }
    base.join(location).map_err(|e| {
        DomainError::InvalidResponse(format!("Bad result_video location '{}': {}", location, e))
    })
}

/// Message to show for a failed submission
pub fn failure_message(error: &DomainError) -> String {
    match error.server_detail() {
        Some(detail) => detail.to_string(),
        None => GENERIC_FAILURE_MESSAGE.to_string(),
    }
}
