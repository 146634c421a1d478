use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const PERSON_CLASS: &str = "person";

const BYTES_PER_MB: f64 = 1_048_576.0;
const UNPROCESSED_SENTINEL: f64 = -1.0;

/// Per-clip activity metric. The backend reports `-1` (or nothing) for clips
/// the movement pass has not reached yet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Movement {
    #[default]
    Unprocessed,
    Score(f64),
}

impl Movement {
    pub fn score(&self) -> Option<f64> {
        match self {
            Movement::Unprocessed => None,
            Movement::Score(value) => Some(*value),
        }
    }

    pub fn is_processed(&self) -> bool {
        matches!(self, Movement::Score(_))
    }
}

impl Serialize for Movement {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Movement::Unprocessed => serializer.serialize_f64(UNPROCESSED_SENTINEL),
            Movement::Score(value) => serializer.serialize_f64(*value),
        }
    }
}

impl<'de> Deserialize<'de> for Movement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<f64>::deserialize(deserializer)?;
        Ok(match raw {
            Some(value) if value >= 0.0 && value.is_finite() => Movement::Score(value),
            _ => Movement::Unprocessed,
        })
    }
}

/// One reviewable video file and its derived metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    #[serde(deserialize_with = "vid_from_number_or_string")]
    pub vid: String,
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub modified: Option<f64>,
    #[serde(default)]
    pub movement: Movement,
    #[serde(default)]
    pub wildlife_prop: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub objects: Vec<String>,
    #[serde(default)]
    pub is_night: Option<bool>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl Clip {
    pub fn new(vid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            vid: vid.into(),
            name: name.into(),
            size: 0,
            modified: None,
            movement: Movement::Unprocessed,
            wildlife_prop: None,
            objects: Vec::new(),
            is_night: None,
            thumbnail_url: None,
        }
    }

    /// Modified timestamp in seconds; clips without one sort as the epoch.
    pub fn modified_secs(&self) -> f64 {
        self.modified.filter(|value| value.is_finite()).unwrap_or(0.0)
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        let secs = self.modified?;
        if !secs.is_finite() {
            return None;
        }
        let whole = secs.floor();
        let nanos = ((secs - whole) * 1e9) as u32;
        DateTime::from_timestamp(whole as i64, nanos)
    }

    pub fn wildlife_proportion(&self) -> f64 {
        self.wildlife_prop.filter(|value| value.is_finite()).unwrap_or(0.0)
    }

    pub fn is_night(&self) -> bool {
        self.is_night.unwrap_or(false)
    }

    pub fn has_objects(&self) -> bool {
        !self.objects.is_empty()
    }

    pub fn has_object(&self, class: &str) -> bool {
        self.objects.iter().any(|object| object == class)
    }

    /// Size in mebibytes with one decimal, e.g. `"12.3 MB"`.
    pub fn size_label(&self) -> String {
        format!("{:.1} MB", self.size as f64 / BYTES_PER_MB)
    }
}

fn vid_from_number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawVid {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match RawVid::deserialize(deserializer)? {
        RawVid::Text(text) => text,
        RawVid::Int(value) => value.to_string(),
        RawVid::Float(value) => value.to_string(),
    })
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_record_with_numeric_vid() {
        let json = r#"{"vid": 42, "name": "garden_0042.mp4", "size": 5242880,
            "objects": ["bird", "cat"], "thumbnail_url": "/api/thumbnail/42"}"#;
        let clip: Clip = serde_json::from_str(json).unwrap();

        assert_eq!(clip.vid, "42");
        assert_eq!(clip.size_label(), "5.0 MB");
        assert!(clip.has_object("cat"));
        assert_eq!(clip.movement, Movement::Unprocessed);
        assert_eq!(clip.modified_secs(), 0.0);
        assert_eq!(clip.wildlife_proportion(), 0.0);
        assert!(!clip.is_night());
    }

    #[test]
    fn absent_and_null_optionals_default() {
        let json = r#"{"vid": "a", "name": "a.mp4", "size": 1, "objects": null,
            "movement": -1, "modified": null}"#;
        let clip: Clip = serde_json::from_str(json).unwrap();

        assert!(clip.objects.is_empty());
        assert!(!clip.movement.is_processed());
        assert!(clip.modified_at().is_none());
    }

    #[test]
    fn movement_score_round_trips_through_sentinel() {
        let json = r#"{"vid": "b", "name": "b.mp4", "movement": 0.25, "modified": 1700000000.5}"#;
        let clip: Clip = serde_json::from_str(json).unwrap();

        assert_eq!(clip.movement.score(), Some(0.25));
        assert_eq!(clip.modified_at().map(|at| at.timestamp()), Some(1_700_000_000));

        let encoded = serde_json::to_value(Clip::new("c", "c.mp4")).unwrap();
        assert_eq!(encoded["movement"], serde_json::json!(-1.0));
    }
}
