pub mod images;
pub mod projects;
pub mod reports;

use crate::macros::numeric_id;
use serde::de::{self, DeserializeOwned, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt::Display;

numeric_id!(ProjectId, "project");
numeric_id!(ReportId, "report");

/// Parses a numeric id out of the shapes the backend has been seen to produce:
/// `7`, ` 7 `, and the doubly encoded `"7"`.
pub fn parse_numeric_id(raw: &str) -> Option<u64> {
    let mut value = raw.trim();
    while let Some(inner) = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        value = inner.trim();
    }
    value.parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdParseError {
    kind: &'static str,
    raw: String,
}

impl IdParseError {
    pub fn new(kind: &'static str, raw: &str) -> Self {
        Self {
            kind,
            raw: raw.to_string(),
        }
    }
}

impl Display for IdParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {} ID '{}': expected a number", self.kind, self.raw)
    }
}

impl std::error::Error for IdParseError {}

pub struct NumericIdVisitor {
    kind: &'static str,
}

impl NumericIdVisitor {
    pub fn new(kind: &'static str) -> Self {
        Self { kind }
    }
}

impl<'de> Visitor<'de> for NumericIdVisitor {
    type Value = u64;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "a {} ID as a number or numeric string", self.kind)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<u64, E> {
        Ok(value)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<u64, E> {
        u64::try_from(value).map_err(|_| E::custom(IdParseError::new(self.kind, &value.to_string())))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<u64, E> {
        parse_numeric_id(value).ok_or_else(|| E::custom(IdParseError::new(self.kind, value)))
    }
}

/// Image ids are opaque strings; some backends emit them as numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ImageId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for ImageId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ImageIdVisitor;

        impl<'de> Visitor<'de> for ImageIdVisitor {
            type Value = ImageId;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("an image ID as a string or number")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<ImageId, E> {
                Ok(ImageId(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<ImageId, E> {
                Ok(ImageId(value.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<ImageId, E> {
                Ok(ImageId(value.to_string()))
            }
        }

        deserializer.deserialize_any(ImageIdVisitor)
    }
}

/// Body of a create call. The backend answers either with the bare id or with `{"id": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Created<Id> {
    Wrapped { id: Id },
    Bare(Id),
}

impl<Id> Created<Id> {
    pub fn into_id(self) -> Id {
        match self {
            Created::Wrapped { id } | Created::Bare(id) => id,
        }
    }
}

/// A list body that drops entries it cannot decode instead of failing the whole
/// list. A project with a non-numeric id is skipped and logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lenient<T>(Vec<T>);

impl<T> Lenient<T> {
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Lenient<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = Vec::<Value>::deserialize(deserializer)?;
        let items = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("Skipping list entry {}: {}", index, e);
                    None
                }
            })
            .collect();
        Ok(Self(items))
    }
}

/// One detected angle on a report, e.g. `{"name": "Hallux Valgus angle", "value": "23°"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AngleMeasurement {
    #[serde(rename = "name")]
    pub label: String,
    pub value: String,
}

impl AngleMeasurement {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_id_from_number() {
        let id: ProjectId = serde_json::from_str("7").unwrap();
        assert_eq!(id, ProjectId::new(7));
    }

    #[test]
    fn test_project_id_from_digit_string() {
        let id: ProjectId = serde_json::from_str(r#""42""#).unwrap();
        assert_eq!(id.inner(), 42);
    }

    #[test]
    fn test_report_id_from_quote_wrapped_string() {
        let id: ReportId = serde_json::from_str(r#""\"13\"""#).unwrap();
        assert_eq!(id, ReportId::new(13));
    }

    #[test]
    fn test_id_rejects_garbage() {
        assert!(serde_json::from_str::<ProjectId>(r#""abc""#).is_err());
        assert!(serde_json::from_str::<ProjectId>("-3").is_err());
        assert!("12a".parse::<ReportId>().is_err());
    }

    #[test]
    fn test_id_from_str_trims_quotes_and_whitespace() {
        assert_eq!(" \"5\" ".parse::<ProjectId>().unwrap(), ProjectId::new(5));
        let err = "x".parse::<ProjectId>().unwrap_err();
        assert_eq!(err.to_string(), "invalid project ID 'x': expected a number");
    }

    #[test]
    fn test_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ReportId::new(9)).unwrap(), "9");
    }

    #[test]
    fn test_image_id_accepts_string_and_number() {
        let a: ImageId = serde_json::from_str(r#""img-1""#).unwrap();
        let b: ImageId = serde_json::from_str("31").unwrap();
        assert_eq!(a.as_str(), "img-1");
        assert_eq!(b.as_str(), "31");
    }

    #[test]
    fn test_created_accepts_bare_and_wrapped_ids() {
        let bare: Created<ProjectId> = serde_json::from_str("7").unwrap();
        let quoted: Created<ProjectId> = serde_json::from_str(r#""7""#).unwrap();
        let wrapped: Created<ProjectId> = serde_json::from_str(r#"{"id": "7"}"#).unwrap();
        assert_eq!(bare.into_id(), ProjectId::new(7));
        assert_eq!(quoted.into_id(), ProjectId::new(7));
        assert_eq!(wrapped.into_id(), ProjectId::new(7));
    }

    #[test]
    fn test_lenient_list_skips_entries_with_unusable_ids() {
        let json = r#"[
            {"id": 1, "name": "Alpha", "patientId": "PAC-1"},
            {"id": "legacy-a7f", "name": "Imported", "patientId": "PAC-2"},
            {"id": "3", "name": "Gamma", "patientId": "PAC-3"}
        ]"#;
        let projects: Lenient<projects::Project> = serde_json::from_str(json).unwrap();
        let names: Vec<String> = projects.into_vec().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Alpha", "Gamma"]);
    }

    #[test]
    fn test_lenient_list_still_requires_an_array() {
        assert!(serde_json::from_str::<Lenient<projects::Project>>(r#"{"detail": "x"}"#).is_err());
    }

    #[test]
    fn test_angle_measurement_wire_name() {
        let angle = AngleMeasurement::new("Hallux Valgus angle", "23°");
        let json = serde_json::to_value(&angle).unwrap();
        assert_eq!(json["name"], "Hallux Valgus angle");
        assert_eq!(json["value"], "23°");
    }
}
