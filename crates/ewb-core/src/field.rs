//! Serde helpers shared by the record types.

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;

/// Treat `None` and the empty string alike: both mean "not provided".
pub(crate) fn provided(value: &Option<String>) -> Option<&str> {
  value.as_deref().filter(|v| !v.is_empty())
}

/// Overwrite `target` only when `value` carries a non-empty string.
pub(crate) fn merge_into(target: &mut String, value: Option<String>) {
  if let Some(v) = value.filter(|v| !v.is_empty()) {
    *target = v;
  }
}

/// Accept strings, numbers, booleans and `null` for string fields.
///
/// Older documents store `null` for fields that were never filled in, and
/// tax ids were sometimes typed in as bare numbers.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  match Value::deserialize(deserializer)? {
    Value::Null => Ok(String::new()),
    Value::String(s) => Ok(s),
    Value::Number(n) => Ok(n.to_string()),
    Value::Bool(b) => Ok(b.to_string()),
    other => Err(D::Error::custom(format!(
      "expected a string, found {other}"
    ))),
  }
}

/// Accept booleans, `null` (as `false`) and the strings `"true"`/`"false"`.
pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
  D: Deserializer<'de>,
{
  match Value::deserialize(deserializer)? {
    Value::Null => Ok(false),
    Value::Bool(b) => Ok(b),
    Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
    Value::String(s) if s.is_empty() || s.eq_ignore_ascii_case("false") => Ok(false),
    other => Err(D::Error::custom(format!(
      "expected a boolean, found {other}"
    ))),
  }
}

/// UTC timestamps as ISO-8601 with microsecond precision and a trailing `Z`.
/// A `null` reads as the Unix epoch.
pub(crate) mod timestamp {
  use chrono::{DateTime, SecondsFormat, Utc};
  use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

  pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, true))
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
  where
    D: Deserializer<'de>,
  {
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
      return Ok(DateTime::<Utc>::default());
    };
    DateTime::parse_from_rfc3339(&raw)
      .map(|dt| dt.with_timezone(&Utc))
      .map_err(|e| D::Error::custom(format!("invalid timestamp {raw:?}: {e}")))
  }
}

#[cfg(test)]
mod tests {
  use chrono::{DateTime, TimeZone, Utc};
  use serde::{Deserialize, Serialize};

  use super::*;

  #[derive(Serialize, Deserialize)]
  struct Stamped {
    #[serde(with = "timestamp")]
    at: DateTime<Utc>,
  }

  #[derive(Deserialize)]
  struct Loose {
    #[serde(deserialize_with = "lenient_string")]
    value: String,
  }

  #[test]
  fn timestamps_carry_trailing_z() {
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
    let json = serde_json::to_string(&Stamped { at }).unwrap();
    assert_eq!(json, r#"{"at":"2024-03-01T12:30:00.000000Z"}"#);

    let back: Stamped = serde_json::from_str(&json).unwrap();
    assert_eq!(back.at, at);
  }

  #[test]
  fn numeric_ids_are_stringified() {
    let loose: Loose = serde_json::from_str(r#"{"value": 20123456789}"#).unwrap();
    assert_eq!(loose.value, "20123456789");

    let loose: Loose = serde_json::from_str(r#"{"value": null}"#).unwrap();
    assert_eq!(loose.value, "");
  }

  #[derive(Deserialize)]
  struct Flag {
    #[serde(deserialize_with = "lenient_bool")]
    value: bool,
  }

  #[test]
  fn null_flags_read_as_false() {
    let flag: Flag = serde_json::from_str(r#"{"value": null}"#).unwrap();
    assert!(!flag.value);
    let flag: Flag = serde_json::from_str(r#"{"value": true}"#).unwrap();
    assert!(flag.value);
    assert!(serde_json::from_str::<Flag>(r#"{"value": [1]}"#).is_err());
  }

  #[test]
  fn null_timestamps_read_as_epoch() {
    let back: Stamped = serde_json::from_str(r#"{"at": null}"#).unwrap();
    assert_eq!(back.at, DateTime::<Utc>::default());
  }

  #[test]
  fn empty_strings_are_not_provided() {
    assert_eq!(provided(&Some(String::new())), None);
    assert_eq!(provided(&None), None);
    assert_eq!(provided(&Some("x".into())), Some("x"));
  }
}
