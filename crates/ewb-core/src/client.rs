//! Client records and the `clients.json` document.
//!
//! A client is keyed by its tax identifier (`cuit`) whenever one is known;
//! otherwise a random UUID stands in as the primary key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::field::{lenient_string, merge_into, provided, timestamp};

// ─── Record ──────────────────────────────────────────────────────────────────

/// A stored client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Client {
  /// Equals `cuit` when the client was created with one.
  #[serde(deserialize_with = "lenient_string")]
  pub id:            String,
  #[serde(deserialize_with = "lenient_string")]
  pub name:          String,
  /// Tax identifier (CUIT/CUIL); the natural key when non-empty.
  #[serde(deserialize_with = "lenient_string")]
  pub cuit:          String,
  #[serde(deserialize_with = "lenient_string")]
  pub address:       String,
  #[serde(deserialize_with = "lenient_string")]
  pub contact_name:  String,
  #[serde(deserialize_with = "lenient_string")]
  pub contact_email: String,
  #[serde(deserialize_with = "lenient_string")]
  pub contact_phone: String,
  #[serde(with = "timestamp")]
  pub created_at:    DateTime<Utc>,
  #[serde(with = "timestamp")]
  pub updated_at:    DateTime<Utc>,
  /// Fields this version does not know about, written back untouched.
  #[serde(flatten)]
  pub extra:         Map<String, Value>,
}

impl Client {
  /// Build a fresh record from `input`. Unspecified fields are empty.
  pub fn create(input: ClientInput, now: DateTime<Utc>) -> Self {
    let cuit = input.cuit().map(str::to_owned);
    let id = cuit.clone().unwrap_or_else(|| Uuid::new_v4().to_string());

    Self {
      id,
      name: input.name.unwrap_or_default(),
      cuit: cuit.unwrap_or_default(),
      address: input.address.unwrap_or_default(),
      contact_name: input.contact_name.unwrap_or_default(),
      contact_email: input.contact_email.unwrap_or_default(),
      contact_phone: input.contact_phone.unwrap_or_default(),
      created_at: now,
      updated_at: now,
      extra: Map::new(),
    }
  }

  /// Merge the provided fields of `input` onto this record and bump
  /// `updated_at`. Omitted or empty fields keep their previous value; the
  /// keys (`id`, `cuit`) never change.
  pub fn merge(&mut self, input: ClientInput, now: DateTime<Utc>) {
    merge_into(&mut self.name, input.name);
    merge_into(&mut self.address, input.address);
    merge_into(&mut self.contact_name, input.contact_name);
    merge_into(&mut self.contact_email, input.contact_email);
    merge_into(&mut self.contact_phone, input.contact_phone);
    self.updated_at = now;
  }

  /// Whether this record carries the given (already normalised) tax id.
  pub fn has_cuit(&self, cuit: &str) -> bool {
    normalize_cuit(&self.cuit).is_some_and(|own| own == cuit)
  }
}

/// Trim a tax id; blank ids are treated as absent.
pub fn normalize_cuit(raw: &str) -> Option<&str> {
  Some(raw.trim()).filter(|c| !c.is_empty())
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// Input to [`crate::store::Datastore::add_or_update_client`].
///
/// `None` and `""` both mean "not provided".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientInput {
  pub name:          Option<String>,
  pub cuit:          Option<String>,
  pub address:       Option<String>,
  pub contact_name:  Option<String>,
  pub contact_email: Option<String>,
  pub contact_phone: Option<String>,
}

impl ClientInput {
  /// The normalised tax id, if one was supplied.
  pub fn cuit(&self) -> Option<&str> {
    provided(&self.cuit).and_then(normalize_cuit)
  }
}

// ─── Document ────────────────────────────────────────────────────────────────

/// The on-disk shape of `clients.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientsDocument {
  #[serde(default)]
  pub clients: Vec<Client>,
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone};

  use super::*;

  fn at(secs: i64) -> DateTime<Utc> { Utc.timestamp_opt(secs, 0).unwrap() }

  #[test]
  fn create_uses_cuit_as_id() {
    let client = Client::create(
      ClientInput {
        name: Some("Acme".into()),
        cuit: Some(" 30-71234567-8 ".into()),
        ..Default::default()
      },
      at(1_000),
    );

    assert_eq!(client.id, "30-71234567-8");
    assert_eq!(client.cuit, "30-71234567-8");
    assert_eq!(client.address, "");
    assert_eq!(client.created_at, client.updated_at);
  }

  #[test]
  fn create_without_cuit_generates_uuid() {
    let client = Client::create(ClientInput::default(), at(1_000));
    assert!(Uuid::parse_str(&client.id).is_ok());
    assert_eq!(client.cuit, "");
  }

  #[test]
  fn merge_keeps_omitted_and_empty_fields() {
    let mut client = Client::create(
      ClientInput {
        name: Some("Acme".into()),
        cuit: Some("20-1".into()),
        address: Some("Main St 1".into()),
        ..Default::default()
      },
      at(1_000),
    );

    client.merge(
      ClientInput {
        name: Some("Acme SA".into()),
        address: Some(String::new()),
        contact_email: Some("ops@acme.test".into()),
        ..Default::default()
      },
      at(1_000) + Duration::seconds(5),
    );

    assert_eq!(client.name, "Acme SA");
    assert_eq!(client.address, "Main St 1");
    assert_eq!(client.contact_email, "ops@acme.test");
    assert_eq!(client.id, "20-1");
    assert!(client.updated_at > client.created_at);
  }

  #[test]
  fn unknown_fields_survive_a_roundtrip() {
    let raw = r#"{"id": "1", "cuit": 1, "legacy_code": "X9"}"#;
    let client: Client = serde_json::from_str(raw).unwrap();
    assert_eq!(client.cuit, "1");
    assert_eq!(client.extra.get("legacy_code"), Some(&Value::from("X9")));

    let back = serde_json::to_value(&client).unwrap();
    assert_eq!(back["legacy_code"], "X9");
  }
}
