use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};

/// A dealership as seeded from fixtures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dealership {
    pub id: i64,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,

    /// Descriptive fields (name, address, ...) carried through untouched.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// A stored customer review.
///
/// Only `id` is guaranteed; every other field is kept exactly as it was
/// seeded or submitted, and omitted when it never was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub dealership: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub review: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub purchase: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub car_make: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub car_model: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub car_year: Option<Value>,

    /// Fields outside the review schema, as found in fixtures.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Review submission body; the id is assigned on insert.
///
/// `name` and `dealership` are checked, the rest pass through verbatim.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewReview {
    pub name: String,
    #[serde(deserialize_with = "dealer_id")]
    pub dealership: i64,
    #[serde(default, deserialize_with = "present")]
    pub review: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub purchase: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub purchase_date: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub car_make: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub car_model: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub car_year: Option<Value>,
}

impl NewReview {
    /// Validate the submission
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Reviewer name cannot be empty".to_string());
        }
        if self.dealership <= 0 {
            return Err("Dealership id must be a positive integer".to_string());
        }
        Ok(())
    }

    pub fn with_id(self, id: i64) -> Review {
        Review {
            id,
            name: Some(Value::String(self.name)),
            dealership: Some(json!(self.dealership)),
            review: self.review,
            purchase: self.purchase,
            purchase_date: self.purchase_date,
            car_make: self.car_make,
            car_model: self.car_model,
            car_year: self.car_year,
            extra: Map::new(),
        }
    }
}

/// A field that is present is kept, even when it is `null`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Dealer ids arrive as numbers or, from path-driven clients, numeric strings.
fn dealer_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(id) => Ok(id),
        Raw::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("dealership must be an integer, got {text:?}"))),
    }
}
