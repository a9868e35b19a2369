//! Represents a bottle record and the request bodies that create or patch it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// Largest quantity a single record may carry.
pub const MAX_COUNT: i64 = 1_000_000;

/// A single wine-inventory record owned by one user.
///
/// Serialized with camelCase keys; the owner is exposed as `user` and the
/// creation timestamp as `date`.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bottle {
    /// Identifier generated at creation.
    pub id: Uuid,

    /// Caller that created the bottle. Never changes afterwards.
    #[serde(rename = "user")]
    pub owner_id: String,

    /// Product name, always non-empty.
    pub product: String,

    pub vintage: Option<i32>,
    pub varietal: Option<String>,

    /// Number of bottles this record stands for.
    pub count: Option<i64>,

    /// Estimated current value per bottle.
    pub price: Option<f64>,
    pub cost_per_bottle: Option<f64>,
    pub total_cost: Option<f64>,

    /// Bottle size label (e.g. "750ml").
    pub size: Option<String>,

    /// Two-letter country code.
    pub country_code: Option<String>,

    /// Opaque caller-defined label such as `pending`, `in-cellar` or `consumed`.
    pub status: Option<String>,

    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/bottles`.
#[derive(Deserialize, Validate, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewBottle {
    #[validate(
        required(message = "Product is required"),
        length(min = 1, message = "Product is required")
    )]
    pub product: Option<String>,

    pub vintage: Option<i32>,
    pub varietal: Option<String>,

    #[validate(range(min = 0, max = 1_000_000, message = "Count must be between 0 and 1000000"))]
    pub count: Option<i64>,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,

    #[validate(range(min = 0.0, message = "Cost per bottle cannot be negative"))]
    pub cost_per_bottle: Option<f64>,

    #[validate(range(min = 0.0, message = "Total cost cannot be negative"))]
    pub total_cost: Option<f64>,

    pub size: Option<String>,

    #[validate(length(equal = 2, message = "Country code must be two characters"))]
    pub country_code: Option<String>,

    pub status: Option<String>,
}

/// Body of `PUT /api/bottles/{id}`.
///
/// Every field is tri-state: `None` means the key was omitted and the stored
/// value is kept, `Some(None)` means an explicit `null` that clears the
/// column, `Some(Some(v))` overwrites it (including `0` and `""`).
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BottlePatch {
    #[serde(default, deserialize_with = "present")]
    pub product: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub vintage: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub varietal: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub count: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub cost_per_bottle: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub total_cost: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub size: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub country_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Option<String>>,
}

impl BottlePatch {
    /// True when the body named no field at all.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// Mirrors the rules declared on `NewBottle`, applied only to supplied keys.
impl Validate for BottlePatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match &self.product {
            Some(None) => errors.add("product", field_error("required", "Product cannot be cleared")),
            Some(Some(product)) if product.is_empty() => {
                errors.add("product", field_error("length", "Product is required"))
            }
            _ => {}
        }

        if let Some(Some(count)) = self.count {
            if !(0..=MAX_COUNT).contains(&count) {
                errors.add("count", field_error("range", "Count must be between 0 and 1000000"));
            }
        }

        let amounts = [
            ("price", self.price, "Price cannot be negative"),
            ("cost_per_bottle", self.cost_per_bottle, "Cost per bottle cannot be negative"),
            ("total_cost", self.total_cost, "Total cost cannot be negative"),
        ];
        for (field, value, message) in amounts {
            if let Some(Some(amount)) = value {
                if amount < 0.0 {
                    errors.add(field, field_error("range", message));
                }
            }
        }

        if let Some(Some(code)) = &self.country_code {
            if code.chars().count() != 2 {
                errors.add(
                    "country_code",
                    field_error("length", "Country code must be two characters"),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Wraps any present value (including `null`) in `Some`, so that an absent
/// key falls back to `None` through `#[serde(default)]`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
