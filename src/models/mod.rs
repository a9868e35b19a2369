//! Core data models for the cellar service.
//!
//! `Bottle` maps to the `bottles` table via `sqlx::FromRow` and serializes
//! as camelCase JSON via `serde`. `CellarStats` is derived from bottles and
//! never stored.

pub mod bottle;
pub mod stats;
