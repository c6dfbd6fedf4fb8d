//! Domain model for templates, workouts and progress samples.
//!
//! # Responsibility
//! - Define canonical records returned by the data-access layer.
//! - Keep exercise defaults and numeric validation in one place.
//!
//! # Invariants
//! - Every record is identified by a stable UUID v4.
//! - Parent records are always returned hydrated, exercises ordered by
//!   `sort_order ASC`.

pub mod exercise;
pub mod progress;
pub mod template;
pub mod workout;
