// Data models for the admin API

pub mod charging_point;

pub use charging_point::{ChargingPoint, ChargingPointDraft, REQUIRED_FIELDS};
