//! Request extractors.

mod params;

pub use params::{parse_id, Params};
