//! Data model: records and display payloads

mod record;
mod summary;
mod top;

pub use record::Record;
pub use summary::Summary;
pub use top::CityCount;
pub use top::StateCount;
