//! Domain entities - Core business objects with identity

mod body_metric;
mod category;
mod transaction;

pub use body_metric::{BodyMetric, NewBodyMetric};
pub use category::{default_categories, Category};
pub use transaction::Transaction;
