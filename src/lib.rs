pub mod library;
pub mod simulate;
pub mod charz;
pub mod dataset;
pub mod plot;
pub mod error;
pub use error::*;
