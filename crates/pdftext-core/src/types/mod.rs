//! Wire and data types for pdftext.

mod extraction;
mod health;
mod options;
mod remote;

pub use extraction::*;
pub use health::HealthStatus;
pub use options::RequestOptions;
pub use remote::*;
