// Application layer: validation and use cases on top of the repository.

mod budget;
pub mod error;
mod reporting;
mod service;
mod transactions;

pub use budget::*;
pub use error::*;
pub use reporting::*;
pub use service::*;
pub use transactions::*;
