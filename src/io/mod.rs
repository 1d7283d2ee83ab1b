// CSV export/import and chart rendering
mod chart;
mod export;
mod import;

pub use chart::*;
pub use export::*;
pub use import::*;
