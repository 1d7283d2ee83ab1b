mod budget;
mod money;
mod month;
mod transaction;

pub use budget::*;
pub use money::*;
pub use month::*;
pub use transaction::*;
