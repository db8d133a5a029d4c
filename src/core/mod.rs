pub mod batch;
pub mod logger;
pub mod output;
pub mod query;

pub use batch::*;
pub use logger::*;
pub use output::*;
pub use query::*;
