pub mod errors;
pub mod table;

pub use table::Table;
