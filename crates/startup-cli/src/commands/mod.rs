//! Command implementations.

pub mod generate;
pub mod load;

pub use self::generate::execute_generate;
pub use self::load::execute_load;
