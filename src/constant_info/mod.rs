pub mod types;

pub use self::types::*;
