pub mod error;
pub mod persistence;
pub mod result;

pub use error::*;
pub use persistence::*;
pub use result::*;
