pub use tonic::{Code, Status};

#[macro_use]
mod macros;
pub mod well_known;
