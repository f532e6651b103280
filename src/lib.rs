pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod parity;

pub use error::{ErrorKind, KernelError, Result};
