mod extend;
mod fillet;
mod trim;

pub use extend::Extend;
pub use fillet::{Fillet, FilletResult};
pub use trim::Trim;

pub(crate) use trim::{param_eps, resize};
