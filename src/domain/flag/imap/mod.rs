pub mod flag;
pub use flag::{from_raw, RawFlag};

pub mod flags;
