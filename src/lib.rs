pub mod config;
pub use config::*;

pub mod domain;
pub use domain::*;

pub mod transport;
pub use transport::*;

pub mod migrate;
pub use migrate::*;
