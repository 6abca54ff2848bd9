pub mod config;
pub mod domain;
pub mod error;
pub mod types;

pub use config::Config;
pub use domain::{extract_domain, normalize_domain};
pub use error::VeracityError;
pub use types::*;
