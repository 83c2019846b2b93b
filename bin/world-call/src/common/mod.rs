mod error;
mod hex;
mod logging;
mod provider;

pub use error::*;
pub use hex::*;
pub use logging::*;
pub use provider::*;
