pub mod db;
pub mod error;
pub mod util;

pub use error::{GenError, Result};
