pub mod config;
pub mod context;
pub mod error;
pub mod features;
pub mod io;
pub mod ledger;
pub mod paths;
pub mod render;
pub mod section;
pub mod specs;
pub mod status;
pub mod tasks;
pub mod template;

pub use error::{CadenceError, Result};
