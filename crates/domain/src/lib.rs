#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod error;
mod exercise;
mod globals;
mod location;
mod name;
mod report;
mod service;
mod statistics;
mod time;
mod workout;

pub use error::*;
pub use exercise::*;
pub use globals::*;
pub use location::*;
pub use name::*;
pub use report::*;
pub use service::*;
pub use statistics::*;
pub use time::*;
pub use workout::*;
