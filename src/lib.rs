pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod git;
pub mod inspector;
pub mod planner;
pub mod resolver;
pub mod ui;

pub use error::{ReleaseError, Result};
