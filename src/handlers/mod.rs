//! Command Handlers module
//!
//! The account service and the commands it executes.

mod account_service;
mod commands;


pub use account_service::AccountService;
pub use commands::*;
