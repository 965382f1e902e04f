//! @acp:module "Commands"
//! @acp:summary "CLI command implementations"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Each command is in its own submodule.

pub mod convert;
pub mod init;
pub mod units;

pub use convert::{execute_convert, run_convert, ConvertOptions, ConvertRun};
pub use init::{execute_init, InitOptions};
pub use units::{execute_units, list_units, UnitEntry, UnitsOptions};
