//! Scripts for deploying the Smartys token and the transport and order
//! contracts built on it.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod cli;
pub mod client;
mod commands;
pub mod constants;
pub mod deployer;
pub mod errors;
pub mod network;
pub mod orchestrator;
pub mod registry;
pub mod types;
pub mod utils;
