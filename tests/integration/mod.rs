//! Integration tests for the scribe generation controller

mod resumability;
mod run_cli;
