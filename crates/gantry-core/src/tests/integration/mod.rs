#![cfg(test)]

pub mod common;
pub mod config_driven_tests;
pub mod lifecycle_tests;
