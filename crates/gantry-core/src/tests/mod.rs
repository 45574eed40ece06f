pub mod integration;
