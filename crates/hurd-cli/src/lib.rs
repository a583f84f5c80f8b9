#![deny(warnings)]
pub mod config;
pub mod demo;
pub mod events;
pub mod logging;
pub mod report;
pub mod session;
