//! Application module containing the headless streaming demo.

mod demo;

pub use demo::run_demo;
