pub mod cli;
pub mod core;
pub mod providers;
pub mod ui;
pub mod utils;
