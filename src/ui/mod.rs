pub mod output;
pub mod progress;

// Re-export output utilities
pub use output::{error, error_with_hint, header, info, section, success, url, warning};

// Re-export progress utilities
pub use progress::ProgressBar;
