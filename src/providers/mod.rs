pub mod platform;

pub use platform::{ApiClient, FileAttachment, REFRESH_PATH};
