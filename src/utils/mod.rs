pub mod validation;

pub use validation::{
    sanitize_database_name, validate_email, validate_subdomain, validate_website_type,
};
