pub mod email;
pub mod json;
