pub mod admin;
pub mod blog;
