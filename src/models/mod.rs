pub mod comments;
pub mod posts;
pub mod query;
pub mod response;
pub mod tags;
pub mod users;
pub mod views;
