pub mod group;
pub mod notification;
pub mod transaction;
pub mod user;
