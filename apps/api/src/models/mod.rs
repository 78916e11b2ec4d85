pub mod output;
pub mod user;
