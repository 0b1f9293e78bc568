pub mod admin;
pub mod auth;
pub mod category;
pub mod image;
pub mod option;
pub mod question;
pub mod quiz;
pub mod stats;
pub mod verification;
pub mod web_connection;
