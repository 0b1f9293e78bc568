pub mod answer;
pub mod category;
pub mod image;
pub mod option;
pub mod question;
pub mod role;
pub mod stats;
pub mod user;
pub mod web_connection;
