pub mod data;
pub mod models;
pub mod server;
pub mod view;
