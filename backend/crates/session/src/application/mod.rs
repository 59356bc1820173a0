pub mod client;
pub mod controller;
pub mod store;
