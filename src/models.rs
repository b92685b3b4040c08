pub mod address;
pub mod auth;
pub mod client;
pub mod pet;
pub mod petshop;
pub mod relation;
pub mod user;
pub mod worker;
