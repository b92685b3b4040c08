pub mod auth;
pub mod client_service;
pub mod configuration_service;
pub mod email_block_service;
pub mod notification;
pub mod password;
pub mod petshop_service;
pub mod policy;
pub mod responsible_person_service;
pub mod tenancy_service;
pub mod worker_service;
