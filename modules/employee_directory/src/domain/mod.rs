pub mod engine;
pub mod error;
pub mod events;
pub mod ports;
pub mod repo;
pub mod sample;
pub mod validation;
pub mod view;
