pub mod config;
pub mod error;
pub mod ir;
pub mod oas;
pub mod parse;
pub mod schema;
pub mod services;
pub mod transform;

pub use oas::OasApi;
