pub mod errors;
pub mod extract;
pub mod routes;
pub mod startup;
pub mod openapi;

pub use startup::run;
