pub mod login;
pub mod operators;
pub mod products;
pub mod routes;
