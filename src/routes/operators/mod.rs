pub mod operator_handlers;
pub mod operator_models;
