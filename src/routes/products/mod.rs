pub mod product_handlers;
pub mod product_models;
