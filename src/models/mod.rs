// src/models/mod.rs

pub mod operator;
pub mod product;
pub mod response;
