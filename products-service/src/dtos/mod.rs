pub mod products;

pub use products::{
    CreateProductRequest, CreateProductResponse, ProductResponse, UpdateProductRequest,
};
