pub mod database;

pub use database::ProductsDb;
