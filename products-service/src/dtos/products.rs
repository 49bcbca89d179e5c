use crate::models::Product;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    pub price: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CreateProductResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: product.name,
            description: product.description,
            price: product.price,
            created_at: product.created_at.to_rfc3339(),
            updated_at: product.updated_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_create_request_passes_validation() {
        let request = CreateProductRequest {
            name: "Test Product".to_string(),
            description: "A test product".to_string(),
            price: 100.0,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn empty_name_fails_validation() {
        let request = CreateProductRequest {
            name: String::new(),
            description: "A test product".to_string(),
            price: 100.0,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn empty_description_fails_validation() {
        let request = CreateProductRequest {
            name: "Test Product".to_string(),
            description: String::new(),
            price: 100.0,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn missing_description_fails_deserialization() {
        let body = r#"{"name": "Test Product", "price": 100}"#;
        assert!(serde_json::from_str::<CreateProductRequest>(body).is_err());
    }

    #[test]
    fn non_numeric_price_fails_deserialization() {
        let body = r#"{"name": "Test Product", "description": "A test product", "price": "abc"}"#;
        assert!(serde_json::from_str::<CreateProductRequest>(body).is_err());
    }

    #[test]
    fn update_request_rejects_empty_name() {
        let request = UpdateProductRequest {
            name: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn response_exposes_hex_identifier_and_rfc3339_timestamps() {
        let mut product = Product::new(
            "Grinder".to_string(),
            "Conical burr grinder".to_string(),
            89.5,
        );
        product.id = Some(mongodb::bson::oid::ObjectId::new());

        let response = ProductResponse::from(product);
        assert_eq!(response.id.len(), 24);
        assert!(response.created_at.contains('T'));
    }
}
