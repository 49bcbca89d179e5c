use products_service::config::{MongoConfig, ProductsConfig};
use products_service::services::ProductsDb;
use products_service::startup::Application;
use service_core::config::Config as CoreConfig;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub db: ProductsDb,
    pub db_name: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        // Use random port for testing (port 0)
        let config = ProductsConfig {
            common: CoreConfig {
                port: 0,
                environment: "dev".to_string(),
            },
            mongodb: MongoConfig {
                uri: std::env::var("TEST_MONGODB_URI")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
                database: format!("products_test_{}", Uuid::new_v4()),
            },
        };
        let db_name = config.mongodb.database.clone();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            db,
            db_name,
        }
    }

    /// Drop the database backing this test app.
    pub async fn cleanup(&self) {
        let _ = self
            .db
            .client()
            .database(&self.db_name)
            .drop(None)
            .await;
    }
}
