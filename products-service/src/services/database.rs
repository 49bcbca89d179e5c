use crate::models::Product;
use futures::TryStreamExt;
use mongodb::{
    Client as MongoClient, Collection, Database, IndexModel,
    bson::{DateTime as BsonDateTime, Document, doc, oid::ObjectId},
    error::{ErrorKind, WriteFailure},
    options::{
        CreateCollectionOptions, FindOneAndUpdateOptions, FindOptions, IndexOptions,
        ReturnDocument,
    },
};
use service_core::error::AppError;

const COLLECTION_NAME: &str = "products";

// Server error code raised when a write violates the collection validator.
const DOCUMENT_VALIDATION_FAILURE: i32 = 121;

#[derive(Clone)]
pub struct ProductsDb {
    client: MongoClient,
    db: Database,
}

impl ProductsDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    /// Provision the products collection: a `$jsonSchema` validator enforcing
    /// the document shape server-side, plus the index backing list ordering.
    /// Safe to call on every startup.
    pub async fn initialize_collection(&self) -> Result<(), AppError> {
        let existing = self
            .db
            .list_collection_names(doc! { "name": COLLECTION_NAME })
            .await
            .map_err(|e| {
                tracing::error!("Failed to list collections: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        if existing.is_empty() {
            let options = CreateCollectionOptions::builder()
                .validator(product_schema())
                .build();

            self.db
                .create_collection(COLLECTION_NAME, options)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to create products collection: {}", e);
                    AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
                })?;

            tracing::info!(collection = COLLECTION_NAME, "Created collection with schema validator");
        } else {
            // Re-assert the validator so schema changes reach existing deployments
            self.db
                .run_command(
                    doc! { "collMod": COLLECTION_NAME, "validator": product_schema() },
                    None,
                )
                .await
                .map_err(|e| {
                    tracing::error!("Failed to update collection validator: {}", e);
                    AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
                })?;
        }

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": 1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_idx".to_string())
                    .build(),
            )
            .build();

        self.products()
            .create_index(created_at_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create created_at index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn products(&self) -> Collection<Product> {
        self.db.collection(COLLECTION_NAME)
    }

    /// Insert a product and return the identifier the store assigned.
    pub async fn insert(&self, product: &Product) -> Result<ObjectId, AppError> {
        let result = self
            .products()
            .insert_one(product, None)
            .await
            .map_err(classify_write_error)?;

        result.inserted_id.as_object_id().ok_or_else(|| {
            tracing::error!("Insert returned a non-ObjectId identifier");
            AppError::InternalError(anyhow::anyhow!("Store returned a non-ObjectId identifier"))
        })
    }

    /// All products, oldest first.
    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": 1 })
            .build();

        let cursor = self
            .products()
            .find(doc! {}, find_options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to query products: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        let products: Vec<Product> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect products: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;

        Ok(products)
    }

    /// Rename a product, returning the updated document, or `None` when the
    /// identifier matches nothing.
    pub async fn update_name(&self, id: ObjectId, name: &str) -> Result<Option<Product>, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.products()
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": { "name": name, "updated_at": BsonDateTime::now() } },
                options,
            )
            .await
            .map_err(classify_write_error)
    }

    /// Delete a product, returning the removed document, or `None` when the
    /// identifier matches nothing.
    pub async fn delete_by_id(&self, id: ObjectId) -> Result<Option<Product>, AppError> {
        self.products()
            .find_one_and_delete(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete product: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })
    }
}

fn product_schema() -> Document {
    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "required": ["name", "description", "price", "created_at", "updated_at"],
            "properties": {
                "name": { "bsonType": "string", "minLength": 1 },
                "description": { "bsonType": "string", "minLength": 1 },
                "price": { "bsonType": "number" },
                "created_at": { "bsonType": "date" },
                "updated_at": { "bsonType": "date" },
            }
        }
    }
}

// A write rejected by the collection validator is the caller's fault, not an
// infrastructure failure. Everything else stays a 500-class database error.
fn classify_write_error(err: mongodb::error::Error) -> AppError {
    let validation_failure = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DOCUMENT_VALIDATION_FAILURE
        }
        ErrorKind::Command(command_error) => command_error.code == DOCUMENT_VALIDATION_FAILURE,
        _ => false,
    };

    if validation_failure {
        AppError::BadRequest(anyhow::anyhow!("Document rejected by the products schema"))
    } else {
        tracing::error!("Products write failed: {}", err);
        AppError::DatabaseError(anyhow::anyhow!(err.to_string()))
    }
}
