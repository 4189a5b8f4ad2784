//! # Reference Category Service
//!
//! Deterministic in-process implementation of the category service surface
//! (`GetStatus`, `GetCategory`, `ListCategories`, `GetChildCategories`,
//! `AddCategory`). It implements [`RpcClient`] directly, so the built-in
//! suites and the CLI can run without a network.
//!
//! Operation names match regardless of the case of their first letter:
//! `getStatus` and `GetStatus` are the same operation.

pub mod store;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::client::{ClientError, ClientResult, RpcClient};

pub use store::{is_valid_category_name, AddCategoryRejection, Category, CategoryStore};

pub const STATUS_OK: &str = "OK";

/// Operations served by [`InMemoryCategoryService`], in canonical spelling
pub const OPERATIONS: &[&str] = &[
    "GetStatus",
    "GetCategory",
    "ListCategories",
    "GetChildCategories",
    "AddCategory",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryList {
    pub categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct CategoryIdRequest {
    #[serde(rename = "categoryID", default)]
    category_id: String,
}

#[derive(Debug, Deserialize)]
struct AddCategoryRequest {
    #[serde(default)]
    name: String,
    #[serde(rename = "parentID")]
    parent_id: Option<String>,
}

#[derive(Debug)]
pub struct InMemoryCategoryService {
    status: String,
    store: RwLock<CategoryStore>,
}

impl Default for InMemoryCategoryService {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl InMemoryCategoryService {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            store: RwLock::new(CategoryStore::new(categories)),
        }
    }

    /// Seeded with `1 Sport`, `2 Football` (child of 1), and `3 Music`
    pub fn with_default_categories() -> Self {
        Self::new(vec![
            Category::new("1", "Sport", ""),
            Category::new("2", "Football", "1"),
            Category::new("3", "Music", ""),
        ])
    }

    /// Report `status` from `GetStatus` instead of `"OK"`
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn categories(&self) -> Vec<Category> {
        self.store.read().list().to_vec()
    }

    fn get_category(&self, request: Value) -> ClientResult<Value> {
        let category_id = required_category_id(request)?;
        let store = self.store.read();
        let category = store
            .get(&category_id)
            .ok_or_else(|| ClientError::not_found("Category", category_id.as_str()))?;
        Ok(serde_json::to_value(category)?)
    }

    fn list_categories(&self) -> ClientResult<Value> {
        let categories = self.categories();
        Ok(serde_json::to_value(CategoryList { categories })?)
    }

    fn get_child_categories(&self, request: Value) -> ClientResult<Value> {
        let category_id = required_category_id(request)?;
        let store = self.store.read();
        if store.get(&category_id).is_none() {
            return Err(ClientError::not_found("Category", category_id));
        }
        let categories = store.children(&category_id);
        Ok(serde_json::to_value(CategoryList { categories })?)
    }

    fn add_category(&self, request: Value) -> ClientResult<Value> {
        let request: AddCategoryRequest = serde_json::from_value(request)
            .map_err(|e| ClientError::invalid_request(format!("malformed AddCategory request: {e}")))?;
        let parent_id = request
            .parent_id
            .ok_or_else(|| ClientError::invalid_request("parentID is required"))?;

        let added = self
            .store
            .write()
            .add(&request.name, &parent_id)
            .map_err(|rejection| match rejection {
                AddCategoryRejection::InvalidName => {
                    ClientError::server_fault(422, "invalid category name")
                }
                AddCategoryRejection::DuplicateName => {
                    ClientError::server_fault(409, "duplicate category name")
                }
                AddCategoryRejection::ParentNotFound => {
                    ClientError::server_fault(422, "parentID not found")
                }
                AddCategoryRejection::TooNested => {
                    ClientError::server_fault(422, "category too nested")
                }
            })?;

        debug!(category_id = %added.id, name = %added.name, "Category added");
        Ok(serde_json::to_value(added)?)
    }
}

#[async_trait]
impl RpcClient for InMemoryCategoryService {
    fn transport_name(&self) -> &'static str {
        "in-memory"
    }

    async fn invoke(&self, operation: &str, request: Value) -> ClientResult<Value> {
        match canonical_operation(operation).as_str() {
            "GetStatus" => Ok(json!({ "status": self.status })),
            "GetCategory" => self.get_category(request),
            "ListCategories" => self.list_categories(),
            "GetChildCategories" => self.get_child_categories(request),
            "AddCategory" => self.add_category(request),
            _ => Err(ClientError::unknown_operation(operation)),
        }
    }
}

fn canonical_operation(operation: &str) -> String {
    let mut chars = operation.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn required_category_id(request: Value) -> ClientResult<String> {
    let request: CategoryIdRequest = serde_json::from_value(request)
        .map_err(|e| ClientError::invalid_request(format!("malformed category request: {e}")))?;
    if request.category_id.is_empty() {
        return Err(ClientError::invalid_request("categoryID is required"));
    }
    Ok(request.category_id)
}
