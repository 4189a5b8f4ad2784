//! Category adjacency-list store backing the reference service.

use serde::{Deserialize, Serialize};

pub const MAX_CATEGORY_NAME_LEN: usize = 32;

/// A category node; an empty `parent_id` marks a top-level category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    #[serde(rename = "parentID")]
    pub parent_id: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: parent_id.into(),
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_empty()
    }
}

/// Why a category could not be added
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddCategoryRejection {
    InvalidName,
    DuplicateName,
    ParentNotFound,
    TooNested,
}

/// Names are letters with optional inner spaces, starting and ending with a
/// letter, at least three and at most 32 characters.
pub fn is_valid_category_name(name: &str) -> bool {
    let len = name.chars().count();
    if !(3..=MAX_CATEGORY_NAME_LEN).contains(&len) {
        return false;
    }

    let first_last_are_letters = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && name.chars().last().is_some_and(|c| c.is_ascii_alphabetic());

    first_last_are_letters && name.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')
}

#[derive(Debug, Clone, Default)]
pub struct CategoryStore {
    categories: Vec<Category>,
    next_id: u64,
}

impl CategoryStore {
    pub fn new(categories: Vec<Category>) -> Self {
        let next_id = categories
            .iter()
            .filter_map(|category| category.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            categories,
            next_id,
        }
    }

    pub fn list(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn children(&self, id: &str) -> Vec<Category> {
        self.categories
            .iter()
            .filter(|category| category.parent_id == id)
            .cloned()
            .collect()
    }

    pub fn name_exists(&self, name: &str) -> bool {
        self.categories.iter().any(|category| category.name == name)
    }

    /// Add a category under `parent_id` (empty for top level). Categories
    /// nest at most two levels deep.
    pub fn add(&mut self, name: &str, parent_id: &str) -> Result<Category, AddCategoryRejection> {
        if !is_valid_category_name(name) {
            return Err(AddCategoryRejection::InvalidName);
        }
        if self.name_exists(name) {
            return Err(AddCategoryRejection::DuplicateName);
        }
        if !parent_id.is_empty() {
            let parent = self
                .get(parent_id)
                .ok_or(AddCategoryRejection::ParentNotFound)?;
            if !parent.is_top_level() {
                return Err(AddCategoryRejection::TooNested);
            }
        }

        let category = Category::new(self.next_id.to_string(), name, parent_id);
        self.next_id += 1;
        self.categories.push(category.clone());
        Ok(category)
    }
}
