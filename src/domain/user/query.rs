//! Search parameters for the admin user search

/// Default number of users per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Query parameters for searching users
///
/// Every predicate is optional; an absent or blank one places no constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSearchQuery {
    /// Inclusive lower age bound, in whole years
    pub min_age: Option<i32>,
    /// Inclusive upper age bound, in whole years
    pub max_age: Option<i32>,
    /// Case-insensitive first name prefix
    pub first_name_prefix: Option<String>,
    /// Case-insensitive last name prefix
    pub last_name_prefix: Option<String>,
    /// Zero-based page index
    pub page: usize,
    /// Number of users per page
    pub page_size: usize,
}

impl Default for UserSearchQuery {
    fn default() -> Self {
        Self {
            min_age: None,
            max_age: None,
            first_name_prefix: None,
            last_name_prefix: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl UserSearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_age(mut self, age: i32) -> Self {
        self.min_age = Some(age);
        self
    }

    pub fn with_max_age(mut self, age: i32) -> Self {
        self.max_age = Some(age);
        self
    }

    pub fn with_first_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.first_name_prefix = Some(prefix.into());
        self
    }

    pub fn with_last_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.last_name_prefix = Some(prefix.into());
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// First name prefix, lowercased, or `None` when absent or blank
    pub fn normalized_first_name_prefix(&self) -> Option<String> {
        normalize_prefix(self.first_name_prefix.as_deref())
    }

    /// Last name prefix, lowercased, or `None` when absent or blank
    pub fn normalized_last_name_prefix(&self) -> Option<String> {
        normalize_prefix(self.last_name_prefix.as_deref())
    }
}

fn normalize_prefix(prefix: Option<&str>) -> Option<String> {
    prefix
        .filter(|p| !p.trim().is_empty())
        .map(str::to_lowercase)
}
