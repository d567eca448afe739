//! Admin search: filter, sort and paginate the user collection

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::user::{age_in_years, User, UserRepository, UserSearchQuery, UserValidationError};
use crate::domain::{CalendarClock, Clock, DomainError};
use crate::infrastructure::observability::record_search;

/// Default cap on the number of users returned per page
pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;

/// Filters, sorts and pages over every stored user
///
/// The whole collection is loaded and processed in memory; nothing is
/// written back.
pub struct UserSearchService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    max_page_size: usize,
}

impl<R: UserRepository + ?Sized> std::fmt::Debug for UserSearchService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserSearchService")
            .field("repository", &self.repository)
            .field("max_page_size", &self.max_page_size)
            .finish_non_exhaustive()
    }
}

impl<R: UserRepository + ?Sized> UserSearchService<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }

    /// Set the page size cap (builder pattern)
    pub fn with_max_page_size(mut self, max_page_size: usize) -> Self {
        self.max_page_size = max_page_size.max(1);
        self
    }

    /// Run a search and return one page of matching users
    ///
    /// Results are ordered by birth date, oldest first, then by first name.
    /// A page past the end of the results is empty rather than an error.
    pub async fn search(&self, query: &UserSearchQuery) -> Result<Vec<User>, DomainError> {
        if query.page_size == 0 {
            return Err(UserValidationError::InvalidPageSize.into());
        }

        let page_size = query.page_size.min(self.max_page_size);
        let filter = SearchFilter::new(query, self.clock.today());

        let mut matched: Vec<User> = self
            .repository
            .find_all()
            .await?
            .into_iter()
            .filter(|user| filter.matches(user))
            .collect();

        matched.sort_by(compare_for_listing);

        let total = matched.len();
        let page = page_window(matched, query.page, page_size);

        debug!(
            total,
            page = query.page,
            page_size,
            returned = page.len(),
            "User search completed"
        );
        record_search(total, page.len());

        Ok(page)
    }
}

/// Normalized search predicates
struct SearchFilter {
    today: NaiveDate,
    min_age: Option<i32>,
    max_age: Option<i32>,
    first_name_prefix: Option<String>,
    last_name_prefix: Option<String>,
}

impl SearchFilter {
    fn new(query: &UserSearchQuery, today: NaiveDate) -> Self {
        Self {
            today,
            min_age: query.min_age,
            max_age: query.max_age,
            first_name_prefix: query.normalized_first_name_prefix(),
            last_name_prefix: query.normalized_last_name_prefix(),
        }
    }

    fn matches(&self, user: &User) -> bool {
        self.matches_age(user)
            && has_prefix(user.first_name(), self.first_name_prefix.as_deref())
            && has_prefix(user.last_name(), self.last_name_prefix.as_deref())
    }

    /// Users without a birth date cannot satisfy an age bound
    fn matches_age(&self, user: &User) -> bool {
        if self.min_age.is_none() && self.max_age.is_none() {
            return true;
        }

        let Some(birth_date) = user.birth_date() else {
            return false;
        };

        let age = age_in_years(birth_date, self.today);

        self.min_age.is_none_or(|min| age >= min) && self.max_age.is_none_or(|max| age <= max)
    }
}

/// `prefix` must already be lowercased
fn has_prefix(value: &str, prefix: Option<&str>) -> bool {
    match prefix {
        Some(prefix) => value.to_lowercase().starts_with(prefix),
        None => true,
    }
}

/// Birth date ascending, then first name ascending; users without a
/// birth date go last. The user ID makes the order total.
fn compare_for_listing(a: &User, b: &User) -> Ordering {
    let by_birth_date = match (a.birth_date(), b.birth_date()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    by_birth_date
        .then_with(|| a.first_name().cmp(b.first_name()))
        .then_with(|| a.id().cmp(b.id()))
}

/// Slice `[page * page_size, page * page_size + page_size)` clamped to the
/// input length
fn page_window<T>(items: Vec<T>, page: usize, page_size: usize) -> Vec<T> {
    let Some(start) = page.checked_mul(page_size) else {
        return Vec::new();
    };

    if start >= items.len() {
        return Vec::new();
    }

    items.into_iter().skip(start).take(page_size).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{MockUserRepository, ProfileDetails, UserId};
    use crate::domain::FixedClock;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    fn user(first: &str, last: &str, birth: Option<(i32, u32, u32)>) -> User {
        let email = format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase());
        let mut user = User::new(UserId::generate(), first, last, email, "hash");

        if let Some((y, m, d)) = birth {
            user.upsert_profile(ProfileDetails {
                address: "Main Street 1".to_string(),
                birth_date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
                profile_image_url: "https://img.example.com/u.png".to_string(),
            });
        }

        user
    }

    /// Five users; on 2024-05-20 their ages are 34, 25, 20, 16 and 19
    fn fixture() -> Vec<User> {
        vec![
            user("Andrea", "Smith", Some((1990, 1, 15))),
            user("anna", "Jones", Some((1999, 5, 20))),
            user("Andres", "Brown", Some((2004, 1, 1))),
            user("Antonio", "Young", Some((2008, 3, 3))),
            user("Bea", "Black", Some((2005, 2, 2))),
        ]
    }

    fn create_service(users: Vec<User>) -> UserSearchService<InMemoryUserRepository> {
        UserSearchService::new(
            Arc::new(InMemoryUserRepository::with_users(users)),
            Arc::new(FixedClock(today())),
        )
    }

    fn first_names(users: &[User]) -> Vec<&str> {
        users.iter().map(User::first_name).collect()
    }

    #[tokio::test]
    async fn test_age_and_name_scenario() {
        let service = create_service(fixture());
        let query = UserSearchQuery::new()
            .with_min_age(18)
            .with_max_age(30)
            .with_first_name_prefix("an")
            .with_page(0)
            .with_page_size(2);

        let result = service.search(&query).await.unwrap();

        // Andrea is too old, Antonio too young, Bea does not match the prefix
        assert_eq!(first_names(&result), vec!["anna", "Andres"]);
    }

    #[tokio::test]
    async fn test_results_satisfy_predicates() {
        let service = create_service(fixture());
        let query = UserSearchQuery::new()
            .with_min_age(19)
            .with_last_name_prefix("B")
            .with_page_size(10);

        let result = service.search(&query).await.unwrap();

        assert_eq!(first_names(&result), vec!["Andres", "Bea"]);
        for u in &result {
            assert!(u.last_name().to_lowercase().starts_with('b'));
            assert!(age_in_years(u.birth_date().unwrap(), today()) >= 19);
        }
    }

    #[tokio::test]
    async fn test_age_bounds_are_inclusive() {
        let service = create_service(fixture());

        let exactly_25 = UserSearchQuery::new().with_min_age(25).with_max_age(25);
        let result = service.search(&exactly_25).await.unwrap();

        // anna turns 25 on the reference date
        assert_eq!(first_names(&result), vec!["anna"]);
    }

    #[tokio::test]
    async fn test_no_predicates_sorts_whole_collection() {
        let service = create_service(fixture());

        let result = service.search(&UserSearchQuery::new()).await.unwrap();

        assert_eq!(
            first_names(&result),
            vec!["Andrea", "anna", "Andres", "Bea", "Antonio"]
        );
    }

    #[tokio::test]
    async fn test_ties_on_birth_date_break_by_first_name() {
        let users = vec![
            user("carla", "A", Some((2000, 1, 1))),
            user("Carla", "B", Some((2000, 1, 1))),
            user("Bruno", "C", Some((2000, 1, 1))),
        ];
        let service = create_service(users);

        let result = service.search(&UserSearchQuery::new()).await.unwrap();

        // Case-sensitive ordering: uppercase sorts before lowercase
        assert_eq!(first_names(&result), vec!["Bruno", "Carla", "carla"]);
    }

    #[tokio::test]
    async fn test_full_ties_page_the_same_across_stores() {
        let twins: Vec<User> = (0..8)
            .map(|i| user("Ana", &format!("Twin{}", i), Some((2000, 1, 1))))
            .collect();

        let mut expected: Vec<UserId> = twins.iter().map(|u| *u.id()).collect();
        expected.sort();

        for _ in 0..10 {
            let service = create_service(twins.clone());
            let mut paged = Vec::new();

            for page in 0..3 {
                let query = UserSearchQuery::new().with_page(page).with_page_size(3);
                let chunk = service.search(&query).await.unwrap();
                paged.extend(chunk.iter().map(|u| *u.id()));
            }

            assert_eq!(paged, expected);
        }
    }

    #[tokio::test]
    async fn test_users_without_profile() {
        let users = vec![
            user("Zed", "NoProfile", None),
            user("Amy", "Dated", Some((2000, 1, 1))),
        ];
        let service = create_service(users);

        let all = service.search(&UserSearchQuery::new()).await.unwrap();
        assert_eq!(first_names(&all), vec!["Amy", "Zed"]);

        let aged = service
            .search(&UserSearchQuery::new().with_min_age(0))
            .await
            .unwrap();
        assert_eq!(first_names(&aged), vec!["Amy"]);
    }

    #[tokio::test]
    async fn test_pages_partition_the_results() {
        let service = create_service(fixture());
        let full = service.search(&UserSearchQuery::new()).await.unwrap();

        let mut concatenated = Vec::new();
        let mut page = 0;
        loop {
            let query = UserSearchQuery::new().with_page(page).with_page_size(2);
            let chunk = service.search(&query).await.unwrap();
            if chunk.is_empty() {
                break;
            }
            assert!(chunk.len() <= 2);
            concatenated.extend(chunk);
            page += 1;
        }

        assert_eq!(page, 3);
        let full_ids: Vec<_> = full.iter().map(|u| *u.id()).collect();
        let paged_ids: Vec<_> = concatenated.iter().map(|u| *u.id()).collect();
        assert_eq!(full_ids, paged_ids);
    }

    #[tokio::test]
    async fn test_repeated_searches_are_deterministic() {
        let service = create_service(fixture());
        let query = UserSearchQuery::new().with_first_name_prefix("A");

        let first: Vec<_> = service.search(&query).await.unwrap().iter().map(|u| *u.id()).collect();
        let second: Vec<_> = service.search(&query).await.unwrap().iter().map(|u| *u.id()).collect();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_page_beyond_end_is_empty() {
        let service = create_service(fixture());

        let result = service
            .search(&UserSearchQuery::new().with_page(7).with_page_size(2))
            .await
            .unwrap();
        assert!(result.is_empty());

        let overflow = service
            .search(&UserSearchQuery::new().with_page(usize::MAX).with_page_size(2))
            .await
            .unwrap();
        assert!(overflow.is_empty());
    }

    #[tokio::test]
    async fn test_zero_page_size_is_rejected() {
        let service = create_service(fixture());

        let error = service
            .search(&UserSearchQuery::new().with_page_size(0))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            DomainError::Validation(UserValidationError::InvalidPageSize)
        ));
    }

    #[tokio::test]
    async fn test_page_size_is_clamped() {
        let service = create_service(fixture()).with_max_page_size(3);

        let result = service
            .search(&UserSearchQuery::new().with_page_size(50))
            .await
            .unwrap();

        assert_eq!(result.len(), 3);
    }

    #[tokio::test]
    async fn test_storage_error_is_propagated() {
        let repository = Arc::new(MockUserRepository::new());
        repository.set_should_fail(true).await;
        let service = UserSearchService::new(repository, Arc::new(FixedClock(today())));

        let error = service.search(&UserSearchQuery::new()).await.unwrap_err();
        assert!(matches!(error, DomainError::Storage { .. }));
    }

    #[test]
    fn test_page_window_arithmetic() {
        let items: Vec<u32> = (0..5).collect();

        assert_eq!(page_window(items.clone(), 0, 2), vec![0, 1]);
        assert_eq!(page_window(items.clone(), 2, 2), vec![4]);
        assert!(page_window(items.clone(), 3, 2).is_empty());
        assert_eq!(page_window(items, 0, 10), vec![0, 1, 2, 3, 4]);
    }
}
