use super::domain::User;
pub use crate::metrics::repository::RepositoryError;

/// Storage for directory users. Zones are matched case-insensitively.
pub trait UserRepository: Send + Sync {
    fn list(&self) -> Result<Vec<User>, RepositoryError>;
    fn fetch(&self, zone: &str) -> Result<Option<User>, RepositoryError>;
    /// Fails with [`RepositoryError::Conflict`] when the zone is taken.
    fn insert(&self, user: User) -> Result<User, RepositoryError>;
    /// Stores `user` in place of the user at `zone`, which may rename it.
    fn update(&self, zone: &str, user: User) -> Result<User, RepositoryError>;
    fn delete(&self, zone: &str) -> Result<User, RepositoryError>;
    /// Drops every non-admin user and stores `users` instead.
    fn replace_field_users(&self, users: Vec<User>) -> Result<(), RepositoryError>;
}
