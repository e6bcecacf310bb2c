use std::io::Read;
use std::sync::Arc;

use tracing::{info, warn};

use super::codec::{parse_users, write_users};
use super::domain::{zone_key, User, UserContext, UserDraft, UserView, ADMIN_ZONE};
use super::repository::{RepositoryError, UserRepository};

/// Login, password maintenance and administration of directory users.
pub struct DirectoryService<U> {
    users: Arc<U>,
}

impl<U> DirectoryService<U>
where
    U: UserRepository + 'static,
{
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Creates the administrator account unless one exists. Returns whether it was created.
    pub fn seed_admin(&self, password: &str) -> Result<bool, DirectoryError> {
        if self.users.fetch(ADMIN_ZONE)?.is_some() {
            return Ok(false);
        }
        self.users.insert(User::admin(password))?;
        info!("administrator account created");
        Ok(true)
    }

    pub fn login(&self, zone: &str, password: &str) -> Result<UserContext, DirectoryError> {
        match self.users.fetch(zone)? {
            Some(user) if user.verify_password(password) => {
                info!(zone = %user.zone, "user signed in");
                Ok(user.context())
            }
            _ => {
                warn!(zone = %zone, "rejected sign-in attempt");
                Err(DirectoryError::InvalidCredentials)
            }
        }
    }

    pub fn change_password(
        &self,
        zone: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), DirectoryError> {
        let mut user = self
            .users
            .fetch(zone)?
            .ok_or_else(|| DirectoryError::UnknownUser(zone.to_string()))?;
        if !user.verify_password(old_password) {
            warn!(zone = %user.zone, "password change rejected");
            return Err(DirectoryError::InvalidCredentials);
        }

        user.set_password(new_password);
        let key = user.key();
        self.users.update(&key, user)?;
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<UserView>, DirectoryError> {
        Ok(self.users.list()?.iter().map(User::view).collect())
    }

    pub fn add(&self, draft: UserDraft) -> Result<UserView, DirectoryError> {
        if draft.zone.trim().is_empty() {
            return Err(DirectoryError::MissingZone);
        }
        let user = User::field(
            &draft.zone,
            draft.phone.as_deref().unwrap_or_default(),
            draft.password.as_deref().unwrap_or_default(),
        );
        let stored = self.users.insert(user)?;
        Ok(stored.view())
    }

    /// Applies `draft` to the user at `zone`. A missing phone or password keeps the
    /// current one; the administrator keeps its zone.
    pub fn update(&self, zone: &str, draft: UserDraft) -> Result<UserView, DirectoryError> {
        let mut user = self
            .users
            .fetch(zone)?
            .ok_or_else(|| DirectoryError::UnknownUser(zone.to_string()))?;

        if !user.is_admin() && !draft.zone.trim().is_empty() {
            user.rename(&draft.zone);
        }
        if let Some(phone) = draft.phone.as_deref() {
            user.phone = phone.trim().to_string();
        }
        if let Some(password) = draft.password.as_deref() {
            user.set_password(password);
        }

        let stored = self.users.update(&zone_key(zone), user)?;
        Ok(stored.view())
    }

    pub fn delete(&self, zone: &str) -> Result<UserView, DirectoryError> {
        let user = self
            .users
            .fetch(zone)?
            .ok_or_else(|| DirectoryError::UnknownUser(zone.to_string()))?;
        if user.is_admin() {
            return Err(DirectoryError::AdminProtected);
        }
        let removed = self.users.delete(zone)?;
        Ok(removed.view())
    }

    /// Replaces every field user with the rows of a `zone, phone, password` file.
    pub fn import_tsv<R: Read>(&self, reader: R) -> Result<usize, DirectoryError> {
        let drafts = parse_users(reader)?;
        if drafts.is_empty() {
            return Err(DirectoryError::EmptyImport);
        }

        let users: Vec<User> = drafts
            .iter()
            .map(|draft| {
                User::field(
                    &draft.zone,
                    draft.phone.as_deref().unwrap_or_default(),
                    draft.password.as_deref().unwrap_or_default(),
                )
            })
            .filter(|user| {
                if user.is_admin() {
                    warn!("administrator row ignored in user import");
                }
                !user.is_admin()
            })
            .collect();

        let count = users.len();
        self.users.replace_field_users(users)?;
        info!(users = count, "field users replaced");
        Ok(count)
    }

    pub fn export_tsv(&self) -> Result<String, DirectoryError> {
        let users = self.users.list()?;
        if users.iter().all(User::is_admin) {
            return Err(DirectoryError::NothingToExport);
        }
        let mut buffer = Vec::new();
        write_users(&mut buffer, &users)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Error raised by the directory service.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("invalid zone or password")]
    InvalidCredentials,
    #[error("user '{0}' not found")]
    UnknownUser(String),
    #[error("the administrator account cannot be deleted")]
    AdminProtected,
    #[error("zone is required")]
    MissingZone,
    #[error("user file is empty or malformed")]
    EmptyImport,
    #[error("no users to export besides the administrator")]
    NothingToExport,
    #[error("invalid tab-separated user data: {0}")]
    Tsv(#[from] csv::Error),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
