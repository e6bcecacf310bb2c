use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::metrics::filter::{PeriodFilter, Selector};

/// Zone name of the built-in administrator account.
pub const ADMIN_ZONE: &str = "ADMIN";
pub const ZONE_MAX_CHARS: usize = 12;
/// Leading zone characters that name the zone's area.
pub const AREA_CHARS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Admin,
    Field,
}

/// Truncates a zone name to [`ZONE_MAX_CHARS`] characters.
pub fn normalize_zone(raw: &str) -> String {
    raw.trim().chars().take(ZONE_MAX_CHARS).collect()
}

pub fn area_of(zone: &str) -> String {
    zone.chars().take(AREA_CHARS).collect()
}

/// Case-insensitive lookup key for a zone.
pub fn zone_key(zone: &str) -> String {
    normalize_zone(zone).to_uppercase()
}

/// SHA-256 digest of a password, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub fn of(password: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn matches(&self, candidate: &str) -> bool {
        Self::of(candidate) == *self
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub zone: String,
    pub area: String,
    pub phone: String,
    pub access: AccessLevel,
    password: PasswordDigest,
}

impl User {
    /// Field user; the zone is truncated and the area derived from it.
    pub fn field(zone: &str, phone: &str, password: &str) -> Self {
        let zone = normalize_zone(zone);
        Self {
            area: area_of(&zone),
            zone,
            phone: phone.trim().to_string(),
            access: AccessLevel::Field,
            password: PasswordDigest::of(password),
        }
    }

    pub fn admin(password: &str) -> Self {
        Self {
            zone: ADMIN_ZONE.to_string(),
            area: ADMIN_ZONE.to_string(),
            phone: String::new(),
            access: AccessLevel::Admin,
            password: PasswordDigest::of(password),
        }
    }

    /// Moves the user to another zone, re-deriving the area.
    pub fn rename(&mut self, zone: &str) {
        self.zone = normalize_zone(zone);
        self.area = area_of(&self.zone);
    }

    pub fn key(&self) -> String {
        zone_key(&self.zone)
    }

    pub fn is_admin(&self) -> bool {
        self.access == AccessLevel::Admin || self.zone.eq_ignore_ascii_case(ADMIN_ZONE)
    }

    pub fn verify_password(&self, candidate: &str) -> bool {
        self.password.matches(candidate)
    }

    pub fn set_password(&mut self, password: &str) {
        self.password = PasswordDigest::of(password);
    }

    pub fn password_digest(&self) -> &PasswordDigest {
        &self.password
    }

    pub fn context(&self) -> UserContext {
        UserContext {
            zone: self.zone.clone(),
            area: self.area.clone(),
            access: self.access,
        }
    }

    pub fn view(&self) -> UserView {
        UserView {
            zone: self.zone.clone(),
            area: self.area.clone(),
            phone: self.phone.clone(),
            access: self.access,
        }
    }
}

/// Public projection of a user; never carries the password digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub zone: String,
    pub area: String,
    pub phone: String,
    pub access: AccessLevel,
}

/// Authenticated session context handed to the results views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub zone: String,
    pub area: String,
    pub access: AccessLevel,
}

impl UserContext {
    /// Results filter scoped to the user's area.
    pub fn period_filter(&self, month: Selector, week: Selector) -> PeriodFilter {
        PeriodFilter::new(self.area.clone(), month, week)
    }
}

/// Incoming user data for create and update requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserDraft {
    pub zone: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}
