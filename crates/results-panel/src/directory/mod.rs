//! User directory: zone accounts, sign-in and the session context that
//! scopes every results view to the user's area.

pub mod codec;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;


pub use codec::{parse_users, write_users, USER_EXPORT_HEADER};
pub use domain::{
    area_of, normalize_zone, zone_key, AccessLevel, PasswordDigest, User, UserContext, UserDraft,
    UserView, ADMIN_ZONE,
};
pub use repository::UserRepository;
pub use router::directory_router;
pub use service::{DirectoryError, DirectoryService};
