//! Login account entities.

pub mod model;
pub mod principal;
pub mod role;

pub use model::UserAccount;
pub use principal::AuthenticatedUser;
pub use role::UserRole;
