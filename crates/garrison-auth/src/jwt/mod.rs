//! HS256 JWT implementation of the token signing capability.

pub mod claims;
pub mod signer;

pub use claims::Claims;
pub use signer::JwtSigner;
