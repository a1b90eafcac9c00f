pub mod issuer;

pub use issuer::IssuedToken;
pub use issuer::VerificationTokenIssuer;
