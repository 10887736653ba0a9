//! Types shared between the credential issuer and the upload client.

mod credential;
mod error;
mod wire;

pub use credential::*;
pub use error::*;
pub use wire::*;
