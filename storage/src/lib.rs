mod config;
mod error;
mod issuer;
mod key;
mod oss;
mod policy;
mod presigned_url;
mod signature;

pub use config::*;
pub use error::*;
pub use issuer::*;
pub use key::*;
pub use policy::*;
pub use presigned_url::*;
pub use signature::sign_policy;
