//! Client side of a direct upload: fetch a credential from the issuer, then
//! send the file straight to object storage with it.

mod client;
mod error;
mod file;
mod outcome;
mod progress;
mod storage_error;
mod transport;

pub use client::*;
pub use error::*;
pub use file::*;
pub use outcome::*;
pub use progress::*;
pub use storage_error::*;
pub use transport::*;

pub use direct_upload_types as types;
