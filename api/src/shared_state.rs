use std::sync::Arc;

use direct_upload_storage::Issuer;

#[derive(Debug)]
pub struct InnerState {
    pub issuer: Issuer,
}

pub type State = Arc<InnerState>;
