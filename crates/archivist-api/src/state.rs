//! Shared handler state.

use std::sync::Arc;

use crate::workflow::TransferFacade;

pub(crate) struct ApiState {
    pub(crate) transfers: Arc<dyn TransferFacade>,
}

impl ApiState {
    pub(crate) fn new(transfers: Arc<dyn TransferFacade>) -> Self {
        Self { transfers }
    }
}
