use std::future::Future;

use super::AllowList;
use crate::error::FetchError;
use crate::handler::Requester;
use crate::logger;

/// Allow-list check wrapped around privileged handlers
#[derive(Debug, Clone)]
pub struct AccessGuard {
    allow_list: AllowList,
}

impl AccessGuard {
    pub const fn new(allow_list: AllowList) -> Self {
        Self { allow_list }
    }

    pub const fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// Check a requester against the allow list, logging the attempt
    pub fn check(&self, requester: &Requester) -> Result<(), FetchError> {
        let name = requester.display_name();
        logger::log_info(&format!(
            "@{name} ({}) is trying to access a privileged command",
            requester.id
        ));

        if self.allow_list.contains(requester.id) {
            Ok(())
        } else {
            logger::log_warning(&format!("Unauthorized access denied for {name}."));
            Err(FetchError::Unauthorized(requester.id))
        }
    }

    /// Run `handler` only if the requester passes [`check`](Self::check)
    ///
    /// On denial the handler is never invoked and the error is returned for
    /// the caller to turn into a reply.
    pub async fn privileged<F, Fut, T>(
        &self,
        requester: &Requester,
        handler: F,
    ) -> Result<T, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.check(requester)?;
        Ok(handler().await)
    }
}
