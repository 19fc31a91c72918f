//! In-process cover source for exercising strategies without a server.

use crate::core::{CoverLocator, CoverResource, CoverSource, FetchOutcome};
use crate::utils::error::FetchError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub fn cover(id: &str) -> CoverResource {
    CoverResource {
        id: id.to_string(),
        content: None,
    }
}

#[derive(Clone)]
pub enum Scripted {
    Absent(u16),
    DecodeError,
    /// Succeeds after sleeping.
    Delayed(Duration),
    /// Raises the given token and reports the request as cancelled.
    CancelCaller(CancellationToken),
}

pub struct ScriptedSource {
    script: HashMap<String, Scripted>,
    issued: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn all_ok() -> Self {
        Self {
            script: HashMap::new(),
            issued: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, key: &str, behaviour: Scripted) -> Self {
        self.script.insert(key.to_string(), behaviour);
        self
    }

    pub fn issued(&self) -> Vec<String> {
        self.issued.lock().unwrap().clone()
    }
}

#[async_trait]
impl CoverSource for ScriptedSource {
    async fn fetch(&self, locator: &CoverLocator, cancel: &CancellationToken) -> FetchOutcome {
        if cancel.is_cancelled() {
            return FetchOutcome::Cancelled;
        }
        self.issued.lock().unwrap().push(locator.key().to_string());

        match self.script.get(locator.key()).cloned() {
            None => FetchOutcome::Success(cover(locator.key())),
            Some(Scripted::Absent(status)) => FetchOutcome::Absent(status),
            Some(Scripted::DecodeError) => {
                let err = serde_json::from_str::<CoverResource>("{}").unwrap_err();
                FetchOutcome::Failed(FetchError::Decode(err))
            }
            Some(Scripted::Delayed(delay)) => {
                tokio::select! {
                    _ = cancel.cancelled() => FetchOutcome::Cancelled,
                    _ = tokio::time::sleep(delay) => FetchOutcome::Success(cover(locator.key())),
                }
            }
            Some(Scripted::CancelCaller(token)) => {
                token.cancel();
                FetchOutcome::Cancelled
            }
        }
    }
}
