use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{ChatModel, ModelReply, ModelRequest};
use crate::error::{OmniError, OmniResult};

/// One canned outcome for [`ScriptedModel`]
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Reply(ModelReply),
    Fail(String),
}

/// A pre-scripted model. Each call to `complete` pops the next outcome from
/// the front of the queue; an exhausted script fails the call.
#[derive(Clone, Default)]
pub struct ScriptedModel {
    script: Arc<Mutex<VecDeque<ScriptedReply>>>,
    /// The last request seen, so tests can inspect what was sent
    pub last_request: Arc<Mutex<Option<ModelRequest>>>,
}

impl ScriptedModel {
    pub fn new(script: Vec<ScriptedReply>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Convenience: a model that answers once with `text`
    pub fn always_text(text: impl Into<String>) -> Self {
        Self::new(vec![ScriptedReply::Reply(ModelReply::text(text))])
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn last_request(&self) -> Option<ModelRequest> {
        self.last_request.lock().ok().and_then(|r| r.clone())
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ModelRequest) -> OmniResult<ModelReply> {
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request);
        }

        let next = self
            .script
            .lock()
            .map_err(|_| OmniError::Model("script lock poisoned".into()))?
            .pop_front();

        match next {
            Some(ScriptedReply::Reply(reply)) => Ok(reply),
            Some(ScriptedReply::Fail(message)) => Err(OmniError::Model(message)),
            None => Err(OmniError::Model("script exhausted".into())),
        }
    }
}
