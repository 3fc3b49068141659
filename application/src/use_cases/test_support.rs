//! Scripted port implementations shared by use-case tests.

use crate::ports::chat_memory::{ChatMemoryProvider, SharedWindow};
use crate::ports::chat_model::{ChatModel, ChunkStream, GatewayError};
use async_trait::async_trait;
use code_helper_domain::{ConversationId, Message, MessageWindow};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Model that replays the same script for every request and records what it
/// was sent.
pub struct ScriptedModel {
    script: Vec<Result<String, GatewayError>>,
    delay: Option<Duration>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedModel {
    pub fn new(script: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            script,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(fragments: &[&str]) -> Self {
        Self::new(fragments.iter().map(|f| Ok(f.to_string())).collect())
    }

    /// Sleep before each fragment
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, messages: &[Message]) -> Result<String, GatewayError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        let mut reply = String::new();
        for item in &self.script {
            reply.push_str(&item.clone()?);
        }
        Ok(reply)
    }

    fn chat_stream(&self, messages: Vec<Message>) -> ChunkStream {
        self.requests.lock().unwrap().push(messages);
        let script = self.script.clone();
        let delay = self.delay;
        Box::pin(async_stream::stream! {
            for item in script {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                yield item;
            }
        })
    }
}

/// Unbounded map of windows, no eviction of whole conversations.
pub struct TestMemory {
    max_messages: usize,
    windows: Mutex<HashMap<ConversationId, SharedWindow>>,
}

impl TestMemory {
    pub fn new(max_messages: usize) -> Self {
        Self {
            max_messages,
            windows: Mutex::new(HashMap::new()),
        }
    }
}

impl ChatMemoryProvider for TestMemory {
    fn get_or_create(&self, id: ConversationId) -> SharedWindow {
        let max_messages = self.max_messages;
        self.windows
            .lock()
            .unwrap()
            .entry(id)
            .or_insert_with(|| {
                Arc::new(tokio::sync::Mutex::new(
                    MessageWindow::new(max_messages).unwrap(),
                ))
            })
            .clone()
    }

    fn get(&self, id: ConversationId) -> Option<SharedWindow> {
        self.windows.lock().unwrap().get(&id).cloned()
    }

    fn remove(&self, id: ConversationId) -> bool {
        self.windows.lock().unwrap().remove(&id).is_some()
    }

    fn conversation_count(&self) -> usize {
        self.windows.lock().unwrap().len()
    }
}
