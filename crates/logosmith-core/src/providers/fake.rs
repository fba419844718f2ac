//! Scripted provider doubles for tests.
//!
//! `ScriptedText` replays a queue of canned replies (or failures) in
//! order; `StubImages` mints sequential image URLs or fails every call.
//! Both are plain implementations of the provider traits, so the engine
//! and step handlers run against them unchanged.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ServerError;
use crate::workflow::state::ChatMessage;

use super::{GeneratedImage, ImageGenerator, TextGenerator};

/// Text generator that pops pre-loaded replies in order.
#[derive(Debug, Default)]
pub struct ScriptedText {
    replies: Mutex<VecDeque<Result<String, String>>>,
}

impl ScriptedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let script = Self::new();
        for reply in replies {
            script.push_reply(reply);
        }
        script
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(reply.into()));
    }

    pub fn push_failure(&self, message: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Err(message.into()));
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedText {
    async fn generate_text(&self, _messages: &[ChatMessage]) -> Result<String, ServerError> {
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(ServerError::Provider(message)),
            None => Err(ServerError::Internal(
                "scripted replies exhausted".to_string(),
            )),
        }
    }
}

/// Image generator that mints sequential URLs, or fails every call.
#[derive(Debug, Default)]
pub struct StubImages {
    counter: AtomicUsize,
    failure: Option<String>,
}

impl StubImages {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            counter: AtomicUsize::new(0),
            failure: Some(message.into()),
        }
    }

    pub fn calls(&self) -> usize {
        self.counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for StubImages {
    async fn generate_image(
        &self,
        prompt: &str,
        _width: u32,
        _height: u32,
        _style: &str,
    ) -> Result<GeneratedImage, ServerError> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(message) = &self.failure {
            return Err(ServerError::Provider(message.clone()));
        }
        Ok(GeneratedImage {
            image_url: format!("https://images.example.com/logo-{n}.png"),
            model: "stub:logo-diffusion".to_string(),
            prompt: prompt.to_string(),
        })
    }
}
