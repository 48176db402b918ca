#![allow(dead_code)]
use async_trait::async_trait;
use chart_playlist::{ChartPlaylistError, FetchedPage, PageFetcher, PageRequest, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// How the scripted fetcher answers a URL
pub enum Scripted {
    Page { status: u16, body: String },
    Error(String),
}

/// In-memory [`PageFetcher`] that answers from a URL table and records requests.
///
/// Unknown URLs produce a transport error.
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: HashMap<String, Scripted>,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Scripted::Page {
                status: 200,
                body: body.to_string(),
            },
        );
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(
            url.to_string(),
            Scripted::Page {
                status,
                body: String::new(),
            },
        );
        self
    }

    pub fn error(mut self, url: &str, message: &str) -> Self {
        self.responses
            .insert(url.to_string(), Scripted::Error(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait(?Send)]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<FetchedPage> {
        self.requests.lock().unwrap().push(request.clone());

        match self.responses.get(&request.url) {
            Some(Scripted::Page { status, body }) => Ok(FetchedPage {
                url: request.url.clone(),
                status: *status,
                body: body.clone(),
            }),
            Some(Scripted::Error(message)) => Err(ChartPlaylistError::Http(message.clone())),
            None => Err(ChartPlaylistError::Http(format!(
                "no scripted response for {}",
                request.url
            ))),
        }
    }
}
