//! Shared fixtures for GeoNetwork client and harness tests
//!
//! Nothing here touches the network: transports replay scripted replies,
//! catalogs replay scripted search results, and waiters only record what
//! they were asked to wait.

#![allow(dead_code)]

use geonetwork_manager::geonetwork::client::CatalogClient;
use geonetwork_manager::geonetwork::error::{GnError, GnResult};
use geonetwork_manager::geonetwork::http::{validate_url, Transport, TransportError};
use geonetwork_manager::geonetwork::search::{SearchEntry, SearchRequest, SearchResponse};
use geonetwork_manager::geonetwork::test_harness::{WaitOutcome, Waiter};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One scripted HTTP reply
#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, Option<String>),
    Fail(String),
}

impl Reply {
    pub fn ok() -> Self {
        Reply::Status(200, None)
    }

    pub fn ok_body(body: &str) -> Self {
        Reply::Status(200, Some(body.to_string()))
    }

    pub fn status(status: u16) -> Self {
        Reply::Status(status, None)
    }
}

/// Request seen by a [`ScriptedTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub method: &'static str,
    pub url: String,
    pub body: Option<String>,
    pub ignoring_content: bool,
}

/// Transport that validates URLs like the real one, then replays replies
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: VecDeque<Reply>,
    pub requests: Vec<Recorded>,
    ignore_content: bool,
    last_status: Option<u16>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: replies.into(),
            ..Self::default()
        }
    }

    fn answer(
        &mut self,
        method: &'static str,
        url: &str,
        body: Option<&str>,
    ) -> Result<Option<String>, TransportError> {
        validate_url(url)?;
        self.last_status = None;
        self.requests.push(Recorded {
            method,
            url: url.to_string(),
            body: body.map(str::to_string),
            ignoring_content: self.ignore_content,
        });

        match self.replies.pop_front().unwrap_or(Reply::status(404)) {
            Reply::Status(status, body) => {
                self.last_status = Some(status);
                if status == 200 && !self.ignore_content {
                    Ok(body)
                } else {
                    Ok(None)
                }
            }
            Reply::Fail(reason) => Err(TransportError::Request {
                url: url.to_string(),
                reason,
            }),
        }
    }
}

impl Transport for ScriptedTransport {
    fn set_ignore_response_content_on_success(&mut self, ignore: bool) {
        self.ignore_content = ignore;
    }

    fn get(&mut self, url: &str) -> Result<Option<String>, TransportError> {
        self.answer("GET", url, None)
    }

    fn post_xml(&mut self, url: &str, body: &str) -> Result<Option<String>, TransportError> {
        self.answer("POST", url, Some(body))
    }

    fn last_status(&self) -> Option<u16> {
        self.last_status
    }
}

/// Catalog whose searches replay a script; the last response repeats
#[derive(Debug, Default)]
pub struct ScriptedCatalog {
    responses: VecDeque<SearchResponse>,
    pub ping_result: bool,
    pub searches: usize,
    pub searched_documents: Vec<PathBuf>,
    pub deleted: Vec<i64>,
    pub fail_search: bool,
}

impl ScriptedCatalog {
    pub fn new(responses: Vec<SearchResponse>) -> Self {
        Self {
            responses: responses.into(),
            ping_result: true,
            ..Self::default()
        }
    }

    /// Searches report these counts in turn, with no entries
    pub fn with_counts(counts: &[usize]) -> Self {
        Self::new(
            counts
                .iter()
                .map(|&count| SearchResponse::new(count, Vec::new()))
                .collect(),
        )
    }

    fn next_response(&mut self) -> GnResult<SearchResponse> {
        self.searches += 1;
        if self.fail_search {
            return Err(GnError::ServerError {
                url: "http://catalog/srv/eng/xml.search".to_string(),
                status: 500,
            });
        }
        let response = if self.responses.len() > 1 {
            self.responses.pop_front()
        } else {
            self.responses.front().cloned()
        };
        Ok(response.unwrap_or_default())
    }
}

impl CatalogClient for ScriptedCatalog {
    fn ping(&mut self) -> bool {
        self.ping_result
    }

    fn search(&mut self, _request: &SearchRequest) -> GnResult<SearchResponse> {
        self.next_response()
    }

    fn search_document(&mut self, document: &Path) -> GnResult<SearchResponse> {
        self.searched_documents.push(document.to_path_buf());
        self.next_response()
    }

    fn delete_metadata(&mut self, id: i64) -> GnResult<()> {
        self.deleted.push(id);
        Ok(())
    }
}

/// Waiter that records requested durations and returns scripted outcomes
/// (`Elapsed` once the script runs out) without sleeping
#[derive(Debug, Default)]
pub struct RecordingWaiter {
    pub waits: RefCell<Vec<Duration>>,
    outcomes: RefCell<VecDeque<WaitOutcome>>,
}

impl RecordingWaiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcomes(outcomes: Vec<WaitOutcome>) -> Self {
        Self {
            waits: RefCell::new(Vec::new()),
            outcomes: RefCell::new(outcomes.into()),
        }
    }

    pub fn waits_ms(&self) -> Vec<u128> {
        self.waits.borrow().iter().map(|d| d.as_millis()).collect()
    }
}

impl Waiter for RecordingWaiter {
    fn wait(&self, duration: Duration) -> WaitOutcome {
        self.waits.borrow_mut().push(duration);
        self.outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or(WaitOutcome::Elapsed)
    }
}

pub fn entries(ids: &[i64]) -> Vec<SearchEntry> {
    ids.iter()
        .map(|&id| SearchEntry::new(id, format!("uuid-{}", id)))
        .collect()
}

/// `xml.search` response body with the given ids
pub fn search_response_xml(ids: &[i64]) -> String {
    let mut xml = format!(
        "<response from=\"1\" to=\"{}\" selected=\"0\"><summary count=\"{}\" type=\"local\"/>",
        ids.len(),
        ids.len()
    );
    for id in ids {
        xml.push_str(&format!(
            "<metadata><geonet:info xmlns:geonet=\"http://www.fao.org/geonetwork\"><id>{}</id><uuid>uuid-{}</uuid></geonet:info></metadata>",
            id, id
        ));
    }
    xml.push_str("</response>");
    xml
}
