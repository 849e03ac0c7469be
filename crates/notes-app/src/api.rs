//! Stand-in for the note server
//!
//! Answers every request after a fixed latency. Ids are handed out when a
//! request completes, counting from 1.

use serde::Deserialize;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// What the server answers to a create request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedNote {
    pub id: String,
}

/// Mocked server API; clones share the id counter
#[derive(Debug, Clone)]
pub struct MockServerApi {
    latency: Duration,
    last_id: Rc<Cell<u64>>,
}

impl MockServerApi {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            last_id: Rc::new(Cell::new(0)),
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub async fn create_note(&self) -> CreatedNote {
        log::debug!("MockServerApi: create_note (answering in {:?})", self.latency);
        tokio::time::sleep(self.latency).await;

        let id = self.last_id.get() + 1;
        self.last_id.set(id);
        log::debug!("MockServerApi: created note {}", id);

        CreatedNote { id: id.to_string() }
    }
}
