//! LoggingMiddleware - logs the state around every action

use super::{Middleware, MiddlewareApi, Next};
use crate::action::Dispatchable;
use crate::dispatcher::DispatchResult;
use log::Level;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// One line written by the logging middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Before(String),
    Action(String),
    After(String),
}

/// In-memory copy of what the logging middleware wrote
#[derive(Debug, Clone, Default)]
pub struct LogJournal {
    entries: Rc<RefCell<Vec<LogEntry>>>,
}

impl LogJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    fn push(&self, entry: LogEntry) {
        self.entries.borrow_mut().push(entry);
    }
}

/// LoggingMiddleware - logs state before, the action, and state after
///
/// A pure observer: the action is always forwarded unchanged and the result of
/// the rest of the chain is returned as is.
pub struct LoggingMiddleware {
    level: Level,
    journal: Option<LogJournal>,
}

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self {
            level: Level::Debug,
            journal: None,
        }
    }

    /// Log at `level` instead of `debug`
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Also record every entry into `journal`
    pub fn with_journal(mut self, journal: LogJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    fn write(&self, entry: impl FnOnce() -> LogEntry) {
        if self.journal.is_none() && !log::log_enabled!(self.level) {
            return;
        }

        let entry = entry();
        match &entry {
            LogEntry::Before(state) => log::log!(self.level, "Before: {}", state),
            LogEntry::Action(action) => log::log!(self.level, "Action: {}", action),
            LogEntry::After(state) => log::log!(self.level, "After: {}", state),
        }
        if let Some(journal) = &self.journal {
            journal.push(entry);
        }
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> Middleware<S, A> for LoggingMiddleware
where
    S: fmt::Debug,
    A: fmt::Debug,
{
    fn handle(&self, action: Dispatchable<S, A>, api: &MiddlewareApi<S, A>, next: &Next<S, A>) -> DispatchResult {
        self.write(|| LogEntry::Before(format!("{:?}", api.state())));
        self.write(|| LogEntry::Action(format!("{:?}", action)));

        let result = next.dispatch(action);

        self.write(|| LogEntry::After(format!("{:?}", api.state())));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, Pipeline, Store};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
    enum Toggle {
        Init,
        Flip,
    }

    impl Action for Toggle {
        fn init() -> Self {
            Toggle::Init
        }

        fn action_type(&self) -> &'static str {
            match self {
                Toggle::Init => crate::INIT,
                Toggle::Flip => "FLIP",
            }
        }
    }

    fn reduce(state: &Rc<bool>, action: &Toggle) -> anyhow::Result<Rc<bool>> {
        match action {
            Toggle::Init => Ok(Rc::clone(state)),
            Toggle::Flip => Ok(Rc::new(!**state)),
        }
    }

    #[test]
    fn test_logs_before_action_after() {
        let journal = LogJournal::new();
        let store = Store::with_middleware(
            reduce,
            Pipeline::new().with(LoggingMiddleware::new().with_journal(journal.clone())),
        )
        .unwrap();

        store.dispatch(Toggle::Flip).unwrap();

        assert_eq!(
            journal.entries(),
            vec![
                LogEntry::Before("false".to_string()),
                LogEntry::Action("Flip".to_string()),
                LogEntry::After("true".to_string()),
            ]
        );
    }

    #[test]
    fn test_logging_forwards_errors() {
        let journal = LogJournal::new();
        let store = Store::with_middleware(
            reduce,
            Pipeline::new().with(LoggingMiddleware::new().with_journal(journal.clone())),
        )
        .unwrap();

        let result = store.dispatch(Dispatchable::Value(serde_json::json!(42)));

        assert!(result.unwrap_err().is_invalid_action());
        assert_eq!(journal.len(), 3);
        assert!(!*store.state());
    }
}
