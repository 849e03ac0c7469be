//! The running note app: store, middleware, mounted views and command handling

use crate::actions::NoteAction;
use crate::api::MockServerApi;
use crate::commands::{Command, HELP};
use crate::reducer::reduce;
use crate::state::{NoteId, NoteState};
use crate::views::{connect_note_app, EditorSlot, NoteAppView, Screen};
use anyhow::Context;
use mini_react_redux::{Callback, Connected, Props, Provider};
use mini_redux::{
    Dispatchable, Dispatched, LogEntry, LogJournal, LoggingMiddleware, Pipeline, Store, ThunkMiddleware,
};
use notes_config::AppConfig;

/// Whether the REPL keeps going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct NotesApp {
    store: Store<NoteState, NoteAction>,
    journal: Option<LogJournal>,
    screen: Screen,
    root: Connected<NoteState, NoteAction>,
    editor: EditorSlot,
    pending: Vec<Dispatched>,
}

impl NotesApp {
    /// Build the store and mount the root view, which renders once
    pub fn new(config: &AppConfig, screen: Screen) -> anyhow::Result<Self> {
        let api = MockServerApi::new(config.api_latency());

        let mut pipeline = Pipeline::new();
        let journal = config.log_actions.then(LogJournal::new);
        if let Some(journal) = &journal {
            pipeline = pipeline.with(LoggingMiddleware::new().with_journal(journal.clone()));
        }
        let pipeline = pipeline.with(ThunkMiddleware);

        let store = Store::with_middleware(reduce, pipeline).context("Failed to create store")?;
        log::info!(
            "Store ready (action logging {}, api latency {:?})",
            if config.log_actions { "on" } else { "off" },
            api.latency()
        );

        let provider = Provider::new(store.clone());
        let view = NoteAppView::new(screen.clone());
        let editor = view.editor_slot();
        let root = connect_note_app(api).mount(&provider.context(), Props::new(), view);

        Ok(Self {
            store,
            journal,
            screen,
            root,
            editor,
            pending: Vec::new(),
        })
    }

    pub fn store(&self) -> &Store<NoteState, NoteAction> {
        &self.store
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn execute(&mut self, command: Command) -> anyhow::Result<Flow> {
        log::debug!("Command: {:?}", command);

        match command {
            Command::New => {
                let on_add_note = self.root_callback::<()>("on_add_note")?;
                on_add_note(())?;
            }
            Command::Sync => {
                let on_sync_note = self.root_callback::<()>("on_sync_note")?;
                let dispatched = on_sync_note(())?;
                if dispatched.is_pending() {
                    self.screen.line("(waiting for the server...)");
                    self.pending.retain(|earlier| !earlier.is_finished());
                    self.pending.push(dispatched);
                }
            }
            Command::Open(id) => {
                if self.store.state().note(id).is_none() {
                    self.screen.line(format!("No note with id {}", id));
                } else {
                    let on_open_note = self.root_callback::<NoteId>("on_open_note")?;
                    on_open_note(id)?;
                }
            }
            Command::Edit(content) => match self.editor_callback::<String>("on_change") {
                Some(on_change) => {
                    on_change(content)?;
                }
                None => self.screen.line("No note is open"),
            },
            Command::Close => match self.editor_callback::<()>("on_close") {
                Some(on_close) => {
                    on_close(())?;
                }
                None => self.screen.line("No note is open"),
            },
            Command::Dispatch(value) => {
                if let Err(e) = self.store.dispatch(Dispatchable::Value(value)) {
                    self.screen.line(format!("Rejected: {}", e));
                }
            }
            Command::Log => self.show_log(),
            Command::Help => self.screen.line(HELP),
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// Wait for every request still in flight
    pub async fn settle(&mut self) -> anyhow::Result<()> {
        for dispatched in self.pending.drain(..) {
            dispatched.settled().await.context("Background request failed")?;
        }
        Ok(())
    }

    fn root_callback<Args: 'static>(&self, key: &str) -> anyhow::Result<Callback<Args>> {
        self.root
            .props()
            .callback::<Args>(key)
            .with_context(|| format!("Root view has no {} callback", key))
    }

    /// The slot must not stay borrowed while a callback runs: the root view
    /// takes it when it re-renders.
    fn editor_callback<Args: 'static>(&self, key: &str) -> Option<Callback<Args>> {
        let editor = self.editor.borrow();
        let callback = editor.as_ref().and_then(|editor| editor.props().callback::<Args>(key));
        callback
    }

    fn show_log(&self) {
        let Some(journal) = &self.journal else {
            self.screen.line("Action logging is disabled (log_actions = false)");
            return;
        };

        if journal.is_empty() {
            self.screen.line("(nothing logged yet)");
        }
        for entry in journal.entries() {
            match entry {
                LogEntry::Before(state) => self.screen.line(format!("  before: {}", state)),
                LogEntry::Action(action) => self.screen.line(format!("  action: {}", action)),
                LogEntry::After(state) => self.screen.line(format!("  after:  {}", state)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(config: AppConfig) -> (NotesApp, Screen) {
        let screen = Screen::buffer();
        let app = NotesApp::new(&config, screen.clone()).unwrap();
        screen.take();
        (app, screen)
    }

    fn quick_config() -> AppConfig {
        AppConfig {
            api_latency_ms: 5,
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_new_edit_close() {
        let (mut app, screen) = app(quick_config());

        app.execute(Command::New).unwrap();
        app.execute(Command::Edit("Groceries\nmilk".to_string())).unwrap();
        screen.take();
        app.execute(Command::Close).unwrap();

        assert_eq!(
            screen.take(),
            vec!["Notes:", "  [1] Groceries", "new | sync | open <id> | help"]
        );
        let state = app.store().state();
        assert_eq!(state.open_note_id, None);
        assert_eq!(state.note(1).map(|note| note.content.as_str()), Some("Groceries\nmilk"));
    }

    #[test]
    fn test_edit_without_open_note() {
        let (mut app, screen) = app(quick_config());

        app.execute(Command::Edit("lost".to_string())).unwrap();
        app.execute(Command::Close).unwrap();

        assert_eq!(screen.take(), vec!["No note is open", "No note is open"]);
    }

    #[test]
    fn test_open_unknown_note() {
        let (mut app, screen) = app(quick_config());

        app.execute(Command::Open(4)).unwrap();

        assert_eq!(screen.take(), vec!["No note with id 4"]);
    }

    #[test]
    fn test_malformed_dispatch_is_reported() {
        let (mut app, screen) = app(quick_config());
        let before = app.store().state();

        app.execute(Command::Dispatch(serde_json::json!(42))).unwrap();

        assert_eq!(screen.take(), vec!["Rejected: action must be an object, got number"]);
        assert!(std::rc::Rc::ptr_eq(&before, &app.store().state()));
    }

    #[test]
    fn test_log_lists_middleware_entries() {
        let (mut app, screen) = app(quick_config());
        app.execute(Command::Dispatch(serde_json::json!({"type": "CLOSE_NOTE"})))
            .unwrap();
        screen.take();

        app.execute(Command::Log).unwrap();

        let lines = screen.take();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("  before: NoteState"));
        assert_eq!(lines[1], r#"  action: {"type":"CLOSE_NOTE"}"#);
        assert!(lines[2].starts_with("  after:  NoteState"));
    }

    #[test]
    fn test_log_disabled() {
        let (mut app, screen) = app(AppConfig {
            log_actions: false,
            ..quick_config()
        });

        app.execute(Command::Log).unwrap();

        assert_eq!(screen.take(), vec!["Action logging is disabled (log_actions = false)"]);
    }

    #[test]
    fn test_quit() {
        let (mut app, _screen) = app(quick_config());
        assert_eq!(app.execute(Command::Quit).unwrap(), Flow::Quit);
        assert_eq!(app.execute(Command::Help).unwrap(), Flow::Continue);
    }

    #[tokio::test]
    async fn test_sync_creates_two_notes() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let (mut app, screen) = app(quick_config());

                app.execute(Command::Sync).unwrap();
                assert_eq!(app.pending_count(), 1);
                assert_eq!(app.store().state().notes.len(), 1);

                app.settle().await.unwrap();

                assert_eq!(app.pending_count(), 0);
                let state = app.store().state();
                assert_eq!(state.notes.len(), 2);
                assert_eq!(state.open_note_id, Some(2));
                assert_eq!(state.note(2).and_then(|note| note.remote_id.as_deref()), Some("1"));
                assert!(screen.take().contains(&"(synced as 1)".to_string()));
            })
            .await;
    }

    #[tokio::test]
    async fn test_finished_syncs_are_not_kept() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let (mut app, _screen) = app(quick_config());

                app.execute(Command::Sync).unwrap();
                while !app.pending.iter().all(Dispatched::is_finished) {
                    tokio::time::sleep(std::time::Duration::from_millis(1)).await;
                }
                app.execute(Command::Sync).unwrap();
                assert_eq!(app.pending_count(), 1);

                app.settle().await.unwrap();
                assert_eq!(app.store().state().notes.len(), 4);
            })
            .await;
    }
}
