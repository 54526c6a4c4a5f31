//! State container for the special folders setup step
//!
//! Events are queued to a single tokio task that owns the form model
//! and the folder source, so they are processed strictly one at a
//! time. A load that is waiting on the network holds up every event
//! queued after it, including a second load, which then runs again
//! once the first one is done.

use crate::error::{Error, Result};
use crate::flow::{EffectFlow, EffectReceiver, StateFlow, StateReceiver};
use crate::folder::{Folder, Role, RoleMapping};
use crate::form::{FormEvent, FormUiModel};
use crate::source::FolderSource;
use crate::state::{FolderField, FormState, State};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Input from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    LoadSpecialFolders,
    Form(FormEvent),
    OnNextClicked,
    OnBackClicked,
}

impl From<FormEvent> for Event {
    fn from(event: FormEvent) -> Self {
        Self::Form(event)
    }
}

/// One-shot signal for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    NavigateNext,
    NavigateBack,
    /// Listing the remote folders failed; the form was left as it was.
    LoadFailed(String),
}

enum Command {
    Event(Event),
    Settle(oneshot::Sender<()>),
}

/// Handle to a running special folders view model.
///
/// Cloning the handle shares the same model. The background task stops
/// once every handle is dropped and the queue is drained.
#[derive(Clone)]
pub struct SpecialFoldersViewModel {
    tx: mpsc::UnboundedSender<Command>,
    state: Arc<StateFlow<State>>,
    effects: Arc<EffectFlow<Effect>>,
}

impl SpecialFoldersViewModel {
    /// Start a view model with an empty, idle state.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    #[must_use]
    pub fn new<S, F>(source: S, form: F) -> Self
    where
        S: FolderSource,
        F: FormUiModel,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = Arc::new(StateFlow::new(State::default()));
        let effects = Arc::new(EffectFlow::new());

        let worker = Worker {
            form,
            effects: Arc::clone(&effects),
            loader: FolderLoader {
                source,
                state: Arc::clone(&state),
                effects: Arc::clone(&effects),
            },
        };
        tokio::spawn(worker.run(rx));

        Self { tx, state, effects }
    }

    /// Queue an event for processing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the background task has stopped.
    pub fn event(&self, event: impl Into<Event>) -> Result<()> {
        self.tx
            .send(Command::Event(event.into()))
            .map_err(|_| Error::Closed)
    }

    /// Wait until every event queued so far has been processed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the background task has stopped.
    pub async fn settle(&self) -> Result<()> {
        let (done, rx) = oneshot::channel();
        self.tx
            .send(Command::Settle(done))
            .map_err(|_| Error::Closed)?;
        rx.await.map_err(|_| Error::Closed)
    }

    /// The current state snapshot.
    #[must_use]
    pub fn state(&self) -> State {
        self.state.value()
    }

    /// Observe state changes, starting with the current snapshot.
    #[must_use]
    pub fn subscribe_state(&self) -> StateReceiver<State> {
        self.state.subscribe()
    }

    /// Observe effects emitted from now on.
    #[must_use]
    pub fn subscribe_effects(&self) -> EffectReceiver<Effect> {
        self.effects.subscribe()
    }
}

struct Worker<S, F> {
    form: F,
    effects: Arc<EffectFlow<Effect>>,
    loader: FolderLoader<S>,
}

impl<S: FolderSource, F: FormUiModel> Worker<S, F> {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = rx.recv().await {
            match command {
                Command::Event(event) => self.handle(event).await,
                Command::Settle(done) => {
                    let _ = done.send(());
                }
            }
        }
        debug!("special folders view model stopped");
    }

    async fn handle(&mut self, event: Event) {
        debug!(?event, "handling event");
        match event {
            Event::LoadSpecialFolders => self.loader.load().await,
            Event::Form(event) => self.form.event(event),
            Event::OnNextClicked => self.effects.emit(Effect::NavigateNext),
            Event::OnBackClicked => self.effects.emit(Effect::NavigateBack),
        }
    }
}

/// Turns a remote folder listing into the per-role form.
struct FolderLoader<S> {
    source: S,
    state: Arc<StateFlow<State>>,
    effects: Arc<EffectFlow<Effect>>,
}

impl<S: FolderSource> FolderLoader<S> {
    async fn load(&self) {
        self.state.update(|state| state.is_loading = true);

        let folders = match self.source.remote_folders().await {
            Ok(folders) => folders,
            Err(e) => {
                warn!("Failed to load remote folders: {}", e);
                self.state.update(|state| state.is_loading = false);
                self.effects.emit(Effect::LoadFailed(e.to_string()));
                return;
            }
        };

        let mapping = self.source.folder_type_mapping(&folders);
        let form_state = self.build_form_state(&folders, &mapping);

        // Two separate snapshots: populated while still loading, then
        // done loading.
        self.state.update(|state| state.form_state = form_state);
        self.state.update(|state| state.is_loading = false);

        info!(
            "Loaded {} remote folders, {} roles preselected",
            folders.len(),
            mapping.len()
        );
    }

    fn build_form_state(&self, folders: &[Folder], mapping: &RoleMapping) -> FormState {
        let mut form_state = FormState::default();
        for role in Role::ALL {
            let candidates = self.source.filter_folders_for_role(folders, role, mapping);
            *form_state.field_mut(role) = FolderField::new(candidates, mapping.get(&role).cloned());
        }
        form_state
    }
}
