//! Single owner of the chat view state.

use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::FALLBACK_LABELS_ERROR;
use crate::labels::{spawn_loader, LabelsClient, LabelsResult};
use crate::state::{reduce, ViewEvent, ViewState};

/// Holds the [`ViewState`], feeds every change through [`reduce`] and owns
/// the label fetch started on construction.
///
/// Dropping the controller (or calling [`shutdown`](Self::shutdown)) cancels
/// a fetch that has not finished yet; its result is never applied.
pub struct ChatController {
    state: ViewState,
    labels_rx: Option<oneshot::Receiver<LabelsResult>>,
    cancel: CancellationToken,
}

impl ChatController {
    /// Build the initial state and start the label fetch.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(client: LabelsClient) -> Self {
        let cancel = CancellationToken::new();
        let labels_rx = spawn_loader(client, cancel.clone());

        Self {
            state: ViewState::new(),
            labels_rx: Some(labels_rx),
            cancel,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn dispatch(&mut self, event: ViewEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.dispatch(ViewEvent::InputChanged(text.into()));
    }

    /// Submit the current input. Returns whether a message pair was appended.
    pub fn submit(&mut self) -> bool {
        let before = self.state.conversation.len();
        self.dispatch(ViewEvent::Submit);
        self.state.conversation.len() != before
    }

    pub fn select_prompt(&mut self, prompt_text: &str) {
        self.dispatch(crate::prompts::select(prompt_text));
    }

    /// Apply the label result if it has arrived. Never blocks.
    ///
    /// Returns `true` when the state changed.
    pub fn poll_labels(&mut self) -> bool {
        let Some(rx) = self.labels_rx.as_mut() else {
            return false;
        };

        match rx.try_recv() {
            Ok(result) => {
                self.labels_rx = None;
                self.apply_labels(result);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Closed) => {
                self.labels_rx = None;
                self.loader_vanished()
            }
        }
    }

    /// Wait for the label fetch to settle and apply its result.
    pub async fn wait_for_labels(&mut self) {
        let Some(rx) = self.labels_rx.take() else {
            return;
        };

        match rx.await {
            Ok(result) => self.apply_labels(result),
            Err(_) => {
                self.loader_vanished();
            }
        }
    }

    /// Cancel a pending label fetch. Later results are discarded.
    pub fn shutdown(&mut self) {
        if !self.cancel.is_cancelled() {
            debug!("shutting down chat controller");
        }
        self.cancel.cancel();
        self.labels_rx = None;
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The loader dropped its sender without a result. Unless we cancelled
    /// it ourselves the task died, and loading still has to end.
    fn loader_vanished(&mut self) -> bool {
        if self.is_shut_down() {
            debug!("label loader finished without a result");
            return false;
        }
        warn!("label loader exited without a result");
        self.dispatch(ViewEvent::LabelsFailed(FALLBACK_LABELS_ERROR.to_string()));
        true
    }

    fn apply_labels(&mut self, result: LabelsResult) {
        let event = match result {
            Ok(labels) => ViewEvent::LabelsLoaded(labels),
            Err(err) => ViewEvent::LabelsFailed(err.into_message()),
        };
        self.dispatch(event);
    }
}

impl Drop for ChatController {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
