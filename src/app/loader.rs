use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::{debug, error};
use openalex_graphs::openalex::{RequestToken, RequestTracker};

type LoadResult<T> = (RequestToken, Result<T, String>);

pub(super) enum LoadState<T> {
    Idle,
    Loading { rx: Receiver<LoadResult<T>> },
    Ready(T),
    Error(String),
}

/// One background fetch slot. Starting a new load supersedes the previous one.
pub(super) struct Loader<T> {
    tracker: RequestTracker,
    state: LoadState<T>,
}

impl<T> Default for Loader<T> {
    fn default() -> Self {
        Self {
            tracker: RequestTracker::default(),
            state: LoadState::Idle,
        }
    }
}

impl<T: Send + 'static> Loader<T> {
    pub(super) fn start<F>(&mut self, label: &'static str, job: F)
    where
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    {
        let token = self.tracker.begin();
        let (tx, rx) = mpsc::channel();

        debug!("starting {label} load {token:?}");
        thread::spawn(move || {
            let result = job().map_err(|error| {
                error!("{label} load failed: {error:#}");
                format!("{error:#}")
            });
            let _ = tx.send((token, result));
        });

        self.state = LoadState::Loading { rx };
    }

    /// Commits a finished load. Returns true when the state changed this frame.
    pub(super) fn poll(&mut self) -> bool {
        let LoadState::Loading { rx } = &self.state else {
            return false;
        };

        match rx.try_recv() {
            Ok((token, result)) => {
                if !self.tracker.is_current(token) {
                    debug!("dropping stale load {token:?}");
                    return false;
                }
                self.state = match result {
                    Ok(value) => LoadState::Ready(value),
                    Err(message) => LoadState::Error(message),
                };
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.state = LoadState::Error("Background load worker disconnected".to_owned());
                true
            }
        }
    }
}

impl<T> Loader<T> {
    pub(super) fn reset(&mut self) {
        self.tracker.invalidate();
        self.state = LoadState::Idle;
    }

    pub(super) fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub(super) fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading { .. })
    }

    pub(super) fn ready(&self) -> Option<&T> {
        match &self.state {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub(super) fn ready_mut(&mut self) -> Option<&mut T> {
        match &mut self.state {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }
}
