//! Scripted backend for tests.
//!
//! Replies are queued per operation. An empty queue answers like a backend
//! that has not started yet. Gated replies stay in flight until the test
//! resolves them.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::BoxFuture;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;

use super::{CursorBackend, MoveDelta};
use crate::error::{PointerPadError, PointerPadResult};

enum Reply {
    Ready(PointerPadResult<Value>),
    Gated(oneshot::Receiver<PointerPadResult<Value>>),
}

#[derive(Default)]
pub(crate) struct ScriptedBackend {
    get_replies: Mutex<VecDeque<Reply>>,
    move_replies: Mutex<VecDeque<Reply>>,
    get_calls: AtomicUsize,
    moves: Mutex<Vec<MoveDelta>>,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_get(&self, reply: PointerPadResult<Value>) {
        self.get_replies.lock().push_back(Reply::Ready(reply));
    }

    pub(crate) fn push_move(&self, reply: PointerPadResult<Value>) {
        self.move_replies.lock().push_back(Reply::Ready(reply));
    }

    /// Queue a `get_cursor` reply that resolves when the sender fires.
    pub(crate) fn gate_get(&self) -> oneshot::Sender<PointerPadResult<Value>> {
        let (tx, rx) = oneshot::channel();
        self.get_replies.lock().push_back(Reply::Gated(rx));
        tx
    }

    /// Queue a `move_cursor` reply that resolves when the sender fires.
    pub(crate) fn gate_move(&self) -> oneshot::Sender<PointerPadResult<Value>> {
        let (tx, rx) = oneshot::channel();
        self.move_replies.lock().push_back(Reply::Gated(rx));
        tx
    }

    pub(crate) fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn moves(&self) -> Vec<MoveDelta> {
        self.moves.lock().clone()
    }

    async fn answer(reply: Option<Reply>) -> PointerPadResult<Value> {
        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Gated(rx)) => rx.await.unwrap_or_else(|_| {
                Err(PointerPadError::BackendUnavailable("gate dropped".into()))
            }),
            None => Err(PointerPadError::BackendUnavailable(
                "backend not ready".into(),
            )),
        }
    }
}

impl CursorBackend for ScriptedBackend {
    fn get_cursor(&self) -> BoxFuture<'_, PointerPadResult<Value>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.get_replies.lock().pop_front();
        Box::pin(Self::answer(reply))
    }

    fn move_cursor(&self, delta: MoveDelta) -> BoxFuture<'_, PointerPadResult<Value>> {
        self.moves.lock().push(delta);
        let reply = self.move_replies.lock().pop_front();
        Box::pin(Self::answer(reply))
    }
}
