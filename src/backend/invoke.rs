//! Command-invocation transport adapter.
//!
//! Desktop IPC bridges expose the backend as `invoke(cmd, args) -> json`.
//! `InvokeBackend` maps the cursor contract onto that shape so any such
//! transport (or a plain closure) can serve as a `CursorBackend`.

use std::future::Future;

use futures::future::BoxFuture;
use serde_json::{json, Value};

use super::{CursorBackend, MoveDelta, GET_CURSOR, MOVE_CURSOR};
use crate::error::PointerPadResult;

/// A named-command request/response transport.
pub trait Invoke: Send + Sync + 'static {
    /// Invoke `cmd` with JSON `args` and return the raw JSON answer.
    fn invoke(&self, cmd: &'static str, args: Value) -> BoxFuture<'_, PointerPadResult<Value>>;
}

impl<F, Fut> Invoke for F
where
    F: Fn(&'static str, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = PointerPadResult<Value>> + Send + 'static,
{
    fn invoke(&self, cmd: &'static str, args: Value) -> BoxFuture<'_, PointerPadResult<Value>> {
        Box::pin(self(cmd, args))
    }
}

/// `CursorBackend` over an `Invoke` transport.
pub struct InvokeBackend<I> {
    invoker: I,
}

impl<I: Invoke> InvokeBackend<I> {
    pub fn new(invoker: I) -> Self {
        Self { invoker }
    }
}

impl<I: Invoke> CursorBackend for InvokeBackend<I> {
    fn get_cursor(&self) -> BoxFuture<'_, PointerPadResult<Value>> {
        self.invoker.invoke(GET_CURSOR, json!({}))
    }

    fn move_cursor(&self, delta: MoveDelta) -> BoxFuture<'_, PointerPadResult<Value>> {
        self.invoker
            .invoke(MOVE_CURSOR, json!({ "dx": delta.dx, "dy": delta.dy }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PointerPadError;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn recording_backend(
        answer: Value,
    ) -> (
        InvokeBackend<impl Invoke>,
        Arc<Mutex<Vec<(&'static str, Value)>>>,
    ) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&calls);
        let backend = InvokeBackend::new(move |cmd: &'static str, args: Value| {
            seen.lock().push((cmd, args));
            let answer = answer.clone();
            async move { Ok(answer) }
        });
        (backend, calls)
    }

    #[tokio::test]
    async fn test_get_cursor_command() {
        let (backend, calls) = recording_backend(json!([1, 2]));
        let answer = backend.get_cursor().await.unwrap();

        assert_eq!(answer, json!([1, 2]));
        assert_eq!(calls.lock().as_slice(), &[("get_cursor", json!({}))]);
    }

    #[tokio::test]
    async fn test_move_cursor_command() {
        let (backend, calls) = recording_backend(json!([10, 28]));
        backend.move_cursor(MoveDelta::new(0, 8)).await.unwrap();

        assert_eq!(
            calls.lock().as_slice(),
            &[("move_cursor", json!({ "dx": 0, "dy": 8 }))]
        );
    }

    #[tokio::test]
    async fn test_transport_errors_pass_through() {
        let backend = InvokeBackend::new(|_cmd: &'static str, _args: Value| async {
            Err::<Value, _>(PointerPadError::BackendUnavailable("ipc not ready".into()))
        });

        let err = backend.get_cursor().await.unwrap_err();
        assert!(matches!(err, PointerPadError::BackendUnavailable(_)));
    }
}
