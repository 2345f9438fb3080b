//! In-memory connection double shared by unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum::extract::ws::Utf8Bytes;
use futures_util::future::BoxFuture;
use tokio::sync::mpsc;

use crate::domain::{Connection, ConnectionError, ConnectionHandle, ConnectionId, UserId};

/// Connection that records every written frame on an unbounded channel.
///
/// Writes can be switched to fail immediately or to never complete, which
/// is how tests model a dead socket and a stalled peer.
#[derive(Debug)]
pub(crate) struct MockConnection {
    id: ConnectionId,
    frames: mpsc::UnboundedSender<String>,
    failing: AtomicBool,
    stalled: AtomicBool,
    closes: AtomicUsize,
    last_frame_addr: AtomicUsize,
}

impl MockConnection {
    pub(crate) fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<String>) {
        let (frames, rx) = mpsc::unbounded_channel();
        let conn = Arc::new(Self {
            id: ConnectionId::new(),
            frames,
            failing: AtomicBool::new(false),
            stalled: AtomicBool::new(false),
            closes: AtomicUsize::new(0),
            last_frame_addr: AtomicUsize::new(0),
        });
        (conn, rx)
    }

    pub(crate) fn handle(self: &Arc<Self>) -> ConnectionHandle {
        Arc::clone(self) as ConnectionHandle
    }

    pub(crate) fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub(crate) fn stall_writes(&self) {
        self.stalled.store(true, Ordering::SeqCst);
    }

    pub(crate) fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Address of the buffer backing the most recent frame written.
    pub(crate) fn last_frame_addr(&self) -> usize {
        self.last_frame_addr.load(Ordering::SeqCst)
    }
}

impl Connection for MockConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn send_text(&self, text: Utf8Bytes) -> BoxFuture<'_, Result<(), ConnectionError>> {
        Box::pin(async move {
            if self.stalled.load(Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }
            if self.failing.load(Ordering::SeqCst) || self.close_count() > 0 {
                return Err(ConnectionError::Closed);
            }
            self.last_frame_addr
                .store(text.as_str().as_ptr().addr(), Ordering::SeqCst);
            self.frames
                .send(text.as_str().to_string())
                .map_err(|_| ConnectionError::Closed)
        })
    }

    fn close(&self) -> BoxFuture<'_, Result<(), ConnectionError>> {
        Box::pin(async move {
            let _ = self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }
}

/// Parses a test user id, panicking on invalid input.
#[allow(clippy::panic)]
pub(crate) fn user(raw: &str) -> UserId {
    let Ok(id) = UserId::parse(raw) else {
        panic!("invalid test user id {raw:?}");
    };
    id
}

/// Drains every frame currently buffered on `rx`.
pub(crate) fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(frame);
    }
    frames
}
