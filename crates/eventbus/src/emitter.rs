//! [`EventEmitter`]: the scheduler's write end of the execution event
//! stream.
//!
//! Unlike a fan-out broadcast bus, this is a bounded channel with exactly
//! one consumer (the HTTP stream handler): if the consumer falls behind,
//! the scheduler blocks on `emit`; if the consumer
//! disconnects, the execution keeps running to completion and is persisted
//! regardless. A dropped receiver therefore makes `emit` a no-op rather than
//! an error the scheduler has to handle.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::event::{Event, SequencedEvent};

/// Creates a bounded single-consumer event channel. `capacity` bounds how
/// far the consumer may lag before [`EventEmitter::emit`] blocks.
#[must_use]
pub fn channel(capacity: usize) -> (EventEmitter, EventStream) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let emitter = EventEmitter {
        sender,
        seq: AtomicU64::new(0),
    };
    (emitter, EventStream(ReceiverStream::new(receiver)))
}

pub struct EventEmitter {
    sender: mpsc::Sender<SequencedEvent>,
    seq: AtomicU64,
}

impl EventEmitter {
    /// Stamps `event` with the next monotonic sequence number and sends it.
    ///
    /// Blocks if the channel is full (the consumer is lagging). Returns
    /// `false` if the consumer has disconnected; the scheduler treats that
    /// as "keep running", not as a failure.
    pub async fn emit(&self, event: Event) -> bool {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        self.sender.send(SequencedEvent { seq, event }).await.is_ok()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        !self.sender.is_closed()
    }
}

/// The HTTP stream handler's read end. Implements [`futures_core::Stream`]
/// so it can be adapted directly into an SSE body.
pub struct EventStream(ReceiverStream<SequencedEvent>);

impl futures_core::Stream for EventStream {
    type Item = SequencedEvent;

    fn poll_next(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        std::pin::Pin::new(&mut self.0).poll_next(cx)
    }
}
