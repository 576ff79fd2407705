//! Background worker owning the [`Engine`] and the bridge callers use to
//! reach it.
//!
//! Callers never touch the store directly. Each request travels as a
//! [`Message`] over a bounded queue, the worker answers with a [`Response`]
//! carrying the same correlation id, and the [`Bridge`] hands it back to the
//! right caller.

mod bridge;
mod protocol;
mod service;

pub use bridge::Bridge;
pub use protocol::{CorrelationId, Message, Reply, Request, Response};
pub use service::serve;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::WorkerConfig;
use crate::stores::RecordStore;
use crate::Engine;

/// Spawns the worker task and returns the bridge connected to it. The task
/// finishes once every clone of the bridge is dropped.
pub fn spawn_worker<S>(engine: Engine<S>, config: &WorkerConfig) -> (Bridge, JoinHandle<()>)
where
    S: RecordStore + 'static,
{
    let (request_tx, request_rx) = mpsc::channel(config.channel_capacity);
    let (response_tx, response_rx) = mpsc::channel(config.channel_capacity);

    let handle = tokio::spawn(serve(engine, request_rx, response_tx));
    let bridge = Bridge::new(request_tx, response_rx, config.request_timeout);
    (bridge, handle)
}
