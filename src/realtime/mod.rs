//! Realtime event channel: server-push tokens over a WebSocket.

mod backoff;
mod channel;

pub use backoff::{BackoffState, ReconnectPolicy};
pub use channel::{
    ChannelError, ChannelEvent, ChannelMessage, ChannelSink, ConnectionState, EventChannel,
    RealtimeConnector, WebSocketConnector,
};
