//! WebSocket transport backed by tokio-tungstenite

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use super::{ChannelCallback, ChannelEvent, ChannelEventKind, ChannelHandle, Transport};
use crate::error::ClientError;

/// Transport opening one tokio task per connection attempt
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketTransport;

impl WebSocketTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for WebSocketTransport {
    fn open(&self, url: &str, generation: u64, on_event: ChannelCallback) -> ChannelHandle {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_channel(url.to_string(), generation, outbound_rx, on_event));
        ChannelHandle::new(outbound_tx)
    }
}

async fn run_channel(
    url: String,
    generation: u64,
    mut outbound: mpsc::UnboundedReceiver<String>,
    on_event: ChannelCallback,
) {
    let emit = |kind| on_event(ChannelEvent { generation, kind });

    let ws = match connect_async(url.as_str()).await.map_err(ClientError::from) {
        Ok((ws, _)) => ws,
        Err(e) => {
            debug!("Bridge connect #{} failed: {}", generation, e);
            emit(ChannelEventKind::Error(e.to_string()));
            emit(ChannelEventKind::Closed);
            return;
        },
    };

    info!("🔗 WebSocket open: {}", url);
    emit(ChannelEventKind::Opened);

    let (mut write, mut read) = ws.split();
    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => emit(ChannelEventKind::Frame(text)),
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                    Ok(text) => emit(ChannelEventKind::Frame(text)),
                    Err(_) => debug!("Ignoring non UTF-8 binary frame"),
                },
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {},
                Some(Err(e)) => {
                    warn!("WebSocket read error: {}", e);
                    emit(ChannelEventKind::Error(ClientError::from(e).to_string()));
                    break;
                },
            },
            outgoing = outbound.recv() => match outgoing {
                Some(text) => {
                    if let Err(e) = write.send(Message::Text(text)).await {
                        warn!("WebSocket write error: {}", e);
                        emit(ChannelEventKind::Error(ClientError::from(e).to_string()));
                        break;
                    }
                },
                None => {
                    debug!("Channel #{} closed locally", generation);
                    let _ = write.close().await;
                    break;
                },
            },
        }
    }

    emit(ChannelEventKind::Closed);
}
