//! Server-side subscription to the Blockonomics push channel.
//!
//! Blockonomics publishes payment progress for a single address on `wss://www.blockonomics.co/payment/{address}`.
//! Each text frame looks like `{"status": 0, "value": 26000, "txid": "..."}`. The watcher turns every frame into a
//! [`PaymentSignal`] and feeds it through the same reconciliation path as the HTTP callback, so whichever of the two
//! arrives first wins and the other is absorbed by the reducer.
//!
//! A subscription ends when
//! * a confirmed (`status >= 2`) message has been applied,
//! * Blockonomics closes the socket, or
//! * the watch timeout expires.
use std::{fmt::Display, future::Future, sync::Arc, time::Duration};

use blockonomics_tools::{helpers::push_channel_url, PaymentPush};
use brew_common::MinorUnits;
use brew_payment_engine::{
    db_types::{PaymentSignal, SignalSource},
    traits::OrderStore,
    OrderFlowApi,
    OrderFlowError,
};
use futures_util::{Stream, StreamExt};
use log::*;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, Message},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchOutcome {
    Confirmed,
    Closed,
    TimedOut,
    Failed(String),
}

impl Display for WatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchOutcome::Confirmed => write!(f, "payment confirmed"),
            WatchOutcome::Closed => write!(f, "channel closed"),
            WatchOutcome::TimedOut => write!(f, "timed out"),
            WatchOutcome::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

pub struct PushWatcher<B> {
    api: OrderFlowApi<B>,
    push_url: String,
    timeout: Duration,
}

/// Turns a push frame into a payment signal for `address`.
pub fn decode_push(address: &str, text: &str) -> Result<PaymentSignal, serde_json::Error> {
    let push = serde_json::from_str::<PaymentPush>(text)?;
    let mut signal = PaymentSignal::new(address, push.status, SignalSource::Push);
    if let Some(txid) = push.txid.filter(|t| !t.is_empty()) {
        signal = signal.with_txid(txid);
    }
    if let Some(value) = push.value {
        signal = signal.with_value(MinorUnits::from(value));
    }
    Ok(signal)
}

impl<B> PushWatcher<B>
where B: OrderStore + 'static
{
    pub fn new(api: OrderFlowApi<B>, push_url: &str, timeout: Duration) -> Self {
        Self { api, push_url: push_url.to_string(), timeout }
    }

    /// Starts watching `address` in the background. Must be called from within the actix runtime.
    pub fn watch(self: Arc<Self>, address: &str) {
        let address = address.to_string();
        actix_web::rt::spawn(async move {
            let outcome = self.run(&address).await;
            match outcome {
                WatchOutcome::Failed(_) => warn!("📡️ Stopped watching [{address}]. {outcome}"),
                _ => info!("📡️ Stopped watching [{address}]. {outcome}"),
            }
        });
    }

    /// Connects to the push channel for `address` and applies its messages until the subscription ends. The watch
    /// timeout covers the connection handshake as well.
    pub async fn run(&self, address: &str) -> WatchOutcome {
        let url = push_channel_url(&self.push_url, address);
        self.within_timeout(address, self.subscribe(&url, address)).await
    }

    async fn within_timeout<F>(&self, address: &str, watch: F) -> WatchOutcome
    where F: Future<Output = WatchOutcome> {
        tokio::time::timeout(self.timeout, watch).await.unwrap_or_else(|_| {
            debug!("📡️ No confirmation for [{address}] within {:?}", self.timeout);
            WatchOutcome::TimedOut
        })
    }

    async fn subscribe(&self, url: &str, address: &str) -> WatchOutcome {
        debug!("📡️ Connecting to {url}");
        let (stream, _) = match connect_async(url).await {
            Ok(conn) => conn,
            Err(e) => return WatchOutcome::Failed(e.to_string()),
        };
        info!("📡️ Watching push channel for [{address}]");
        self.consume(address, stream).await
    }

    /// Applies every frame on `stream` to the order for `address` until the payment is confirmed or the stream ends.
    pub async fn consume<S>(&self, address: &str, mut stream: S) -> WatchOutcome
    where S: Stream<Item = Result<Message, WsError>> + Unpin {
        while let Some(frame) = stream.next().await {
            let text = match frame {
                Ok(Message::Text(text)) => text,
                Ok(Message::Close(_)) => return WatchOutcome::Closed,
                Ok(_) => continue,
                Err(e) => return WatchOutcome::Failed(e.to_string()),
            };
            let signal = match decode_push(address, &text) {
                Ok(signal) => signal,
                Err(e) => {
                    warn!("📡️ Skipping malformed push message for [{address}]: {text}. {e}");
                    continue;
                },
            };
            let code = signal.status_code;
            match self.api.process_signal(signal).await {
                Ok(order) if code >= 2 => {
                    debug!("📡️ Push channel confirmed {order}");
                    return WatchOutcome::Confirmed;
                },
                Ok(_) => {},
                Err(OrderFlowError::OrderNotFound(_)) => {
                    warn!("📡️ Push message for [{address}], but there is no such order. Ignoring it.");
                },
                Err(e) => warn!("📡️ Could not apply push message for [{address}]. {e}"),
            }
        }
        WatchOutcome::Closed
    }
}
