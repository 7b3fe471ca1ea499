use std::sync::{Arc, Mutex};

use futures_util::StreamExt;
use log::{debug, error, warn};
use solana_client::nonblocking::pubsub_client::PubsubClient;

use crate::{
    event_emitter::{Event, EventEmitter},
    types::{SdkError, SdkResult},
};

/// The `SlotSource` contract: anything that can report the most recently
/// observed chain slot. `SlotSubscriber` is the concrete websocket-backed
/// implementation; a `DLOBSubscriber` only depends on this trait.
pub trait SlotSource {
    fn get_slot(&self) -> u64;
}

/// To subscribe to slot updates, subscribe to the event_emitter's "slot" event type.
#[derive(Clone)]
pub struct SlotSubscriber {
    current_slot: Arc<Mutex<u64>>,
    event_emitter: EventEmitter,
    subscribed: bool,
    url: String,
    unsubscriber: Option<tokio::sync::mpsc::Sender<()>>,
}

#[derive(Clone, Debug)]
pub struct SlotUpdate {
    pub latest_slot: u64,
}

impl SlotUpdate {
    pub fn new(latest_slot: u64) -> Self {
        Self { latest_slot }
    }
}

impl Event for SlotUpdate {
    fn box_clone(&self) -> Box<dyn Event> {
        Box::new((*self).clone())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl SlotSubscriber {
    pub const SUBSCRIPTION_ID: &'static str = "slot";

    pub fn new(url: &str) -> Self {
        Self {
            current_slot: Arc::new(Mutex::new(0)),
            event_emitter: EventEmitter::new(),
            subscribed: false,
            url: url.to_string(),
            unsubscriber: None,
        }
    }

    pub fn current_slot(&self) -> u64 {
        *self.current_slot.lock().unwrap()
    }

    pub fn event_emitter(&self) -> EventEmitter {
        self.event_emitter.clone()
    }

    pub async fn subscribe(&mut self) -> SdkResult<()> {
        if self.subscribed {
            return Ok(());
        }
        self.subscribed = true;
        self.subscribe_ws().await?;
        Ok(())
    }

    async fn subscribe_ws(&mut self) -> SdkResult<()> {
        let pubsub = PubsubClient::new(&self.url).await?;

        let event_emitter = self.event_emitter.clone();

        let (unsub_tx, mut unsub_rx) = tokio::sync::mpsc::channel::<()>(1);

        self.unsubscriber = Some(unsub_tx);

        let current_slot = self.current_slot.clone();

        tokio::spawn(async move {
            let (mut slot_updates, unsubscriber) = match pubsub.slot_subscribe().await {
                Ok(pair) => pair,
                Err(e) => {
                    error!("slot_subscribe failed: {e}");
                    return;
                }
            };
            loop {
                tokio::select! {
                    message = slot_updates.next() => {
                        match message {
                            Some(message) => {
                                let slot = message.slot;
                                let mut current_slot_guard = current_slot.lock().unwrap();
                                if slot >= *current_slot_guard {
                                    *current_slot_guard = slot;
                                    event_emitter.emit(SlotSubscriber::SUBSCRIPTION_ID, Box::new(SlotUpdate::new(slot)));
                                }
                            }
                            None => {
                                warn!("slot stream ended");
                                unsubscriber().await;
                                break;
                            }
                        }
                    }
                    _ = unsub_rx.recv() => {
                        debug!("unsubscribing from slot stream");
                        unsubscriber().await;
                        break;
                    }
                }
            }
        });

        Ok(())
    }

    pub async fn unsubscribe(&mut self) -> SdkResult<()> {
        if self.subscribed && self.unsubscriber.is_some() {
            if let Err(e) = self.unsubscriber.as_ref().unwrap().send(()).await {
                error!("failed to send unsubscribe signal: {e:?}");
                return Err(SdkError::CouldntUnsubscribe(e));
            }
            self.subscribed = false;
        }
        Ok(())
    }
}

impl SlotSource for SlotSubscriber {
    fn get_slot(&self) -> u64 {
        self.current_slot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn monotonic_slot_guard_rejects_stale_updates() {
        let current = Mutex::new(10u64);
        let apply = |slot: u64| {
            let mut guard = current.lock().unwrap();
            if slot >= *guard {
                *guard = slot;
                true
            } else {
                false
            }
        };

        assert!(apply(12));
        assert!(!apply(11)); // stale, rejected
        assert!(apply(12)); // equal is accepted (idempotent re-publish)
        assert_eq!(*current.lock().unwrap(), 12);
    }

    #[test]
    fn emits_slot_update_event_on_subscribe() {
        let subscriber = SlotSubscriber::new("wss://example.invalid");
        let seen = Arc::new(AtomicU64::new(0));
        let seen_clone = seen.clone();

        subscriber.event_emitter().subscribe(SlotSubscriber::SUBSCRIPTION_ID, move |event| {
            if let Some(update) = event.as_any().downcast_ref::<SlotUpdate>() {
                seen_clone.store(update.latest_slot, Ordering::SeqCst);
            }
        });

        subscriber
            .event_emitter()
            .emit(SlotSubscriber::SUBSCRIPTION_ID, Box::new(SlotUpdate::new(77)));

        assert_eq!(seen.load(Ordering::SeqCst), 77);
        assert_eq!(subscriber.current_slot(), 0); // emit() alone doesn't touch state
    }
}
