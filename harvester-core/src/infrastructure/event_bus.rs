// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Event Bus
//!
//! Process-local typed publish/subscribe with asynchronous broadcast, plus a
//! synchronous request/response channel with at-most-one responder per
//! request kind.
//!
//! Delivery is snapshot-then-dispatch: mutating the subscriber table while an
//! event is in flight never corrupts the in-flight delivery, and a listener
//! removed mid-delivery is not invoked for events published after the
//! removal. All events, regardless of kind, are dispatched from a single
//! ordered queue, which gives the stronger-than-required guarantee that
//! delivery order matches publish order across every kind, not only within
//! one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;
use harvester_domain::events::{
    AbortingFinished, AbortingStarted, ConfigurationChanged, DocumentsHarvested, HarvestFinished, HarvestStarted,
    SaveFinished, SaveStarted, ServiceInitialized, StartAbortingEvent, StateTransitioned, SubmissionFinished,
    SubmissionStarted,
};
use harvester_domain::value_objects::PipelineName;
use harvester_domain::{DomainEvent, EventKind, HarvestError, RequestKind};
use parking_lot::Mutex;
use tokio::sync::mpsc;

/// One concrete event flowing over the bus, tagged by its domain `EventKind`.
#[derive(Debug, Clone)]
pub enum Event {
    HarvestStarted(DomainEvent<HarvestStarted>),
    HarvestFinished(DomainEvent<HarvestFinished>),
    DocumentsHarvested(DomainEvent<DocumentsHarvested>),
    StartAborting(DomainEvent<StartAbortingEvent>),
    AbortingStarted(DomainEvent<AbortingStarted>),
    AbortingFinished(DomainEvent<AbortingFinished>),
    SaveStarted(DomainEvent<SaveStarted>),
    SaveFinished(DomainEvent<SaveFinished>),
    SubmissionStarted(DomainEvent<SubmissionStarted>),
    SubmissionFinished(DomainEvent<SubmissionFinished>),
    ServiceInitialized(DomainEvent<ServiceInitialized>),
    ConfigurationChanged(DomainEvent<ConfigurationChanged>),
    StateTransitioned(DomainEvent<StateTransitioned>),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::HarvestStarted(_) => EventKind::HarvestStarted,
            Event::HarvestFinished(_) => EventKind::HarvestFinished,
            Event::DocumentsHarvested(_) => EventKind::DocumentsHarvested,
            Event::StartAborting(_) => EventKind::StartAborting,
            Event::AbortingStarted(_) => EventKind::AbortingStarted,
            Event::AbortingFinished(_) => EventKind::AbortingFinished,
            Event::SaveStarted(_) => EventKind::SaveStarted,
            Event::SaveFinished(_) => EventKind::SaveFinished,
            Event::SubmissionStarted(_) => EventKind::SubmissionStarted,
            Event::SubmissionFinished(_) => EventKind::SubmissionFinished,
            Event::ServiceInitialized(_) => EventKind::ServiceInitialized,
            Event::ConfigurationChanged(_) => EventKind::ConfigurationChanged,
            Event::StateTransitioned(_) => EventKind::StateTransitioned,
        }
    }
}

/// A synchronous request. Only `IsOutdated` exists today (§4.1); the enum
/// exists so new request kinds slot in without changing the dispatch table's
/// shape.
#[derive(Debug, Clone)]
pub enum Request {
    IsOutdated { pipeline: PipelineName },
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        match self {
            Request::IsOutdated { .. } => RequestKind::IsOutdated,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Response {
    Outdated(bool),
}

type AsyncHandler = Arc<dyn Fn(Event) -> BoxFuture<'static, ()> + Send + Sync>;
type Responder = Arc<dyn Fn(Request) -> BoxFuture<'static, Result<Response, HarvestError>> + Send + Sync>;

/// Handle returned by `add_listener`, used to remove that exact registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Inner {
    listeners: Mutex<HashMap<EventKind, Vec<(ListenerId, AsyncHandler)>>>,
    responders: Mutex<HashMap<RequestKind, Responder>>,
    next_id: AtomicU64,
    sender: mpsc::UnboundedSender<Event>,
}

/// In-process event bus. Cheaply cloneable; clones share the same
/// subscriber table and dispatch queue.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Inner>,
}

impl EventBus {
    /// Creates the bus and spawns its single ordered dispatch loop.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Event>();
        let inner = Arc::new(Inner {
            listeners: Mutex::new(HashMap::new()),
            responders: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            sender,
        });

        let dispatch_inner = inner.clone();
        tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                let snapshot: Vec<AsyncHandler> = {
                    let listeners = dispatch_inner.listeners.lock();
                    listeners
                        .get(&event.kind())
                        .map(|v| v.iter().map(|(_, h)| h.clone()).collect())
                        .unwrap_or_default()
                };
                for handler in snapshot {
                    handler(event.clone()).await;
                }
            }
        });

        Self { inner }
    }

    /// Registers an asynchronous subscriber for `kind`. Multiple subscribers
    /// per kind are permitted.
    pub fn add_listener<F, Fut>(&self, kind: EventKind, handler: F) -> ListenerId
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let id = ListenerId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let boxed: AsyncHandler = Arc::new(move |event| Box::pin(handler(event)));
        self.inner.listeners.lock().entry(kind).or_default().push((id, boxed));
        id
    }

    /// Removes a listener previously returned by `add_listener`. Idempotent:
    /// removing an already-removed or unknown id is a no-op.
    pub fn remove_listener(&self, kind: EventKind, id: ListenerId) {
        if let Some(handlers) = self.inner.listeners.lock().get_mut(&kind) {
            handlers.retain(|(existing, _)| *existing != id);
        }
    }

    /// Registers the sole responder for `kind`, replacing any prior one.
    pub fn add_synchronous_listener<F, Fut>(&self, kind: RequestKind, responder: F)
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<Response, HarvestError>> + Send + 'static,
    {
        let boxed: Responder = Arc::new(move |req| Box::pin(responder(req)));
        self.inner.responders.lock().insert(kind, boxed);
    }

    /// Removes the responder for `kind`, if any. Idempotent.
    pub fn remove_synchronous_listener(&self, kind: RequestKind) {
        self.inner.responders.lock().remove(&kind);
    }

    /// Broadcasts `event` to all current subscribers of its kind. Returns as
    /// soon as the event is queued; delivery happens on the bus's dispatch
    /// loop.
    pub fn send_event(&self, event: Event) {
        // An unbounded channel only fails to send if the receiver half (the
        // dispatch loop, owned by this same `Inner`) has been dropped, which
        // cannot happen while `self` is alive.
        let _ = self.inner.sender.send(event);
    }

    /// Invokes the sole responder for `request`'s kind and returns its
    /// value, or `None` if no responder is registered. A responder failure
    /// surfaces to the caller.
    pub async fn send_synchronous_event(&self, request: Request) -> Result<Option<Response>, HarvestError> {
        let responder = self.inner.responders.lock().get(&request.kind()).cloned();
        match responder {
            Some(responder) => Ok(Some(responder(request).await?)),
            None => Ok(None),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvester_domain::events::DocumentsHarvested;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[tokio::test]
    async fn broadcasts_to_all_subscribers_of_a_kind() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let c1 = counter.clone();
        bus.add_listener(EventKind::DocumentsHarvested, move |_event| {
            let c1 = c1.clone();
            async move {
                c1.fetch_add(1, Ordering::SeqCst);
            }
        });
        let c2 = counter.clone();
        bus.add_listener(EventKind::DocumentsHarvested, move |_event| {
            let c2 = c2.clone();
            async move {
                c2.fetch_add(1, Ordering::SeqCst);
            }
        });

        let payload = DocumentsHarvested { count: 1 };
        bus.send_event(Event::DocumentsHarvested(DomainEvent::new(payload)));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn removed_listener_is_not_invoked_again() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();
        let id = bus.add_listener(EventKind::DocumentsHarvested, move |_event| {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        bus.send_event(Event::DocumentsHarvested(DomainEvent::new(DocumentsHarvested { count: 1 })));
        tokio::time::sleep(Duration::from_millis(20)).await;
        bus.remove_listener(EventKind::DocumentsHarvested, id);
        bus.send_event(Event::DocumentsHarvested(DomainEvent::new(DocumentsHarvested { count: 1 })));
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn synchronous_request_without_responder_returns_none() {
        let bus = EventBus::new();
        let response = bus
            .send_synchronous_event(Request::IsOutdated {
                pipeline: PipelineName::new("open-library").unwrap(),
            })
            .await
            .unwrap();
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn synchronous_request_invokes_sole_responder() {
        let bus = EventBus::new();
        bus.add_synchronous_listener(RequestKind::IsOutdated, |_request| async { Ok(Response::Outdated(true)) });

        let response = bus
            .send_synchronous_event(Request::IsOutdated {
                pipeline: PipelineName::new("open-library").unwrap(),
            })
            .await
            .unwrap();

        assert!(matches!(response, Some(Response::Outdated(true))));
    }
}
