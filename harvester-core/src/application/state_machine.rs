// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Global State Machine
//!
//! A single-instance FSM gating every externally-triggered operation (§4.5).
//! Transitions are event-driven: the machine subscribes to the event bus on
//! construction and never calls into a pipeline or the registry directly.
//! Operation gating is table-driven per [`GlobalStateKind`] rather than
//! modeled as a hierarchy of per-state types, since every "state" here is
//! just the current enum value plus the response table below — there's no
//! per-state behavior beyond what that table already expresses.

use std::sync::Arc;

use harvester_domain::events::StateTransitioned;
use harvester_domain::value_objects::GlobalStateKind;
use harvester_domain::{DomainEvent, EventKind};
use parking_lot::RwLock;

use crate::infrastructure::event_bus::{Event, EventBus};

/// Outcome of an attempted operation against the current global state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OperationOutcome {
    /// The operation was accepted and the transition (if any) has been
    /// applied or will be applied once the triggering event arrives.
    Accepted,
    /// Accepted, but the caller should be warned (reset while aborting).
    AcceptedWithWarning,
    /// Rejected: another long-running operation already owns the machine.
    Busy,
    /// Rejected: the operation makes no sense in the current state (e.g.
    /// `abort` while idle).
    BadRequest,
    /// Rejected: the service is in the terminal `error` state.
    Fubar,
}

pub struct StateMachine {
    current: RwLock<GlobalStateKind>,
    bus: EventBus,
}

impl StateMachine {
    /// Constructs the machine in `initialization` and wires its transition
    /// listeners onto `bus`. Returned as an `Arc` because the listener
    /// closures registered here hold a clone of it for the process lifetime.
    pub fn new(bus: EventBus) -> Arc<Self> {
        let machine = Arc::new(Self {
            current: RwLock::new(GlobalStateKind::Initialization),
            bus,
        });
        machine.clone().subscribe();
        machine
    }

    fn subscribe(self: Arc<Self>) {
        let m = self.clone();
        self.bus.add_listener(EventKind::HarvestStarted, move |_event| {
            let m = m.clone();
            async move { m.transition_to(GlobalStateKind::Harvesting) }
        });

        let m = self.clone();
        self.bus.add_listener(EventKind::SaveStarted, move |_event| {
            let m = m.clone();
            async move { m.transition_to(GlobalStateKind::Saving) }
        });

        let m = self.clone();
        self.bus.add_listener(EventKind::SubmissionStarted, move |_event| {
            let m = m.clone();
            async move { m.transition_to(GlobalStateKind::Submitting) }
        });

        let m = self.clone();
        self.bus.add_listener(EventKind::AbortingStarted, move |_event| {
            let m = m.clone();
            async move { m.transition_to(GlobalStateKind::Aborting) }
        });

        let m = self.clone();
        self.bus.add_listener(EventKind::HarvestFinished, move |_event| {
            let m = m.clone();
            async move { m.transition_to(GlobalStateKind::Idle) }
        });

        let m = self.clone();
        self.bus.add_listener(EventKind::SaveFinished, move |_event| {
            let m = m.clone();
            async move { m.transition_to(GlobalStateKind::Idle) }
        });

        let m = self.clone();
        self.bus.add_listener(EventKind::SubmissionFinished, move |_event| {
            let m = m.clone();
            async move { m.transition_to(GlobalStateKind::Idle) }
        });

        let m = self.clone();
        self.bus.add_listener(EventKind::AbortingFinished, move |_event| {
            let m = m.clone();
            async move { m.transition_to(GlobalStateKind::Idle) }
        });

        let m = self.clone();
        self.bus.add_listener(EventKind::ServiceInitialized, move |event| {
            let m = m.clone();
            async move {
                if let Event::ServiceInitialized(domain_event) = event {
                    let to = if domain_event.payload.success {
                        GlobalStateKind::Idle
                    } else {
                        GlobalStateKind::Error
                    };
                    m.transition_to(to);
                }
            }
        });
    }

    fn transition_to(&self, to: GlobalStateKind) {
        let from = {
            let mut guard = self.current.write();
            let from = *guard;
            *guard = to;
            from
        };
        if from != to {
            tracing::info!(?from, ?to, "state transition");
            self.bus
                .send_event(Event::StateTransitioned(DomainEvent::new(StateTransitioned { from, to })));
        }
    }

    pub fn current(&self) -> GlobalStateKind {
        *self.current.read()
    }

    /// Resets from `error` (or `idle`, a no-op) back to normal operation.
    /// Only the Main Context calls this, after tearing down and rebuilding
    /// whatever failed during initialization.
    pub fn force_to(&self, to: GlobalStateKind) {
        self.transition_to(to);
    }

    fn long_running_op(&self) -> OperationOutcome {
        match self.current() {
            GlobalStateKind::Idle => OperationOutcome::Accepted,
            GlobalStateKind::Error => OperationOutcome::Fubar,
            GlobalStateKind::Initialization
            | GlobalStateKind::Harvesting
            | GlobalStateKind::Saving
            | GlobalStateKind::Submitting
            | GlobalStateKind::Aborting => OperationOutcome::Busy,
        }
    }

    pub fn start_harvest(&self) -> OperationOutcome {
        self.long_running_op()
    }

    pub fn save(&self) -> OperationOutcome {
        self.long_running_op()
    }

    pub fn submit(&self) -> OperationOutcome {
        self.long_running_op()
    }

    pub fn abort(&self) -> OperationOutcome {
        match self.current() {
            GlobalStateKind::Harvesting | GlobalStateKind::Saving | GlobalStateKind::Submitting => OperationOutcome::Accepted,
            GlobalStateKind::Idle => OperationOutcome::BadRequest,
            GlobalStateKind::Error => OperationOutcome::Fubar,
            GlobalStateKind::Initialization | GlobalStateKind::Aborting => OperationOutcome::Busy,
        }
    }

    /// `reset` during `initialization` is only meaningful once
    /// initialization has actually finished; until then it is rejected the
    /// same as every other operation.
    pub fn reset(&self) -> OperationOutcome {
        match self.current() {
            GlobalStateKind::Idle | GlobalStateKind::Error => OperationOutcome::Accepted,
            GlobalStateKind::Aborting => OperationOutcome::AcceptedWithWarning,
            GlobalStateKind::Initialization | GlobalStateKind::Harvesting | GlobalStateKind::Saving | GlobalStateKind::Submitting => {
                OperationOutcome::Busy
            }
        }
    }

    /// `isOutdated` delegates to the registry once idle; everywhere else it
    /// follows the same busy/fubar shape as the other read-side commands.
    pub fn is_outdated(&self) -> OperationOutcome {
        match self.current() {
            GlobalStateKind::Idle => OperationOutcome::Accepted,
            GlobalStateKind::Error => OperationOutcome::Fubar,
            GlobalStateKind::Initialization
            | GlobalStateKind::Harvesting
            | GlobalStateKind::Saving
            | GlobalStateKind::Submitting
            | GlobalStateKind::Aborting => OperationOutcome::Busy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn idle_accepts_start_harvest_and_harvest_started_moves_to_harvesting() {
        let bus = EventBus::new();
        let machine = StateMachine::new(bus.clone());
        machine.force_to(GlobalStateKind::Idle);

        assert_eq!(machine.start_harvest(), OperationOutcome::Accepted);

        bus.send_event(Event::HarvestStarted(DomainEvent::new(harvester_domain::events::HarvestStarted {
            hash: "h".into(),
            max_number_of_documents: 1,
        })));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(machine.current(), GlobalStateKind::Harvesting);
    }

    #[tokio::test]
    async fn harvesting_rejects_save_as_busy_but_accepts_abort() {
        let bus = EventBus::new();
        let machine = StateMachine::new(bus);
        machine.force_to(GlobalStateKind::Harvesting);

        assert_eq!(machine.save(), OperationOutcome::Busy);
        assert_eq!(machine.abort(), OperationOutcome::Accepted);
    }

    #[tokio::test]
    async fn error_state_is_fubar_except_reset() {
        let bus = EventBus::new();
        let machine = StateMachine::new(bus);
        machine.force_to(GlobalStateKind::Error);

        assert_eq!(machine.start_harvest(), OperationOutcome::Fubar);
        assert_eq!(machine.reset(), OperationOutcome::Accepted);
    }

    #[tokio::test]
    async fn failed_service_initialization_moves_to_error() {
        let bus = EventBus::new();
        let machine = StateMachine::new(bus.clone());

        bus.send_event(Event::ServiceInitialized(DomainEvent::new(
            harvester_domain::events::ServiceInitialized { success: false },
        )));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(machine.current(), GlobalStateKind::Error);
    }

    #[tokio::test]
    async fn idle_rejects_abort_as_bad_request() {
        let bus = EventBus::new();
        let machine = StateMachine::new(bus);
        machine.force_to(GlobalStateKind::Idle);
        assert_eq!(machine.abort(), OperationOutcome::BadRequest);
    }
}
