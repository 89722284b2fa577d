// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Control Facade
//!
//! Translates external commands into state-machine calls. No business logic
//! lives here (§4.9) — only: pick the current state's response, invoke the
//! state machine, and shape the result into a transport-agnostic
//! [`FacadeResponse`]. Binding this onto an actual REST surface is outside
//! this crate (§1, §6).

use std::sync::Arc;
use std::time::Duration;

use harvester_domain::events::{AbortingStarted, SaveStarted, StartAbortingEvent, SubmissionStarted};
use harvester_domain::value_objects::GlobalStateKind;
use harvester_domain::DomainEvent;

use super::etl_registry::EtlRegistry;
use super::state_machine::{OperationOutcome, StateMachine};
use crate::infrastructure::event_bus::{Event, EventBus, Request, Response};
use crate::infrastructure::time_keeper::TimeKeeper;

/// HTTP-shaped status a transport layer maps 1:1 onto a response code
/// (§6's REST table uses 202/200/503/400/500; this enum names the same five
/// outcomes without depending on an HTTP crate).
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FacadeStatus {
    Accepted,
    Ok,
    Busy,
    BadRequest,
    Error,
}

#[derive(Debug, Clone)]
pub struct FacadeResponse {
    pub status: FacadeStatus,
    pub body: String,
    pub retry_after: Option<Duration>,
}

impl FacadeResponse {
    fn accepted(body: impl Into<String>) -> Self {
        Self { status: FacadeStatus::Accepted, body: body.into(), retry_after: None }
    }

    fn ok(body: impl Into<String>) -> Self {
        Self { status: FacadeStatus::Ok, body: body.into(), retry_after: None }
    }

    fn busy() -> Self {
        Self {
            status: FacadeStatus::Busy,
            body: "busy".to_string(),
            retry_after: Some(Duration::from_secs(5)),
        }
    }

    fn bad_request(body: impl Into<String>) -> Self {
        Self { status: FacadeStatus::BadRequest, body: body.into(), retry_after: None }
    }

    fn fubar() -> Self {
        Self { status: FacadeStatus::Error, body: "service is in error state".to_string(), retry_after: None }
    }

    fn from_outcome(outcome: OperationOutcome, accepted_body: &str) -> Self {
        match outcome {
            OperationOutcome::Accepted => Self::accepted(accepted_body),
            OperationOutcome::AcceptedWithWarning => Self {
                status: FacadeStatus::Accepted,
                body: format!("{accepted_body} (warning: operation in flight was interrupted)"),
                retry_after: None,
            },
            OperationOutcome::Busy => Self::busy(),
            OperationOutcome::BadRequest => Self::bad_request("no operation in progress"),
            OperationOutcome::Fubar => Self::fubar(),
        }
    }
}

pub struct ControlFacade {
    state_machine: Arc<StateMachine>,
    registry: Arc<EtlRegistry>,
    time_keeper: TimeKeeper,
    bus: EventBus,
}

impl ControlFacade {
    pub fn new(state_machine: Arc<StateMachine>, registry: Arc<EtlRegistry>, time_keeper: TimeKeeper, bus: EventBus) -> Self {
        Self { state_machine, registry, time_keeper, bus }
    }

    /// Accepts or rejects immediately; the actual `prepareHarvest` →
    /// `harvest` sequence (§4.7) runs on a spawned task so the caller never
    /// waits on pipeline I/O.
    pub fn start_harvest(&self, force_harvest: bool) -> FacadeResponse {
        let outcome = self.state_machine.start_harvest();
        if outcome == OperationOutcome::Accepted {
            let registry = self.registry.clone();
            let bus = self.bus.clone();
            tokio::spawn(async move {
                if let Err(err) = registry.run_harvest(bus, force_harvest).await {
                    tracing::warn!(error = %err, "harvest run ended without success");
                }
            });
        }
        FacadeResponse::from_outcome(outcome, "harvest started")
    }

    pub fn abort(&self) -> FacadeResponse {
        let outcome = self.state_machine.abort();
        if outcome == OperationOutcome::Accepted {
            self.bus.send_event(Event::AbortingStarted(DomainEvent::new(AbortingStarted {})));
            self.bus
                .send_event(Event::StartAborting(DomainEvent::new(StartAbortingEvent {})));
        }
        FacadeResponse::from_outcome(outcome, "aborting")
    }

    pub fn save(&self) -> FacadeResponse {
        let outcome = self.state_machine.save();
        if outcome == OperationOutcome::Accepted {
            self.bus.send_event(Event::SaveStarted(DomainEvent::new(SaveStarted {})));
        }
        FacadeResponse::from_outcome(outcome, "save started")
    }

    pub fn submit(&self) -> FacadeResponse {
        let outcome = self.state_machine.submit();
        if outcome == OperationOutcome::Accepted {
            self.bus
                .send_event(Event::SubmissionStarted(DomainEvent::new(SubmissionStarted {})));
        }
        FacadeResponse::from_outcome(outcome, "submit started")
    }

    pub fn reset(&self) -> FacadeResponse {
        let outcome = self.state_machine.reset();
        if outcome != OperationOutcome::Busy {
            self.state_machine.force_to(GlobalStateKind::Idle);
        }
        FacadeResponse::from_outcome(outcome, "reset")
    }

    pub fn state(&self) -> FacadeResponse {
        FacadeResponse::ok(self.state_machine.current().to_string())
    }

    pub fn overview(&self) -> FacadeResponse {
        FacadeResponse::ok(format!(
            "state={} pipelines={} hash={}",
            self.state_machine.current(),
            self.registry.len(),
            self.registry.hash()
        ))
    }

    pub fn progress(&self) -> FacadeResponse {
        let max = self.registry.max_number_of_documents();
        if max < 0 {
            FacadeResponse::ok("N/A".to_string())
        } else {
            FacadeResponse::ok(format!("0/{max}"))
        }
    }

    pub fn max_documents(&self) -> FacadeResponse {
        let max = self.registry.max_number_of_documents();
        if max < 0 {
            FacadeResponse::ok("N/A".to_string())
        } else {
            FacadeResponse::ok(max.to_string())
        }
    }

    /// Delegates to the registry: outdated iff any registered pipeline's
    /// cache reports its stable source fingerprint differs from the current
    /// one (§4.4, invariant 10).
    pub async fn is_outdated(&self) -> FacadeResponse {
        let outcome = self.state_machine.is_outdated();
        if outcome != OperationOutcome::Accepted {
            return FacadeResponse::from_outcome(outcome, "");
        }

        let mut any_outdated = false;
        for pipeline in self.registry.pipeline_names() {
            let response = self.bus.send_synchronous_event(Request::IsOutdated { pipeline }).await;
            if let Ok(Some(Response::Outdated(true))) = response {
                any_outdated = true;
                break;
            }
        }
        FacadeResponse::ok(any_outdated.to_string())
    }

    /// Whether the most recent harvest run left its process-time measure in
    /// `failed` or `aborted` (used by health/readiness reporting, not by the
    /// REST table directly).
    pub fn harvest_incomplete(&self) -> bool {
        self.time_keeper.is_harvest_incomplete()
    }
}
