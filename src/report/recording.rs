use super::UpdateObserver;
use crate::pipeline::{Step, StepOutcome};
use crate::version::{ServerVersion, UpdateStatus};

/// One call received by a [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserverEvent {
    StepStart(Step),
    StepEnd(Step, StepOutcome),
    DownloadProgress { received: u64, total: Option<u64> },
    Versions { latest: ServerVersion, current: ServerVersion },
    Status(UpdateStatus),
}

/// Observer that stores every event in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Vec<ObserverEvent>,
}

impl RecordingObserver {
    pub fn events(&self) -> &[ObserverEvent] {
        &self.events
    }

    /// Outcome of the last run of `step`, if it ended.
    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.events.iter().rev().find_map(|event| match event {
            ObserverEvent::StepEnd(s, outcome) if *s == step => Some(outcome),
            _ => None,
        })
    }

    /// The reported update status, if the run got that far.
    pub fn status(&self) -> Option<UpdateStatus> {
        self.events.iter().find_map(|event| match event {
            ObserverEvent::Status(status) => Some(*status),
            _ => None,
        })
    }
}

impl UpdateObserver for RecordingObserver {
    fn on_step_start(&mut self, step: Step) {
        self.events.push(ObserverEvent::StepStart(step));
    }

    fn on_step_end(&mut self, step: Step, outcome: &StepOutcome) {
        self.events.push(ObserverEvent::StepEnd(step, outcome.clone()));
    }

    fn on_download_progress(&mut self, received: u64, total: Option<u64>) {
        self.events.push(ObserverEvent::DownloadProgress { received, total });
    }

    fn on_versions(&mut self, latest: &ServerVersion, current: &ServerVersion) {
        self.events.push(ObserverEvent::Versions {
            latest: latest.clone(),
            current: current.clone(),
        });
    }

    fn on_status(&mut self, status: UpdateStatus) {
        self.events.push(ObserverEvent::Status(status));
    }
}
