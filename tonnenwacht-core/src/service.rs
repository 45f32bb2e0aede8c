//! High-level watch service combining the three adapters.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::model::{Address, PickupEvent};
use crate::ports::{NotifyPort, PortError, RotationPort, SchedulePort};

/// What a single run concluded.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// No bin is collected tomorrow; nothing was sent and the rotation
    /// list was left untouched.
    Quiet,
    /// At least one bin is collected tomorrow.
    Notified {
        /// The pickups that were announced.
        pickups: Vec<PickupEvent>,
        /// Member now responsible for putting the bins out.
        member: String,
    },
}

/// Public entry point for one watch run.
pub struct WatchService {
    schedule: Arc<dyn SchedulePort>,
    rotation: Arc<dyn RotationPort>,
    notify: Arc<dyn NotifyPort>,
}

impl WatchService {
    /// Create a new service bound to the provided adapters.
    #[must_use]
    pub fn new(
        schedule: Arc<dyn SchedulePort>,
        rotation: Arc<dyn RotationPort>,
        notify: Arc<dyn NotifyPort>,
    ) -> Self {
        Self {
            schedule,
            rotation,
            notify,
        }
    }

    /// Execute one run: scrape the schedule, and if any bin is collected
    /// on the day after `today`, rotate the responsible member once and
    /// send one message per due bin.
    ///
    /// # Errors
    ///
    /// Returns the first [`PortError`] raised by an adapter; every
    /// failure is fatal for the run and nothing is retried.
    pub async fn run(&self, address: &Address, today: NaiveDate) -> Result<RunOutcome, PortError> {
        let tomorrow = today
            .succ_opt()
            .ok_or_else(|| PortError::Internal("Today has no successor date".to_owned()))?;

        let pickups = self.schedule.nearest_pickups(address, tomorrow).await?;

        let due: Vec<PickupEvent> = pickups
            .into_iter()
            .filter(|pickup| pickup.date == tomorrow)
            .collect();

        if due.is_empty() {
            info!("No pickups scheduled for tomorrow");
            return Ok(RunOutcome::Quiet);
        }

        // One rotation per run, even when several bins are due.
        let member = self.rotation.advance().await?;
        info!(
            member = %member,
            bins = due.len(),
            "Pickups scheduled for tomorrow"
        );

        for pickup in &due {
            self.notify.send(pickup, &member).await?;
        }

        Ok(RunOutcome::Notified {
            pickups: due,
            member,
        })
    }
}
