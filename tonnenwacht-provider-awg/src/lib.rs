//! Schedule provider that drives the AWG address-lookup form through a
//! WebDriver session.
//!
//! The site is an external, unversioned collaborator: element names and
//! panel ids in [`form`] and [`extract`] mirror its current markup and
//! may break without notice.

/// Pure helpers for turning scraped date cells into pickup events.
mod extract;
/// Form navigation: fill the address, submit, land on the result page.
mod form;

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use tracing::{debug, warn};

use tonnenwacht_core::{
    model::{Address, PickupEvent},
    ports::{PortError, SchedulePort},
};

/// Interval between element-presence polls.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Radio inputs offering one collection period each; absent on addresses
/// with a single schedule.
const PERIOD_INPUTS: &str = "//form[@name='TargetForm']//input[@name='Zeitraum']";

/// Connection details for the browser-driven lookup.
#[derive(Debug, Clone)]
pub struct AwgConfig {
    /// WebDriver endpoint, e.g. a local chromedriver.
    pub webdriver_url: String,
    /// Entry URL of the lookup form.
    pub site_url: String,
    /// Wait budget for each element lookup.
    pub wait_timeout: Duration,
}

impl AwgConfig {
    /// Create a config with the default 10 second element wait budget.
    #[must_use]
    pub fn new<W: Into<String>, S: Into<String>>(webdriver_url: W, site_url: S) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            site_url: site_url.into(),
            wait_timeout: Duration::from_secs(10),
        }
    }
}

/// Pickup schedule implementation backed by the AWG lookup site.
pub struct AwgSchedulePort {
    config: AwgConfig,
}

impl AwgSchedulePort {
    /// Create a new schedule port for the given endpoints.
    #[must_use]
    pub fn new(config: AwgConfig) -> Self {
        Self { config }
    }

    async fn lookup(
        &self,
        driver: &WebDriver,
        address: &Address,
        target: NaiveDate,
    ) -> Result<Vec<PickupEvent>, PortError> {
        driver
            .goto(&self.config.site_url)
            .await
            .map_err(browser_err)?;

        // Period radios are optional; probe once without a wait.
        let initial = driver
            .query(By::XPath(PERIOD_INPUTS))
            .nowait()
            .all()
            .await
            .map_err(browser_err)?;

        if initial.is_empty() {
            let attempt = form::submit_and_extract(driver, address, self.config.wait_timeout).await?;
            return Ok(attempt.pickups);
        }

        let count = initial.len();
        let mut radios = initial;
        let mut pickups = Vec::new();

        for index in 0..count {
            let radio = radios.get(index).ok_or_else(|| {
                PortError::Browser("Period option disappeared between attempts".to_owned())
            })?;
            let label = radio
                .attr("value")
                .await
                .map_err(browser_err)?
                .unwrap_or_default();
            radio.click().await.map_err(browser_err)?;

            let attempt = form::submit_and_extract(driver, address, self.config.wait_timeout).await?;
            pickups = attempt.pickups;

            if pickups.iter().any(|pickup| pickup.date == target) {
                debug!(period = %label, "Period contains a pickup on the target date");
                break;
            }
            debug!(period = %label, "No pickup on the target date in this period");

            if index + 1 == count {
                break;
            }

            // Returning to the selector screen invalidates the radio
            // handles; re-query them once the screen has rendered.
            attempt.back.click().await.map_err(browser_err)?;
            radios = wait_for_all(driver, PERIOD_INPUTS, self.config.wait_timeout).await?;
        }

        Ok(pickups)
    }
}

#[async_trait]
impl SchedulePort for AwgSchedulePort {
    async fn nearest_pickups(
        &self,
        address: &Address,
        target: NaiveDate,
    ) -> Result<Vec<PickupEvent>, PortError> {
        let driver = start_session(&self.config.webdriver_url).await?;

        let outcome = self.lookup(&driver, address, target).await;

        // The session must die on every exit path; a failed quit is not
        // worth failing an otherwise successful run over.
        if let Err(err) = driver.quit().await {
            warn!(error = %err, "Failed to quit browser session");
        }

        outcome
    }
}

async fn start_session(webdriver_url: &str) -> Result<WebDriver, PortError> {
    let mut caps = DesiredCapabilities::chrome();
    caps.add_chrome_option("args", vec!["--headless", "--no-sandbox"])
        .map_err(browser_err)?;

    WebDriver::new(webdriver_url, caps)
        .await
        .map_err(|err| PortError::Browser(format!("Failed to connect to {webdriver_url}: {err}")))
}

pub(crate) fn browser_err(err: WebDriverError) -> PortError {
    PortError::Browser(err.to_string())
}

pub(crate) async fn wait_for(
    driver: &WebDriver,
    xpath: &str,
    timeout: Duration,
) -> Result<WebElement, PortError> {
    driver
        .query(By::XPath(xpath))
        .wait(timeout, POLL_INTERVAL)
        .first()
        .await
        .map_err(|err| PortError::Browser(format!("Timed out waiting for {xpath}: {err}")))
}

pub(crate) async fn wait_for_all(
    driver: &WebDriver,
    xpath: &str,
    timeout: Duration,
) -> Result<Vec<WebElement>, PortError> {
    wait_for(driver, xpath, timeout).await?;
    driver.find_all(By::XPath(xpath)).await.map_err(browser_err)
}
