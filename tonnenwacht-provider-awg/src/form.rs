//! Navigation of the address form up to the rendered result page.

use std::time::Duration;

use thirtyfour::components::SelectElement;
use thirtyfour::prelude::*;

use tonnenwacht_core::{
    model::{Address, PickupEvent},
    ports::PortError,
};

use crate::{browser_err, extract, wait_for};

const ORT_SELECT: &str = "//form[@name='TargetForm']//select[@name='Ort']";
const STRASSE_SELECT: &str = "//form[@name='TargetForm']//select[@name='Strasse']";
const HOUSE_NUMBER_INPUT: &str = "//form[@name='TargetForm']//input[@name='Hausnummer']";
const HOUSE_SUFFIX_INPUT: &str = "//form[@name='TargetForm']//input[@name='Hausnummerzusatz']";
const FORWARD_ANCHOR: &str = "//form[@name='TargetForm']//a[@name='forward']";
const BACK_ANCHOR: &str = "//form[@name='TargetForm']//a[@name='back']";

/// Residual panel doubles as the "result page has rendered" marker.
const RESIDUAL_PANEL: &str = "//div[@id='terminerestmuell']";

fn street_option_xpath(street: &str) -> String {
    format!("//form[@name='TargetForm']//select[@name='Strasse']/option[@value='{street}']")
}

/// One completed form submission.
pub(crate) struct FormAttempt {
    /// Nearest pickup per bin visible on the result page.
    pub(crate) pickups: Vec<PickupEvent>,
    /// Anchor leading back to the form, captured on the result page so
    /// the caller can drive the next attempt explicitly.
    pub(crate) back: WebElement,
}

/// Fill the address form, submit it, and extract the result panels.
pub(crate) async fn submit_and_extract(
    driver: &WebDriver,
    address: &Address,
    timeout: Duration,
) -> Result<FormAttempt, PortError> {
    let locality = driver
        .find(By::XPath(ORT_SELECT))
        .await
        .map_err(browser_err)?;
    SelectElement::new(&locality)
        .await
        .map_err(browser_err)?
        .select_by_value(&address.locality)
        .await
        .map_err(browser_err)?;

    // The street list is repopulated after the locality is chosen; the
    // concrete option has to exist before it can be selected.
    wait_for(driver, &street_option_xpath(&address.street), timeout).await?;
    let street = driver
        .find(By::XPath(STRASSE_SELECT))
        .await
        .map_err(browser_err)?;
    SelectElement::new(&street)
        .await
        .map_err(browser_err)?
        .select_by_value(&address.street)
        .await
        .map_err(browser_err)?;

    let number = wait_for(driver, HOUSE_NUMBER_INPUT, timeout).await?;
    number.clear().await.map_err(browser_err)?;
    number
        .send_keys(&address.house_number)
        .await
        .map_err(browser_err)?;

    let suffix = wait_for(driver, HOUSE_SUFFIX_INPUT, timeout).await?;
    suffix.clear().await.map_err(browser_err)?;
    suffix
        .send_keys(&address.house_number_suffix)
        .await
        .map_err(browser_err)?;

    driver
        .find(By::XPath(FORWARD_ANCHOR))
        .await
        .map_err(browser_err)?
        .click()
        .await
        .map_err(browser_err)?;

    wait_for(driver, RESIDUAL_PANEL, timeout).await?;
    let back = driver
        .find(By::XPath(BACK_ANCHOR))
        .await
        .map_err(browser_err)?;

    let pickups = extract::nearest_per_bin(driver).await?;

    Ok(FormAttempt { pickups, back })
}
