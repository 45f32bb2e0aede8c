//! Extraction of per-bin pickup dates from the result page.

use chrono::NaiveDate;
use thirtyfour::prelude::*;

use tonnenwacht_core::{
    model::{Bin, PickupEvent, parse_site_date},
    ports::PortError,
};

use crate::browser_err;

/// Date cells for a bin's panel. Each panel lists zero or more pickups
/// in ascending date order.
fn date_cells_xpath(bin: Bin) -> &'static str {
    match bin {
        Bin::Residual => {
            "//div[@id='terminerestmuell']//td[@name='WasteDisposalServicesDialogComponent.DateRM']"
        }
        Bin::Paper => {
            "//div[@id='terminepapier']//td[@name='WasteDisposalServicesDialogComponent.DatePapier']"
        }
        Bin::Organic => {
            "//div[@id='terminebio']//td[@name='WasteDisposalServicesDialogComponent.DateBio']"
        }
    }
}

/// Collect the nearest pickup per bin from the rendered result page.
/// Bins without any date cell are skipped.
pub(crate) async fn nearest_per_bin(driver: &WebDriver) -> Result<Vec<PickupEvent>, PortError> {
    let mut pickups = Vec::new();

    for bin in Bin::ALL {
        let cells = driver
            .find_all(By::XPath(date_cells_xpath(bin)))
            .await
            .map_err(browser_err)?;

        let mut texts = Vec::with_capacity(cells.len());
        for cell in cells {
            texts.push(cell.text().await.map_err(browser_err)?);
        }

        if let Some(date) = nearest_date(&texts)? {
            pickups.push(PickupEvent { bin, date });
        }
    }

    Ok(pickups)
}

/// Parse every cell and return the first one, the panels being sorted
/// ascending. A single malformed cell fails the whole run.
pub(crate) fn nearest_date(cells: &[String]) -> Result<Option<NaiveDate>, PortError> {
    let mut dates = Vec::with_capacity(cells.len());
    for raw in cells {
        dates.push(parse_site_date(raw)?);
    }
    Ok(dates.into_iter().next())
}
