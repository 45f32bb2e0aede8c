//! Binary entry point: load the settings, wire the three adapters, run
//! one watch pass, and exit.

mod settings;
mod telemetry;

use std::{env, path::Path, sync::Arc};

use anyhow::{Context, Result};
use chrono::Local;
use reqwest::Client;
use tracing::info;

use tonnenwacht_core::service::{RunOutcome, WatchService};
use tonnenwacht_notify_telegram::{TelegramConfig, TelegramNotifier};
use tonnenwacht_provider_awg::{AwgConfig, AwgSchedulePort};
use tonnenwacht_store_firebase::FirebaseRotationStore;

const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
const TEMPLATES_DIR: &str = "msg_templates";
const TEMPLATE_NAME: &str = "pickup";

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();

    let settings = settings::load()?;
    let bot_token = required_env("BOT_TOKEN")?;
    let chat_id = required_env("CHAT_ID")?;
    let db_url = required_env("DB_URL")?;
    let webdriver_url =
        env::var("WEBDRIVER_URL").unwrap_or_else(|_| DEFAULT_WEBDRIVER_URL.to_owned());

    let client = Client::builder().user_agent("tonnenwacht/0.1").build()?;

    let schedule = Arc::new(AwgSchedulePort::new(AwgConfig::new(
        webdriver_url,
        settings.awg_url.clone(),
    )));
    let rotation = Arc::new(FirebaseRotationStore::new(client.clone(), db_url));
    let notify = Arc::new(TelegramNotifier::from_template_dir(
        client,
        TelegramConfig { bot_token, chat_id },
        Path::new(TEMPLATES_DIR),
        TEMPLATE_NAME,
    )?);

    let service = WatchService::new(schedule, rotation, notify);

    let today = Local::now().date_naive();
    info!(%today, "Starting watch run");

    match service.run(&settings.haus_details, today).await? {
        RunOutcome::Quiet => info!("Done, nothing due tomorrow"),
        RunOutcome::Notified { pickups, member } => {
            info!(member = %member, bins = pickups.len(), "Done, reminders sent");
        }
    }

    Ok(())
}

fn required_env(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("Environment variable {name} is not set"))
}
