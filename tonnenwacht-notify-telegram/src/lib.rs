//! Notifier sending one message per due pickup through the Telegram
//! Bot API.
//!
//! Message bodies come from plain-text template files with named
//! `{placeholder}` tokens, loaded once at construction.

use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use tonnenwacht_core::{
    model::{PickupEvent, format_message_date},
    ports::{NotifyPort, PortError},
};

const BASE_URL: &str = "https://api.telegram.org/bot";

/// Bot credentials and target chat.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot token as issued by BotFather.
    pub bot_token: String,
    /// Chat the messages are delivered to.
    pub chat_id: String,
}

/// Notifier delivering rendered pickup reminders to a Telegram chat.
pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
    template: String,
}

impl TelegramNotifier {
    /// Create a notifier with the template file `{name}.txt` from the
    /// given templates directory.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::MissingTemplate`] when the template file
    /// cannot be read.
    pub fn from_template_dir(
        client: Client,
        config: TelegramConfig,
        templates_dir: &Path,
        name: &str,
    ) -> Result<Self, PortError> {
        let path = templates_dir.join(format!("{name}.txt"));
        let template = std::fs::read_to_string(&path)
            .map_err(|err| PortError::MissingTemplate(format!("{}: {err}", path.display())))?;

        Ok(Self::new(client, config, template))
    }

    /// Create a notifier with an already-loaded template body.
    #[must_use]
    pub fn new(client: Client, config: TelegramConfig, template: impl Into<String>) -> Self {
        Self {
            client,
            config,
            template: template.into(),
        }
    }

    async fn deliver(&self, text: &str) -> Result<(), PortError> {
        let url = format!("{BASE_URL}{}/sendMessage", self.config.bot_token);

        self.client
            .post(url)
            .form(&[
                ("chat_id", self.config.chat_id.as_str()),
                ("text", text),
                ("parse_mode", "Markdown"),
            ])
            .send()
            .await
            .map_err(PortError::from)?
            .error_for_status()
            .map_err(PortError::from)?;

        Ok(())
    }
}

#[async_trait]
impl NotifyPort for TelegramNotifier {
    async fn send(&self, pickup: &PickupEvent, member: &str) -> Result<(), PortError> {
        let text = render(&self.template, pickup, member);

        self.deliver(&text).await?;
        debug!(bin = %pickup.bin, member = %member, "Sent pickup reminder");

        Ok(())
    }
}

/// Substitute the named placeholders into the template body. Unknown
/// placeholders are left verbatim.
fn render(template: &str, pickup: &PickupEvent, member: &str) -> String {
    template
        .replace("{tomorrow_date}", &format_message_date(pickup.date))
        .replace("{dustbin_color}", pickup.bin.color())
        .replace("{dustbin_label}", pickup.bin.label())
        .replace("{person_name}", member)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tonnenwacht_core::model::Bin;

    use super::*;

    fn pickup() -> PickupEvent {
        PickupEvent {
            bin: Bin::Paper,
            date: NaiveDate::from_ymd_opt(2023, 3, 15).expect("valid test date"),
        }
    }

    #[test]
    fn all_placeholders_are_substituted() {
        let template =
            "{person_name}: put out the {dustbin_color} bin ({dustbin_label}) on {tomorrow_date}.";

        let text = render(template, &pickup(), "Ada");

        assert_eq!(
            text,
            "Ada: put out the blue bin (Papiertonne) on 15/03/2023."
        );
    }

    #[test]
    fn repeated_placeholders_are_all_replaced() {
        let text = render("{person_name} {person_name}", &pickup(), "Ada");

        assert_eq!(text, "Ada Ada");
    }

    #[test]
    fn unknown_placeholders_survive_rendering() {
        let text = render("{person_name} {weather}", &pickup(), "Ada");

        assert_eq!(text, "Ada {weather}");
    }

    #[test]
    fn missing_template_file_is_reported_with_its_path() {
        let result = TelegramNotifier::from_template_dir(
            Client::new(),
            TelegramConfig {
                bot_token: "token".to_owned(),
                chat_id: "chat".to_owned(),
            },
            Path::new("/nonexistent/templates"),
            "pickup",
        );

        match result {
            Err(PortError::MissingTemplate(message)) => {
                assert!(
                    message.contains("/nonexistent/templates/pickup.txt"),
                    "message should name the path, got: {message}"
                );
            }
            Err(other) => panic!("expected MissingTemplate, got {other}"),
            Ok(_) => panic!("expected MissingTemplate, got a notifier"),
        }
    }
}
