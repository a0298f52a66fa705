use crate::config::map_config::AlertConfig;
use crate::domain::model::Coordinate;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// What an alert dispatch handed off to the messaging links.
#[derive(Debug, Clone, Serialize)]
pub struct AlertReport {
    pub message: String,
    pub links: Vec<String>,
    pub sent_at: DateTime<Utc>,
}

pub fn map_link(base: &str, at: Coordinate) -> String {
    format!("{}{},{}", base, at.lat, at.lon)
}

pub fn compose_message(map_link: &str) -> String {
    format!(
        "🚨 EMERGENCY ALERT! 🚨\nI need immediate assistance. My live location:\n{}",
        map_link
    )
}

/// Messaging deep link with the text percent-encoded like `encodeURIComponent`.
pub fn deep_link(messaging_base: &str, phone: &str, text: &str) -> String {
    format!(
        "{}{}?text={}",
        messaging_base,
        phone,
        urlencoding::encode(text)
    )
}

/// Message plus one deep link per recipient, in configuration order.
pub fn prepare(config: &AlertConfig, at: Coordinate) -> (String, Vec<String>) {
    let message = compose_message(&map_link(&config.map_link_base, at));
    let links = config
        .recipients
        .iter()
        .map(|recipient| deep_link(&config.messaging_base, &recipient.phone, &message))
        .collect();
    (message, links)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_embeds_map_link() {
        let link = map_link("https://maps.google.com/?q=", Coordinate::new(51.5, -0.1));
        assert_eq!(link, "https://maps.google.com/?q=51.5,-0.1");

        let message = compose_message(&link);
        assert!(message.starts_with("🚨 EMERGENCY ALERT! 🚨\n"));
        assert!(message.ends_with("\nhttps://maps.google.com/?q=51.5,-0.1"));
    }

    #[test]
    fn test_deep_link_encodes_text() {
        let link = deep_link("https://wa.me/", "+441234", "help me\nnow?");
        assert_eq!(link, "https://wa.me/+441234?text=help%20me%0Anow%3F");
    }

    #[test]
    fn test_prepare_one_link_per_recipient() {
        let config = AlertConfig::default();
        let (message, links) = prepare(&config, Coordinate::new(12.97, 77.59));

        assert_eq!(links.len(), 2);
        assert!(links[0].starts_with("https://wa.me/+919500420634?text="));
        assert!(links[1].starts_with("https://wa.me/+917671952358?text="));

        let encoded = urlencoding::encode(&message).into_owned();
        assert!(links.iter().all(|link| link.ends_with(&encoded)));
    }
}
