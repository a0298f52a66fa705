use anyhow::Result;
use rescue_map::domain::model::{Action, Coordinate, Notice};
use rescue_map::{
    ConsoleLinks, ConsoleNotifier, EmergencyMap, GeoJsonMap, MapConfig, OsrmClient,
    OverpassClient, Services, StaticLocation,
};
use std::sync::Arc;

fn app_with(
    config: MapConfig,
    location: StaticLocation,
) -> (EmergencyMap, Arc<ConsoleLinks>, Arc<ConsoleNotifier>) {
    let links = Arc::new(ConsoleLinks::quiet());
    let notifier = Arc::new(ConsoleNotifier::quiet());
    // The alert never touches the network, so the service clients point nowhere useful.
    let services = Services {
        location: Arc::new(location),
        places: Arc::new(OverpassClient::new("http://127.0.0.1:9/api/interpreter")),
        router: Arc::new(OsrmClient::new("http://127.0.0.1:9", "driving")),
        map: Arc::new(GeoJsonMap::new()),
        notifier: notifier.clone(),
        links: links.clone(),
    };
    (EmergencyMap::new(config, services), links, notifier)
}

#[tokio::test]
async fn test_alert_reaches_both_default_recipients() -> Result<()> {
    let (app, links, notifier) = app_with(
        MapConfig::default(),
        StaticLocation::Known(Coordinate::new(12.9716, 77.5946)),
    );
    app.start().await?;

    let report = app.send_alert().await?;

    let opened = links.opened();
    assert_eq!(opened.len(), 2);
    assert!(opened[0].starts_with("https://wa.me/+919500420634?text="));
    assert!(opened[1].starts_with("https://wa.me/+917671952358?text="));

    let expected_text = "🚨 EMERGENCY ALERT! 🚨\nI need immediate assistance. My live location:\nhttps://maps.google.com/?q=12.9716,77.5946";
    assert_eq!(report.message, expected_text);
    for link in &opened {
        let (_, text) = link.split_once("?text=").unwrap();
        assert_eq!(urlencoding::decode(text)?, expected_text);
    }

    assert_eq!(notifier.history().len(), 1);
    assert_eq!(
        notifier.history()[0].to_string(),
        "🚨 SOS Activated! Live location sent to Police & Ambulance via WhatsApp."
    );
    Ok(())
}

#[tokio::test]
async fn test_alert_without_location_opens_nothing() -> Result<()> {
    let (app, links, notifier) = app_with(MapConfig::default(), StaticLocation::Unsupported);
    assert!(app.start().await.is_err());

    assert!(app.send_alert().await.is_err());

    assert!(links.opened().is_empty());
    let alert_errors: Vec<Notice> = notifier
        .history()
        .into_iter()
        .filter(|notice| *notice == Notice::LocationMissing(Action::Alert))
        .collect();
    assert_eq!(alert_errors.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_alert_uses_configured_recipients() -> Result<()> {
    let config = MapConfig::from_toml_str(
        r#"
[alert]
map_link_base = "https://www.openstreetmap.org/?mlat="

[[alert.recipients]]
label = "Family"
phone = "+441234567890"
"#,
    )?;
    let (app, links, _) = app_with(config, StaticLocation::Known(Coordinate::new(51.5, -0.1)));
    app.start().await?;

    app.send_alert().await?;

    let opened = links.opened();
    assert_eq!(opened.len(), 1);
    assert!(opened[0].starts_with("https://wa.me/+441234567890?text="));
    let encoded_link = urlencoding::encode("https://www.openstreetmap.org/?mlat=51.5,-0.1");
    assert!(opened[0].ends_with(&*encoded_link));
    Ok(())
}
