use crate::domain::model::{Coordinate, RouteStyle};
use crate::utils::error::{MapError, Result};
use crate::utils::validation::{
    validate_coordinate, validate_endpoint, validate_non_empty_string, validate_phone,
    validate_radius, validate_zoom, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the emergency map. Every field has a default, so an empty
/// TOML document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MapConfig {
    pub services: ServicesConfig,
    pub search: SearchConfig,
    pub map: ViewConfig,
    pub alert: AlertConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub overpass_endpoint: String,
    pub osrm_endpoint: String,
    pub osrm_profile: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            overpass_endpoint: "https://overpass-api.de/api/interpreter".to_string(),
            osrm_endpoint: "https://router.project-osrm.org".to_string(),
            osrm_profile: "driving".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub radius_m: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { radius_m: 25_000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub initial_center: Coordinate,
    pub initial_zoom: u8,
    pub user_zoom: u8,
    pub route_color: String,
    pub route_weight: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        let style = RouteStyle::default();
        Self {
            initial_center: Coordinate::new(51.505, -0.09),
            initial_zoom: 13,
            user_zoom: 14,
            route_color: style.color,
            route_weight: style.weight,
        }
    }
}

impl ViewConfig {
    pub fn route_style(&self) -> RouteStyle {
        RouteStyle {
            color: self.route_color.clone(),
            weight: self.route_weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub map_link_base: String,
    pub messaging_base: String,
    pub recipients: Vec<Recipient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub label: String,
    pub phone: String,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            map_link_base: "https://maps.google.com/?q=".to_string(),
            messaging_base: "https://wa.me/".to_string(),
            recipients: vec![
                Recipient {
                    label: "Police".to_string(),
                    phone: "+919500420634".to_string(),
                },
                Recipient {
                    label: "Ambulance".to_string(),
                    phone: "+917671952358".to_string(),
                },
            ],
        }
    }
}

/// Overpass rejects `around` filters much larger than this.
pub const MAX_SEARCH_RADIUS_M: u32 = 100_000;

impl MapConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(&path).map_err(|e| MapError::ConfigError {
                message: format!("cannot read {}: {}", path.as_ref().display(), e),
            })?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML after replacing `${VAR}` with the environment value.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content)?;

        toml::from_str(&processed).map_err(|e| MapError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

// Unknown variables are left as-is so validation reports them.
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MapError::ConfigError {
        message: format!("invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.into_owned())
}

impl Validate for MapConfig {
    fn validate(&self) -> Result<()> {
        validate_endpoint("services.overpass_endpoint", &self.services.overpass_endpoint)?;
        validate_endpoint("services.osrm_endpoint", &self.services.osrm_endpoint)?;
        validate_non_empty_string("services.osrm_profile", &self.services.osrm_profile)?;

        validate_radius("search.radius_m", self.search.radius_m, MAX_SEARCH_RADIUS_M)?;

        validate_coordinate("map.initial_center", self.map.initial_center)?;
        validate_zoom("map.initial_zoom", self.map.initial_zoom)?;
        validate_zoom("map.user_zoom", self.map.user_zoom)?;
        validate_non_empty_string("map.route_color", &self.map.route_color)?;
        if self.map.route_weight == 0 {
            return Err(MapError::InvalidConfigValueError {
                field: "map.route_weight".to_string(),
                value: "0".to_string(),
                reason: "route line must be at least 1 pixel wide".to_string(),
            });
        }

        validate_endpoint("alert.map_link_base", &self.alert.map_link_base)?;
        validate_endpoint("alert.messaging_base", &self.alert.messaging_base)?;
        if self.alert.recipients.is_empty() {
            return Err(MapError::InvalidConfigValueError {
                field: "alert.recipients".to_string(),
                value: "[]".to_string(),
                reason: "at least one recipient is required".to_string(),
            });
        }
        for recipient in &self.alert.recipients {
            validate_non_empty_string("alert.recipients.label", &recipient.label)?;
            validate_phone("alert.recipients.phone", &recipient.phone)?;
        }

        Ok(())
    }
}
