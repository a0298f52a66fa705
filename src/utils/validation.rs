use crate::domain::model::Coordinate;
use crate::utils::error::{MapError, Result};
use url::Url;

/// Highest zoom level the tile layer serves.
pub const MAX_ZOOM: u8 = 19;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> MapError {
    MapError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Service endpoints and link prefixes must be absolute http(s) URLs.
pub fn validate_endpoint(field: &str, endpoint: &str) -> Result<()> {
    if endpoint.is_empty() {
        return Err(invalid(field, endpoint, "endpoint cannot be empty"));
    }

    let url = Url::parse(endpoint)
        .map_err(|e| invalid(field, endpoint, format!("not a valid URL: {}", e)))?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(invalid(
                field,
                endpoint,
                format!("unsupported scheme {}, expected http or https", scheme),
            ))
        }
    }
    if url.host_str().is_none() {
        return Err(invalid(field, endpoint, "endpoint has no host"));
    }
    Ok(())
}

pub fn validate_coordinate(field: &str, at: Coordinate) -> Result<Coordinate> {
    Coordinate::checked(at.lat, at.lon).map_err(|e| match e {
        MapError::InvalidCoordinate { value, reason } => invalid(field, value, reason),
        other => other,
    })
}

pub fn validate_zoom(field: &str, zoom: u8) -> Result<()> {
    if zoom > MAX_ZOOM {
        return Err(invalid(
            field,
            zoom,
            format!("zoom must be between 0 and {}", MAX_ZOOM),
        ));
    }
    Ok(())
}

pub fn validate_radius(field: &str, radius_m: u32, max_m: u32) -> Result<()> {
    if radius_m == 0 || radius_m > max_m {
        return Err(invalid(
            field,
            radius_m,
            format!("search radius must be between 1 and {} metres", max_m),
        ));
    }
    Ok(())
}

/// Phone numbers go into the messaging link path: optional leading `+`, then digits.
pub fn validate_phone(field: &str, phone: &str) -> Result<()> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(
            field,
            phone,
            "phone number must be digits with an optional leading +",
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "value cannot be empty or whitespace-only"));
    }
    Ok(())
}

pub fn validate_path(field: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field, path, "path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field, path, "path contains null bytes"));
    }
    Ok(())
}
