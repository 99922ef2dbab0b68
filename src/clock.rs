//! Midnight tracker: where on the globe is it currently midnight.

use axum::Json;
use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TimeResponse {
    pub utc_time: DateTime<Utc>,
    /// Longitude where local midnight currently falls
    pub midnight_longitude: f64,
}

/// At 12:00 UTC, noon is at longitude 0, so midnight is at 180/-180.
/// Normalized to the [-180, 180] range.
pub fn midnight_longitude(dt: DateTime<Utc>) -> f64 {
    let hours = dt.hour() as f64 + (dt.minute() as f64 / 60.0) + (dt.second() as f64 / 3600.0);

    let mut longitude = (12.0 - hours) * 15.0 - 180.0;

    while longitude > 180.0 {
        longitude -= 360.0;
    }
    while longitude < -180.0 {
        longitude += 360.0;
    }

    longitude
}

/// GET /time — Current UTC time plus the midnight longitude.
pub async fn get_time() -> Json<TimeResponse> {
    let now = Utc::now();
    Json(TimeResponse {
        utc_time: now,
        midnight_longitude: midnight_longitude(now),
    })
}
