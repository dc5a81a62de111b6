//! HTTP client for the Indico room booking API.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::IndicoConfig;
use crate::error::{IndicoError, IndicoResult};
use crate::request::build_indico_request;

const ROOMS_PATH: &str = "/rooms/api/rooms";
const CALENDAR_PATH: &str = "/rooms/api/calendar";

/// A bookable room. The API sends more fields; only these are kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Room {
    pub id: u64,
    pub full_name: String,
}

/// One reserved time slot, as returned by the calendar endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Booking {
    /// `YYYY-MM-DDTHH:MM:SS`, no offset
    pub start_dt: String,
    pub end_dt: String,
    pub reservation: Reservation,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reservation {
    pub booking_reason: String,
    pub booked_for_name: String,
}

#[derive(Serialize)]
struct CalendarRequest {
    room_ids: Vec<u64>,
}

/// Authenticated client for one Indico instance.
pub struct IndicoClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
    timeout_secs: u64,
}

impl IndicoClient {
    pub fn new(config: &IndicoConfig) -> IndicoResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("indico-ics/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| IndicoError::Config(format!("Could not build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            api_token: config.api_token.clone(),
            timeout_secs: config.request_timeout_secs,
        })
    }

    /// GET /rooms/api/rooms
    pub async fn list_rooms(&self, only_public: bool) -> IndicoResult<BTreeMap<u64, Room>> {
        let url = format!("{}{}", self.base_url, build_indico_request(ROOMS_PATH, &[], only_public));

        let request = self.http.get(&url).header(CONTENT_TYPE, "application/json");
        let body = self.send_json(request, &url).await?;

        let rooms: Vec<Room> = serde_json::from_value(body).map_err(|e| IndicoError::ApiResponse {
            url: url.clone(),
            reason: format!("unexpected room listing: {e}"),
        })?;

        debug!(count = rooms.len(), "fetched room listing");

        Ok(rooms.into_iter().map(|room| (room.id, room)).collect())
    }

    /// POST /rooms/api/calendar
    ///
    /// Returns the room's bookings grouped the way Indico groups them (one
    /// group per day key), in the order the response object yields them.
    pub async fn list_bookings(
        &self,
        room_id: u64,
        start_date: &str,
        end_date: &str,
    ) -> IndicoResult<Vec<Vec<Booking>>> {
        let path = build_indico_request(
            CALENDAR_PATH,
            &[("start_date", start_date), ("end_date", end_date)],
            false,
        );
        let url = format!("{}{}", self.base_url, path);
        let payload = CalendarRequest {
            room_ids: vec![room_id],
        };

        let body = self
            .send_json(self.http.post(&url).json(&payload), &url)
            .await?;

        bookings_from_response(room_id, &url, &body)
    }

    /// Send with the bearer token and decode the body as JSON. Callers set
    /// `Content-Type` themselves (`.json()` already does for POSTs).
    async fn send_json(&self, request: RequestBuilder, url: &str) -> IndicoResult<Value> {
        let response = request
            .bearer_auth(&self.api_token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(IndicoError::Unauthorized {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(IndicoError::ApiStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        serde_json::from_str(&text).map_err(|e| IndicoError::ApiResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    fn transport_error(&self, url: &str, source: reqwest::Error) -> IndicoError {
        if source.is_timeout() {
            IndicoError::Timeout(url.to_string(), self.timeout_secs)
        } else {
            IndicoError::Http {
                url: url.to_string(),
                source,
            }
        }
    }
}

/// Pull `[0].bookings` out of a calendar response.
///
/// Each value under `bookings` may be a list of bookings or a single booking
/// object; both come back as one group. Only an empty `bookings` object means
/// "no bookings"; an empty array or a missing/null `bookings` is an error.
fn bookings_from_response(room_id: u64, url: &str, body: &Value) -> IndicoResult<Vec<Vec<Booking>>> {
    let shape_error = |reason: &str| IndicoError::ApiResponse {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let entries = body
        .as_array()
        .ok_or_else(|| shape_error("expected a JSON array"))?;

    let first = entries
        .first()
        .ok_or_else(|| shape_error("empty response array"))?;

    match first.get("bookings") {
        None | Some(Value::Null) => Err(shape_error("response has no `bookings`")),
        Some(Value::Object(by_day)) => by_day
            .values()
            .map(|group| booking_group(room_id, group))
            .collect(),
        Some(_) => Err(shape_error("`bookings` is not an object")),
    }
}

fn booking_group(room_id: u64, group: &Value) -> IndicoResult<Vec<Booking>> {
    let malformed = |source| IndicoError::MalformedBooking { room_id, source };

    match group {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| Booking::deserialize(item).map_err(malformed))
            .collect(),
        single => Ok(vec![Booking::deserialize(single).map_err(malformed)?]),
    }
}
