// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! The `Trip` entity.

use derive_more::Display;
use fleet_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

/// Stages of a trip.
///
/// Any stage can follow any other: the status update operation does not enforce transitions.
#[derive(Clone, Copy, Debug, Deserialize, Display, PartialEq, Serialize)]
pub(crate) enum TripStatus {
    /// The trip is being planned.
    Draft,

    /// The trip has a date.
    Scheduled,

    /// The trip is in progress.
    Ongoing,

    /// The trip finished.
    Completed,

    /// The trip was called off.
    Cancelled,
}

impl FromStr for TripStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        match s {
            "Draft" => Ok(TripStatus::Draft),
            "Scheduled" => Ok(TripStatus::Scheduled),
            "Ongoing" => Ok(TripStatus::Ongoing),
            "Completed" => Ok(TripStatus::Completed),
            "Cancelled" => Ok(TripStatus::Cancelled),
            _ => Err(ModelError(
                "status must be one of: Completed, Scheduled, Ongoing, Cancelled, or Draft"
                    .to_owned(),
            )),
        }
    }
}

/// A journey of a car driven by a driver.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct Trip {
    /// Identifier of the trip.
    pub(crate) id: Uuid,

    /// Free-form purpose of the trip.
    pub(crate) description: String,

    /// Identifier of the driver doing the trip.
    pub(crate) driver_id: Uuid,

    /// Identifier of the car used in the trip.
    pub(crate) car_id: Uuid,

    /// Starting point.
    pub(crate) start_location: String,

    /// Destination.
    pub(crate) end_location: String,

    /// Departure time.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) start_time: OffsetDateTime,

    /// Arrival time, unknown while the trip is not over.
    #[serde(with = "time::serde::rfc3339::option")]
    pub(crate) end_time: Option<OffsetDateTime>,

    /// Distance covered in kilometers.
    pub(crate) distance_km: f64,

    /// Fuel consumed in liters.
    pub(crate) fuel_consumed_liters: f64,

    /// Stage of the trip.  Kept as text because status-only updates are not validated.
    pub(crate) status: String,

    /// Username that created the trip.
    pub(crate) created_by: String,

    /// Username that last modified the trip.
    pub(crate) updated_by: String,

    /// Creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) created_at: OffsetDateTime,

    /// Last modification time.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) updated_at: OffsetDateTime,
}

/// Payload to create or update a trip.
#[derive(Debug, Default, Deserialize)]
#[cfg_attr(test, derive(Clone, Serialize))]
#[serde(default)]
pub(crate) struct TripRequest {
    /// Free-form purpose of the trip.
    pub(crate) description: String,

    /// Identifier of the driver doing the trip.
    pub(crate) driver_id: Uuid,

    /// Identifier of the car used in the trip.
    pub(crate) car_id: Uuid,

    /// Starting point.
    pub(crate) start_location: String,

    /// Destination.
    pub(crate) end_location: String,

    /// Departure time.
    #[serde(with = "time::serde::rfc3339::option")]
    pub(crate) start_time: Option<OffsetDateTime>,

    /// Arrival time.
    #[serde(with = "time::serde::rfc3339::option")]
    pub(crate) end_time: Option<OffsetDateTime>,

    /// Distance covered in kilometers.
    pub(crate) distance_km: f64,

    /// Fuel consumed in liters.
    pub(crate) fuel_consumed_liters: f64,

    /// Stage of the trip.
    pub(crate) status: String,
}

/// Builds the error for a required `field` that was not provided.
fn missing(field: &str) -> ModelError {
    ModelError(format!("missing required field: {}", field))
}

impl TripRequest {
    /// Validates the request and returns the validated start time and status.
    ///
    /// Distance and fuel are only rejected when they are zero.
    pub(crate) fn validate(&self) -> ModelResult<(OffsetDateTime, TripStatus)> {
        if self.description.is_empty() {
            return Err(missing("description"));
        }
        if self.driver_id.is_nil() {
            return Err(missing("driver_id"));
        }
        if self.car_id.is_nil() {
            return Err(missing("car_id"));
        }
        if self.start_location.is_empty() {
            return Err(missing("start_location"));
        }
        if self.end_location.is_empty() {
            return Err(missing("end_location"));
        }
        let start_time = self.start_time.ok_or_else(|| missing("start_time"))?;
        if self.distance_km == 0.0 {
            return Err(missing("distance_km"));
        }
        if self.fuel_consumed_liters == 0.0 {
            return Err(missing("fuel_consumed_liters"));
        }
        let status = TripStatus::from_str(&self.status)?;
        Ok((start_time, status))
    }
}
