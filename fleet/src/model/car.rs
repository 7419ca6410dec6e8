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

//! The `Car` entity.

use crate::model::engine::{Engine, validate_specs};
use derive_more::Display;
use fleet_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

/// Earliest model year we accept for a car.
const MIN_YEAR: i32 = 1886;

/// Types of fuel a car can run on.
#[derive(Clone, Copy, Debug, Deserialize, Display, PartialEq, Serialize)]
pub(crate) enum FuelType {
    /// Petrol.
    Petrol,

    /// Diesel.
    Diesel,

    /// Battery electric.
    Electric,

    /// Combination of a combustion engine and an electric motor.
    Hybrid,
}

impl FromStr for FuelType {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        match s {
            "Petrol" => Ok(FuelType::Petrol),
            "Diesel" => Ok(FuelType::Diesel),
            "Electric" => Ok(FuelType::Electric),
            "Hybrid" => Ok(FuelType::Hybrid),
            _ => Err(ModelError(
                "fuel type must be one of: Petrol, Diesel, Electric, or Hybrid".to_owned(),
            )),
        }
    }
}

/// Availability of a car.
#[derive(Clone, Copy, Debug, Deserialize, Display, PartialEq, Serialize)]
pub(crate) enum CarStatus {
    /// The car can be assigned to a trip.
    Available,

    /// The car is currently assigned.
    #[serde(alias = "In Use")]
    InUse,

    /// The car is being serviced.
    Maintenance,

    /// The car has been retired from the fleet.
    Decommissioned,
}

impl FromStr for CarStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        match s {
            "Available" => Ok(CarStatus::Available),
            "InUse" | "In Use" => Ok(CarStatus::InUse),
            "Maintenance" => Ok(CarStatus::Maintenance),
            "Decommissioned" => Ok(CarStatus::Decommissioned),
            _ => Err(ModelError(
                "status must be one of: Available, InUse, Maintenance, or Decommissioned"
                    .to_owned(),
            )),
        }
    }
}

/// A car of the fleet.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct Car {
    /// Identifier of the car.
    pub(crate) id: Uuid,

    /// Registration plate.  Unique across the fleet.
    pub(crate) registration_number: String,

    /// Model name.
    pub(crate) name: String,

    /// Model year, kept as text as clients send it.
    pub(crate) year: String,

    /// Manufacturer.
    pub(crate) brand: String,

    /// Fuel the car runs on.
    pub(crate) fuel_type: FuelType,

    /// Current availability.
    pub(crate) status: CarStatus,

    /// Engine of the car.  Only the identifier is set unless the engine details were loaded.
    pub(crate) engine: Engine,

    /// Purchase price.
    pub(crate) price: f64,

    /// Username that created the car.
    pub(crate) created_by: String,

    /// Username that last modified the car.
    pub(crate) updated_by: String,

    /// Deletion time, if the car was retired via a soft delete.
    #[serde(with = "time::serde::rfc3339::option")]
    pub(crate) deleted_at: Option<OffsetDateTime>,

    /// Creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) created_at: OffsetDateTime,

    /// Last modification time.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) updated_at: OffsetDateTime,
}

/// Payload to create or update a car.
#[derive(Debug, Default, Deserialize)]
#[cfg_attr(test, derive(Clone, Serialize))]
#[serde(default)]
pub(crate) struct CarRequest {
    /// Registration plate.
    pub(crate) registration_number: String,

    /// Model name.
    pub(crate) name: String,

    /// Model year.
    pub(crate) year: String,

    /// Manufacturer.
    pub(crate) brand: String,

    /// Fuel the car runs on, as an unvalidated string.
    pub(crate) fuel_type: String,

    /// Current availability, as an unvalidated string.
    pub(crate) status: String,

    /// Engine of the car.  The engine must already exist.
    pub(crate) engine: Engine,

    /// Purchase price.
    pub(crate) price: f64,
}

impl CarRequest {
    /// Validates the request against the business rules, using `current_year` as the most recent
    /// acceptable model year.
    ///
    /// Returns the parsed fuel type and status on success.
    pub(crate) fn validate(&self, current_year: i32) -> ModelResult<(FuelType, CarStatus)> {
        if self.registration_number.is_empty() {
            return Err(ModelError("registration number is required".to_owned()));
        }
        if self.name.is_empty() {
            return Err(ModelError("name is required".to_owned()));
        }
        validate_year(&self.year, current_year)?;
        if self.brand.is_empty() {
            return Err(ModelError("brand is required".to_owned()));
        }
        let fuel_type = FuelType::from_str(&self.fuel_type)?;
        let status = CarStatus::from_str(&self.status)?;
        if self.engine.engine_id.is_nil() {
            return Err(ModelError("engine id is required".to_owned()));
        }
        let engine = &self.engine;
        validate_specs(engine.displacement, engine.no_of_cylinders, engine.car_range)?;
        if self.price <= 0.0 || self.price.is_nan() {
            return Err(ModelError("price must be greater than 0".to_owned()));
        }
        Ok((fuel_type, status))
    }
}

/// Checks that `year` is a number between `MIN_YEAR` and `current_year`.
fn validate_year(year: &str, current_year: i32) -> ModelResult<()> {
    if year.is_empty() {
        return Err(ModelError("year is required".to_owned()));
    }
    let year = year
        .parse::<i32>()
        .map_err(|_| ModelError("year must be a valid number".to_owned()))?;
    if year < MIN_YEAR || year > current_year {
        return Err(ModelError(format!(
            "year must be between {} and {}",
            MIN_YEAR, current_year
        )));
    }
    Ok(())
}
