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

//! Operations on trips.

use crate::db;
use crate::driver::{Driver, found};
use crate::model::{Trip, TripRequest};
use fleet_core::driver::DriverResult;
use log::info;
use uuid::Uuid;

impl Driver {
    /// Records a new trip on behalf of `actor` with the details in `request`.
    ///
    /// The referenced driver and car must exist.
    pub(crate) async fn create_trip(self, actor: &str, request: TripRequest) -> DriverResult<Trip> {
        let (start_time, status) = request.validate()?;

        let now = self.clock.now_utc();
        let trip = Trip {
            id: Uuid::new_v4(),
            description: request.description,
            driver_id: request.driver_id,
            car_id: request.car_id,
            start_location: request.start_location,
            end_location: request.end_location,
            start_time,
            end_time: request.end_time,
            distance_km: request.distance_km,
            fuel_consumed_liters: request.fuel_consumed_liters,
            status: status.to_string(),
            created_by: actor.to_owned(),
            updated_by: actor.to_owned(),
            created_at: now,
            updated_at: now,
        };
        let mut tx = self.db.begin().await?;
        db::create_trip(tx.ex(), &trip).await?;
        tx.commit().await?;

        info!("Created trip {} for driver {} and car {}", trip.id, trip.driver_id, trip.car_id);
        Ok(trip)
    }

    /// Gets the trip identified by `id`.
    pub(crate) async fn get_trip(self, id: Uuid) -> DriverResult<Trip> {
        found("Trip", db::get_trip(&mut self.db.ex().await?, id).await?)
    }

    /// Gets all trips.
    pub(crate) async fn list_trips(self) -> DriverResult<Vec<Trip>> {
        Ok(db::list_trips(&mut self.db.ex().await?).await?)
    }

    /// Gets all trips done with the car identified by `car_id`.
    pub(crate) async fn list_trips_by_car(self, car_id: Uuid) -> DriverResult<Vec<Trip>> {
        Ok(db::list_trips_by_car(&mut self.db.ex().await?, car_id).await?)
    }

    /// Gets all trips done by the driver identified by `driver_id`.
    pub(crate) async fn list_trips_by_driver(self, driver_id: Uuid) -> DriverResult<Vec<Trip>> {
        Ok(db::list_trips_by_driver(&mut self.db.ex().await?, driver_id).await?)
    }

    /// Replaces the details of the trip identified by `id` on behalf of `actor`.
    pub(crate) async fn update_trip(
        self,
        actor: &str,
        id: Uuid,
        request: TripRequest,
    ) -> DriverResult<Trip> {
        let (start_time, status) = request.validate()?;

        let mut tx = self.db.begin().await?;
        let mut trip = found("Trip", db::get_trip(tx.ex(), id).await?)?;
        trip.description = request.description;
        trip.driver_id = request.driver_id;
        trip.car_id = request.car_id;
        trip.start_location = request.start_location;
        trip.end_location = request.end_location;
        trip.start_time = start_time;
        trip.end_time = request.end_time;
        trip.distance_km = request.distance_km;
        trip.fuel_consumed_liters = request.fuel_consumed_liters;
        trip.status = status.to_string();
        trip.updated_by = actor.to_owned();
        trip.updated_at = self.clock.now_utc();
        db::update_trip(tx.ex(), &trip).await?;
        tx.commit().await?;

        info!("Updated trip {}", id);
        Ok(trip)
    }

    /// Moves the trip identified by `id` to `status` on behalf of `actor`.
    ///
    /// Any status and any transition are accepted.
    pub(crate) async fn update_trip_status(
        self,
        actor: &str,
        id: Uuid,
        status: String,
    ) -> DriverResult<Trip> {
        let mut tx = self.db.begin().await?;
        db::update_trip_status(tx.ex(), id, &status, actor, self.clock.now_utc()).await?;
        let trip = found("Trip", db::get_trip(tx.ex(), id).await?)?;
        tx.commit().await?;

        info!("Set status of trip {} to {}", id, status);
        Ok(trip)
    }

    /// Deletes the trip identified by `id` and returns its last state.
    pub(crate) async fn delete_trip(self, id: Uuid) -> DriverResult<Trip> {
        let mut tx = self.db.begin().await?;
        let trip = found("Trip", db::get_trip(tx.ex(), id).await?)?;
        db::delete_trip(tx.ex(), id).await?;
        tx.commit().await?;

        info!("Deleted trip {}", id);
        Ok(trip)
    }
}
