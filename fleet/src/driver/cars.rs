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

//! Operations on cars.

use crate::db;
use crate::driver::{Driver, found};
use crate::model::{Car, CarRequest, Engine};
use fleet_core::db::Executor;
use fleet_core::driver::{DriverError, DriverResult};
use log::info;
use uuid::Uuid;

/// Loads the engine identified by `id` that a car is about to reference.
async fn get_referenced_engine(ex: &mut Executor, id: Uuid) -> DriverResult<Engine> {
    db::get_engine(ex, id)
        .await?
        .ok_or_else(|| DriverError::ReferentialIntegrity(format!("Engine {} does not exist", id)))
}

impl Driver {
    /// Creates a new car on behalf of `actor` with the details in `request`.
    ///
    /// The engine referenced by the request must exist.
    pub(crate) async fn create_car(self, actor: &str, request: CarRequest) -> DriverResult<Car> {
        let now = self.clock.now_utc();
        let (fuel_type, status) = request.validate(now.year())?;

        let engine =
            get_referenced_engine(&mut self.db.ex().await?, request.engine.engine_id).await?;

        let car = Car {
            id: Uuid::new_v4(),
            registration_number: request.registration_number,
            name: request.name,
            year: request.year,
            brand: request.brand,
            fuel_type,
            status,
            engine,
            price: request.price,
            created_by: actor.to_owned(),
            updated_by: actor.to_owned(),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        let mut tx = self.db.begin().await?;
        db::create_car(tx.ex(), &car).await?;
        tx.commit().await?;

        info!("Created car {} ({})", car.id, car.registration_number);
        Ok(car)
    }

    /// Gets the car identified by `id` together with its engine.
    pub(crate) async fn get_car(self, id: Uuid) -> DriverResult<Car> {
        found("Car", db::get_car(&mut self.db.ex().await?, id).await?)
    }

    /// Gets all cars, restricted to those of `brand` if given.  The details of their engines are
    /// only loaded if `with_engine` is true.
    pub(crate) async fn list_cars(
        self,
        brand: Option<String>,
        with_engine: bool,
    ) -> DriverResult<Vec<Car>> {
        Ok(db::list_cars(&mut self.db.ex().await?, brand.as_deref(), with_engine).await?)
    }

    /// Replaces the details of the car identified by `id` with those in `request` on behalf of
    /// `actor`.
    pub(crate) async fn update_car(
        self,
        actor: &str,
        id: Uuid,
        request: CarRequest,
    ) -> DriverResult<Car> {
        let now = self.clock.now_utc();
        let (fuel_type, status) = request.validate(now.year())?;

        let mut tx = self.db.begin().await?;
        let mut car = found("Car", db::get_car(tx.ex(), id).await?)?;
        car.registration_number = request.registration_number;
        car.name = request.name;
        car.year = request.year;
        car.brand = request.brand;
        car.fuel_type = fuel_type;
        car.status = status;
        car.engine = get_referenced_engine(tx.ex(), request.engine.engine_id).await?;
        car.price = request.price;
        car.updated_by = actor.to_owned();
        car.updated_at = now;
        db::update_car(tx.ex(), &car).await?;
        tx.commit().await?;

        info!("Updated car {}", id);
        Ok(car)
    }

    /// Deletes the car identified by `id` and returns its last state.
    pub(crate) async fn delete_car(self, id: Uuid) -> DriverResult<Car> {
        let mut tx = self.db.begin().await?;
        let car = found("Car", db::get_car(tx.ex(), id).await?)?;
        db::delete_car(tx.ex(), id).await?;
        tx.commit().await?;

        info!("Deleted car {}", id);
        Ok(car)
    }
}
