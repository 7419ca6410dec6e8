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

//! Test utilities for the business layer.

use crate::db;
use crate::driver::{AuthOptions, Driver};
use crate::model::{
    self, Car, CarRequest, DriverRequest, Engine, EngineRequest, Password, Trip, TripRequest,
    User, UserRequest,
};
use fleet_core::clocks::Clock;
use fleet_core::clocks::testutils::SettableClock;
use fleet_core::db::{Db, Executor};
use std::sync::Arc;
use time::OffsetDateTime;
use time::macros::datetime;
use uuid::Uuid;

/// Password of the users created by `TestContext::create_user`.
pub(crate) const TEST_PASSWORD: &str = "test0password";

/// Username recorded as the creator of the entities created by the helpers in this module.
pub(crate) const TEST_ACTOR: &str = "admin";

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the driver.
    db: Arc<dyn Db + Send + Sync>,

    /// Clock to control the current time seen by the driver.
    clock: Arc<SettableClock>,

    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    /// Initializes the driver using an in-memory database and a settable clock.
    pub(crate) async fn setup() -> Self {
        let _can_fail = env_logger::builder().is_test(true).try_init();

        let db: Arc<dyn Db + Send + Sync> =
            Arc::new(fleet_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::new(SettableClock::new(datetime!(2024-06-01 10:00:00 UTC)));
        let opts = AuthOptions { jwt_secret: "test-secret".to_owned(), bcrypt_cost: 4 };
        let driver = Driver::new(db.clone(), clock.clone(), opts);
        Self { db, clock, driver }
    }

    /// Gets a direct executor against the database.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Gets the clock used by the driver.
    pub(crate) fn clock(&self) -> &SettableClock {
        &self.clock
    }

    /// Gets the current time as seen by the driver.
    pub(crate) fn now(&self) -> OffsetDateTime {
        self.clock.now_utc()
    }

    /// Gets a copy of the driver in this test context.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Creates an engine with valid specifications.
    pub(crate) async fn create_engine(&self) -> Engine {
        let request = EngineRequest { displacement: 1500, no_of_cylinders: 4, car_range: 600 };
        self.driver().create_engine(request).await.unwrap()
    }

    /// Creates a car with `registration_number` of `brand` powered by `engine`.
    pub(crate) async fn create_car(
        &self,
        registration_number: &str,
        brand: &str,
        engine: &Engine,
    ) -> Car {
        let request = car_request(registration_number, brand, engine);
        self.driver().create_car(TEST_ACTOR, request).await.unwrap()
    }

    /// Creates an active user named `username` that logs in with `TEST_PASSWORD`.
    pub(crate) async fn create_user(&self, username: &str) -> User {
        self.driver().create_user(TEST_ACTOR, user_request(username)).await.unwrap()
    }

    /// Creates a driver backed by `user`.
    pub(crate) async fn create_driver(&self, user: &User) -> model::Driver {
        let request = DriverRequest {
            user_id: user.id,
            driver_license_number: format!("DL-{}", user.username),
            license_expiry: datetime!(2030-01-01 00:00:00 UTC),
        };
        self.driver().create_driver(TEST_ACTOR, request).await.unwrap()
    }

    /// Creates a trip done by `driver` with `car`.
    pub(crate) async fn create_trip(&self, driver: &model::Driver, car: &Car) -> Trip {
        self.driver().create_trip(TEST_ACTOR, trip_request(driver.id, car.id)).await.unwrap()
    }
}

/// Builds a valid request to create a car.
pub(crate) fn car_request(registration_number: &str, brand: &str, engine: &Engine) -> CarRequest {
    CarRequest {
        registration_number: registration_number.to_owned(),
        name: "Civic".to_owned(),
        year: "2020".to_owned(),
        brand: brand.to_owned(),
        fuel_type: "Petrol".to_owned(),
        status: "Available".to_owned(),
        engine: engine.clone(),
        price: 15000.0,
    }
}

/// Builds a valid request to create a user named `username`.
pub(crate) fn user_request(username: &str) -> UserRequest {
    UserRequest {
        username: username.to_owned(),
        password: Password::from(TEST_PASSWORD),
        confirm_password: Password::from(TEST_PASSWORD),
        first_name: "Jane".to_owned(),
        last_name: "Doe".to_owned(),
        email: format!("{}@example.com", username),
        phone_number: "+254700000000".to_owned(),
        role: "manager".to_owned(),
    }
}

/// Builds a valid request to create a trip.
pub(crate) fn trip_request(driver_id: Uuid, car_id: Uuid) -> TripRequest {
    TripRequest {
        description: "Delivery".to_owned(),
        driver_id,
        car_id,
        start_location: "Nairobi".to_owned(),
        end_location: "Mombasa".to_owned(),
        start_time: Some(datetime!(2024-05-01 08:00:00 UTC)),
        end_time: None,
        distance_km: 480.5,
        fuel_consumed_liters: 35.2,
        status: "Scheduled".to_owned(),
    }
}
