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

//! Test utilities for the REST API.

use crate::driver::testutils::{self, TEST_ACTOR};
use crate::model::{Car, Driver, Engine, Trip, User};
use crate::rest::app;
use axum::Router;
use fleet_core::clocks::testutils::SettableClock;

/// State of a running test.
pub(crate) struct TestContext {
    /// Fixtures that operate on the business layer behind the app.
    base: testutils::TestContext,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Initializes a fresh app backed by an in-memory database.
    pub(crate) async fn setup() -> Self {
        let base = testutils::TestContext::setup().await;
        let app = app(base.driver());
        Self { base, app }
    }

    /// Gets a clone of the app router.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and transforms it into the app router.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Gets the clock used by the app.
    pub(crate) fn clock(&self) -> &SettableClock {
        self.base.clock()
    }

    /// Issues a valid token for the test actor.
    pub(crate) fn token(&self) -> String {
        self.base.driver().issue_token(TEST_ACTOR).unwrap()
    }

    /// Creates an engine with default specs.
    pub(crate) async fn create_engine(&self) -> Engine {
        self.base.create_engine().await
    }

    /// Creates a car with `registration_number` and `brand` powered by `engine`.
    pub(crate) async fn create_car(
        &self,
        registration_number: &str,
        brand: &str,
        engine: &Engine,
    ) -> Car {
        self.base.create_car(registration_number, brand, engine).await
    }

    /// Creates an active user named `username`.
    pub(crate) async fn create_user(&self, username: &str) -> User {
        self.base.create_user(username).await
    }

    /// Creates a driver backed by a new user named `username`.
    pub(crate) async fn create_driver(&self, username: &str) -> Driver {
        let user = self.base.create_user(username).await;
        self.base.create_driver(&user).await
    }

    /// Creates a trip for `driver` with `car`.
    pub(crate) async fn create_trip(&self, driver: &Driver, car: &Car) -> Trip {
        self.base.create_trip(driver, car).await
    }

    /// Gets the business layer behind the app to inspect its state.
    pub(crate) fn driver(&self) -> crate::driver::Driver {
        self.base.driver()
    }
}
