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

//! REST interface of the fleet service.
//!
//! Every API lives in its own file named after the entity it acts on and the HTTP method that
//! triggers it.  All APIs except login require a bearer token obtained from the login API.

use crate::driver::Driver;
use axum::Router;
use axum::middleware;
use serde::Deserialize;

mod bearer;
mod car_delete;
mod car_get;
mod car_put;
mod car_trips_get;
mod cars_get;
mod cars_post;
mod driver_delete;
mod driver_get;
mod driver_hard_delete;
mod driver_put;
mod driver_toggle_put;
mod driver_trips_get;
mod drivers_get;
mod drivers_post;
mod engine_delete;
mod engine_get;
mod engine_put;
mod engines_get;
mod engines_post;
mod login_post;
#[cfg(test)]
mod testutils;
mod trip_delete;
mod trip_get;
mod trip_put;
mod trip_status_put;
mod trips_get;
mod trips_post;
mod user_delete;
mod user_get;
mod user_password_put;
mod user_put;
mod user_toggle_put;
mod users_get;
mod users_post;

pub(crate) use bearer::AuthenticatedUser;

/// Query parameters shared by the APIs that toggle the `active` flag of an entity.
#[derive(Debug, Deserialize)]
pub(crate) struct ToggleQuery {
    /// New value of the flag.
    pub(crate) active: bool,
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::{delete, get, post, put};

    let protected = Router::new()
        .route("/api/v1/engines", get(engines_get::handler).post(engines_post::handler))
        .route(
            "/api/v1/engines/:id",
            get(engine_get::handler).put(engine_put::handler).delete(engine_delete::handler),
        )
        .route("/api/v1/cars", get(cars_get::handler).post(cars_post::handler))
        .route(
            "/api/v1/cars/:id",
            get(car_get::handler).put(car_put::handler).delete(car_delete::handler),
        )
        .route("/api/v1/cars/:id/trips", get(car_trips_get::handler))
        .route("/api/v1/drivers", get(drivers_get::handler).post(drivers_post::handler))
        .route(
            "/api/v1/drivers/:id",
            get(driver_get::handler).put(driver_put::handler).delete(driver_delete::handler),
        )
        .route("/api/v1/drivers/:id/delete", delete(driver_hard_delete::handler))
        .route("/api/v1/drivers/:id/toggle-status", put(driver_toggle_put::handler))
        .route("/api/v1/drivers/:id/trips", get(driver_trips_get::handler))
        .route("/api/v1/trips", get(trips_get::handler).post(trips_post::handler))
        .route(
            "/api/v1/trips/:id",
            get(trip_get::handler).put(trip_put::handler).delete(trip_delete::handler),
        )
        .route("/api/v1/trips/:id/update-status", put(trip_status_put::handler))
        .route("/api/v1/users", get(users_get::handler).post(users_post::handler))
        .route(
            "/api/v1/users/:id",
            get(user_get::handler).put(user_put::handler).delete(user_delete::handler),
        )
        .route("/api/v1/users/:id/update-password", put(user_password_put::handler))
        .route("/api/v1/users/:id/toggle-status", put(user_toggle_put::handler))
        .route_layer(middleware::from_fn_with_state(driver.clone(), bearer::require_token));

    Router::new()
        .route("/api/v1/login", post(login_post::handler))
        .merge(protected)
        .with_state(driver)
}
