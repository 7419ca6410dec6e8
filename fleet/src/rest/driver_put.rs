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

//! API to update the license details of a driver.

use crate::driver::Driver;
use crate::model::DriverUpdateRequest;
use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use fleet_core::model::parse_id;
use fleet_core::rest::RestError;

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    Json(request): Json<DriverUpdateRequest>,
) -> Result<impl IntoResponse, RestError> {
    let id = parse_id("driver", &id)?;
    let driver = driver.update_driver(id, request).await?;
    Ok(Json(driver))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model;
    use crate::rest::testutils::*;
    use axum::http;
    use fleet_core::rest::testutils::*;
    use fleet_core::test_payload_must_be_json;
    use time::macros::datetime;
    use uuid::Uuid;

    fn route(id: Uuid) -> (http::Method, String) {
        (http::Method::PUT, format!("/api/v1/drivers/{}", id))
    }

    /// Builds a request with a new license.
    fn request() -> DriverUpdateRequest {
        DriverUpdateRequest {
            driver_license_number: "DL-RENEWED".to_owned(),
            license_expiry: datetime!(2035-06-30 00:00:00 UTC),
        }
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let driver = context.create_driver("alice").await;

        let response = OneShotBuilder::new(context.app(), route(driver.id))
            .with_bearer_auth(context.token())
            .send_json(request())
            .await
            .expect_json::<model::Driver>()
            .await;
        assert_eq!("DL-RENEWED", response.driver_license_number);
        assert_eq!(datetime!(2035-06-30 00:00:00 UTC), response.license_expiry);
        assert_eq!(driver.user, response.user);

        assert_eq!(response, context.driver().get_driver(driver.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route(Uuid::new_v4()))
            .with_bearer_auth(context.token())
            .send_json(request())
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("Driver not found")
            .await;
    }

    #[tokio::test]
    async fn test_bad_id() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), (http::Method::PUT, "/api/v1/drivers/123"))
            .with_bearer_auth(context.token())
            .send_json(request())
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Invalid driver id '123'")
            .await;
    }

    test_payload_must_be_json!(
        TestContext::setup().await.into_app(),
        route(Uuid::new_v4()),
        bearer = TestContext::setup().await.token()
    );
}
