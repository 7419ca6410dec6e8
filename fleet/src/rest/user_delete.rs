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

//! API to delete a user, keeping its records.

use crate::driver::Driver;
use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use fleet_core::model::parse_id;
use fleet_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let id = parse_id("user", &id)?;
    let user = driver.soft_delete_user(id).await?;
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use crate::model::User;
    use crate::rest::testutils::*;
    use axum::http;
    use fleet_core::rest::testutils::*;
    use fleet_core::test_payload_must_be_empty;
    use uuid::Uuid;

    fn route(id: Uuid) -> (http::Method, String) {
        (http::Method::DELETE, format!("/api/v1/users/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let user = context.create_user("alice").await;

        let response = OneShotBuilder::new(context.app(), route(user.id))
            .with_bearer_auth(context.token())
            .send_empty()
            .await
            .expect_json::<User>()
            .await;
        assert_eq!(user, response);

        OneShotBuilder::new(context.app(), route(user.id))
            .with_bearer_auth(context.token())
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("User not found")
            .await;
    }

    #[tokio::test]
    async fn test_bad_id() {
        let context = TestContext::setup().await;

        let user = context.create_user("alice").await;

        let route = (http::Method::DELETE, format!("/api/v1/users/{}x", user.id));
        OneShotBuilder::new(context.app(), route)
            .with_bearer_auth(context.token())
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Invalid user id")
            .await;
        assert_eq!(user, context.driver().get_user(user.id).await.unwrap());
    }

    test_payload_must_be_empty!(
        TestContext::setup().await.into_app(),
        route(Uuid::new_v4()),
        bearer = TestContext::setup().await.token()
    );
}
