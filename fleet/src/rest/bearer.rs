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

//! Middleware to gate APIs behind a bearer token.

use crate::driver::Driver;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use fleet_core::rest::{RestResult, get_bearer_auth};

/// Name of the user that sent a request, as proven by its bearer token.
#[derive(Clone, Debug)]
pub(crate) struct AuthenticatedUser(pub(crate) String);

/// Rejects requests without a valid bearer token and records who sent the accepted ones.
pub(crate) async fn require_token(
    State(driver): State<Driver>,
    mut request: Request,
    next: Next,
) -> RestResult<Response> {
    let username = driver.verify_token(get_bearer_auth(request.headers())?)?;
    request.extensions_mut().insert(AuthenticatedUser(username));
    Ok(next.run(request).await)
}
