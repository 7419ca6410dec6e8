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

//! Business logic for the fleet service.

use derivative::Derivative;
use fleet_core::clocks::Clock;
use fleet_core::db::Db;
use fleet_core::driver::{DriverError, DriverResult};
use fleet_core::env::{get_optional_var, get_required_var};
use std::sync::Arc;

mod auth;
mod cars;
mod drivers;
mod engines;
#[cfg(test)]
pub(crate) mod testutils;
mod trips;
mod users;

/// Default work factor for password hashes when not configured.
const DEFAULT_BCRYPT_COST: u32 = 14;

/// Configuration options for user authentication.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
#[cfg_attr(test, derivative(PartialEq))]
pub struct AuthOptions {
    /// Secret with which to sign and verify bearer tokens.
    #[derivative(Debug = "ignore")]
    pub jwt_secret: String,

    /// Work factor for new password hashes.
    pub bcrypt_cost: u32,
}

impl AuthOptions {
    /// Initializes a set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_JWT_SECRET` and `<prefix>_BCRYPT_COST`.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        Ok(Self {
            jwt_secret: get_required_var::<String>(prefix, "JWT_SECRET")?,
            bcrypt_cost: get_optional_var::<u32>(prefix, "BCRYPT_COST")?
                .unwrap_or(DEFAULT_BCRYPT_COST),
        })
    }
}

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": they start and commit a
/// transaction, so it's incorrect for the caller to use two separate calls.  For this reason,
/// these operations consume the driver in an attempt to minimize the possibility of executing
/// two operations.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,

    /// Clock instance to obtain the current time.
    clock: Arc<dyn Clock + Send + Sync>,

    /// Options for user authentication.
    opts: AuthOptions,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(
        db: Arc<dyn Db + Send + Sync>,
        clock: Arc<dyn Clock + Send + Sync>,
        opts: AuthOptions,
    ) -> Self {
        Self { db, clock, opts }
    }
}

/// Unwraps the result of a single-row read of an entity named `what`, failing if it is absent.
fn found<T>(what: &str, entity: Option<T>) -> DriverResult<T> {
    entity.ok_or_else(|| DriverError::NotFound(format!("{} not found", what)))
}
