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

//! The `Driver` entity.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Subset of the details of the user that backs a driver.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct DriverUser {
    /// Identifier of the user.
    pub(crate) id: Uuid,

    /// Login name of the user.
    pub(crate) username: String,

    /// Given name.
    pub(crate) first_name: String,

    /// Family name.
    pub(crate) last_name: String,

    /// Contact email address.
    pub(crate) email: String,
}

/// A person licensed to drive cars of the fleet.  Every driver is backed by a user.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct Driver {
    /// Identifier of the driver.
    pub(crate) id: Uuid,

    /// Identifier of the user backing this driver.
    pub(crate) user_id: Uuid,

    /// Number of the driving license.
    pub(crate) driver_license_number: String,

    /// Expiration time of the driving license.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) license_expiry: OffsetDateTime,

    /// Whether the driver can be assigned to trips.
    pub(crate) active: bool,

    /// Username that created the driver.
    pub(crate) created_by: String,

    /// Deletion time, if the driver was soft-deleted.
    #[serde(with = "time::serde::rfc3339::option")]
    pub(crate) deleted_at: Option<OffsetDateTime>,

    /// Creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) created_at: OffsetDateTime,

    /// Last modification time.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) updated_at: OffsetDateTime,

    /// Details of the backing user, present when loaded together with the driver.
    pub(crate) user: Option<DriverUser>,
}

/// Payload to create a driver.
#[derive(Debug, Deserialize)]
#[cfg_attr(test, derive(Clone, Serialize))]
pub(crate) struct DriverRequest {
    /// Identifier of the user backing the new driver.  The user must already exist.
    pub(crate) user_id: Uuid,

    /// Number of the driving license.
    pub(crate) driver_license_number: String,

    /// Expiration time of the driving license.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) license_expiry: OffsetDateTime,
}

/// Payload to update the license details of a driver.
#[derive(Debug, Deserialize)]
#[cfg_attr(test, derive(Clone, Serialize))]
pub(crate) struct DriverUpdateRequest {
    /// Number of the driving license.
    pub(crate) driver_license_number: String,

    /// Expiration time of the driving license.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) license_expiry: OffsetDateTime,
}
