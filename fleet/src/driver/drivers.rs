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

//! Operations on drivers.

use crate::db;
use crate::driver::{Driver, found};
use crate::model::{self, DriverRequest, DriverUpdateRequest, DriverUser};
use fleet_core::db::Executor;
use fleet_core::driver::{DriverError, DriverResult};
use log::info;
use uuid::Uuid;

/// Fetches the user that a new driver will be backed by.
async fn get_backing_user(ex: &mut Executor, id: Uuid) -> DriverResult<DriverUser> {
    match db::get_user(ex, id).await? {
        Some(user) => Ok(DriverUser {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }),
        None => Err(DriverError::ReferentialIntegrity(format!("User {} does not exist", id))),
    }
}

impl Driver {
    /// Creates a new active driver on behalf of `actor` with the details in `request`.
    pub(crate) async fn create_driver(
        self,
        actor: &str,
        request: DriverRequest,
    ) -> DriverResult<model::Driver> {
        let user = get_backing_user(&mut self.db.ex().await?, request.user_id).await?;

        let now = self.clock.now_utc();
        let driver = model::Driver {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            driver_license_number: request.driver_license_number,
            license_expiry: request.license_expiry,
            active: true,
            created_by: actor.to_owned(),
            deleted_at: None,
            created_at: now,
            updated_at: now,
            user: Some(user),
        };
        let mut tx = self.db.begin().await?;
        db::create_driver(tx.ex(), &driver).await?;
        tx.commit().await?;

        info!("Created driver {} for user {}", driver.id, driver.user_id);
        Ok(driver)
    }

    /// Gets the driver identified by `id`.
    pub(crate) async fn get_driver(self, id: Uuid) -> DriverResult<model::Driver> {
        found("Driver", db::get_driver(&mut self.db.ex().await?, id).await?)
    }

    /// Gets all drivers that have not been deleted.
    pub(crate) async fn list_drivers(self) -> DriverResult<Vec<model::Driver>> {
        Ok(db::list_drivers(&mut self.db.ex().await?).await?)
    }

    /// Replaces the license details of the driver identified by `id`.
    pub(crate) async fn update_driver(
        self,
        id: Uuid,
        request: DriverUpdateRequest,
    ) -> DriverResult<model::Driver> {
        let mut tx = self.db.begin().await?;
        let mut driver = found("Driver", db::get_driver(tx.ex(), id).await?)?;
        driver.driver_license_number = request.driver_license_number;
        driver.license_expiry = request.license_expiry;
        driver.updated_at = self.clock.now_utc();
        db::update_driver(tx.ex(), &driver).await?;
        tx.commit().await?;

        info!("Updated driver {}", id);
        Ok(driver)
    }

    /// Sets the `active` flag of the driver identified by `id`.
    pub(crate) async fn toggle_driver_status(
        self,
        id: Uuid,
        active: bool,
    ) -> DriverResult<model::Driver> {
        let mut tx = self.db.begin().await?;
        db::set_driver_active(tx.ex(), id, active, self.clock.now_utc()).await?;
        let driver = found("Driver", db::get_driver(tx.ex(), id).await?)?;
        tx.commit().await?;

        info!("Set driver {} active={}", id, active);
        Ok(driver)
    }

    /// Marks the driver identified by `id` as deleted and returns its last state.
    pub(crate) async fn soft_delete_driver(self, id: Uuid) -> DriverResult<model::Driver> {
        let mut tx = self.db.begin().await?;
        let driver = found("Driver", db::get_driver(tx.ex(), id).await?)?;
        db::soft_delete_driver(tx.ex(), id, self.clock.now_utc()).await?;
        tx.commit().await?;

        info!("Soft-deleted driver {}", id);
        Ok(driver)
    }

    /// Removes the driver identified by `id` for good and returns its last state.
    ///
    /// Soft-deleted drivers can be removed too.  Fails if any trip still references the driver.
    pub(crate) async fn delete_driver(self, id: Uuid) -> DriverResult<model::Driver> {
        let mut tx = self.db.begin().await?;
        let driver = found("Driver", db::get_driver_with_deleted(tx.ex(), id).await?)?;
        db::delete_driver(tx.ex(), id).await?;
        tx.commit().await?;

        info!("Deleted driver {}", id);
        Ok(driver)
    }
}
