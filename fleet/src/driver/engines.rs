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

//! Operations on engines.

use crate::db;
use crate::driver::{Driver, found};
use crate::model::{Engine, EngineRequest};
use fleet_core::driver::DriverResult;
use log::info;
use uuid::Uuid;

impl Driver {
    /// Creates a new engine with the specifications in `request`.
    pub(crate) async fn create_engine(self, request: EngineRequest) -> DriverResult<Engine> {
        request.validate()?;

        let engine = Engine::from_request(Uuid::new_v4(), &request);
        let mut tx = self.db.begin().await?;
        db::create_engine(tx.ex(), &engine).await?;
        tx.commit().await?;

        info!("Created engine {}", engine.engine_id);
        Ok(engine)
    }

    /// Gets the engine identified by `id`.
    pub(crate) async fn get_engine(self, id: Uuid) -> DriverResult<Engine> {
        found("Engine", db::get_engine(&mut self.db.ex().await?, id).await?)
    }

    /// Gets all engines.
    pub(crate) async fn list_engines(self) -> DriverResult<Vec<Engine>> {
        Ok(db::list_engines(&mut self.db.ex().await?).await?)
    }

    /// Replaces the specifications of the engine identified by `id` with those in `request`.
    pub(crate) async fn update_engine(
        self,
        id: Uuid,
        request: EngineRequest,
    ) -> DriverResult<Engine> {
        request.validate()?;

        let engine = Engine::from_request(id, &request);
        let mut tx = self.db.begin().await?;
        db::update_engine(tx.ex(), &engine).await?;
        tx.commit().await?;

        info!("Updated engine {}", id);
        Ok(engine)
    }

    /// Deletes the engine identified by `id` and returns its last state.
    pub(crate) async fn delete_engine(self, id: Uuid) -> DriverResult<Engine> {
        let mut tx = self.db.begin().await?;
        let engine = found("Engine", db::get_engine(tx.ex(), id).await?)?;
        db::delete_engine(tx.ex(), id).await?;
        tx.commit().await?;

        info!("Deleted engine {}", id);
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;
    use fleet_core::driver::DriverError;

    #[tokio::test]
    async fn test_create_engine_ok() {
        let context = TestContext::setup().await;

        let request = EngineRequest { displacement: 1500, no_of_cylinders: 4, car_range: 600 };
        let engine = context.driver().create_engine(request).await.unwrap();
        assert!(!engine.engine_id.is_nil());
        assert_eq!(1500, engine.displacement);
        assert_eq!(4, engine.no_of_cylinders);
        assert_eq!(600, engine.car_range);

        let stored = db::get_engine(&mut context.ex().await, engine.engine_id).await.unwrap();
        assert_eq!(Some(engine.clone()), stored);
    }

    #[tokio::test]
    async fn test_create_engine_fresh_ids() {
        let context = TestContext::setup().await;

        let engine1 = context.create_engine().await;
        let engine2 = context.create_engine().await;
        assert_ne!(engine1.engine_id, engine2.engine_id);
    }

    #[tokio::test]
    async fn test_create_engine_invalid_writes_nothing() {
        let context = TestContext::setup().await;

        let specs = [(0, 4, 600), (1500, -1, 600), (1500, 4, 0)];
        for (displacement, no_of_cylinders, car_range) in specs {
            let request = EngineRequest { displacement, no_of_cylinders, car_range };
            match context.driver().create_engine(request).await {
                Err(DriverError::InvalidInput(msg)) => {
                    assert!(msg.contains("must be greater than 0"))
                }
                e => panic!("{:?}", e),
            }
        }

        assert!(db::list_engines(&mut context.ex().await).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_engine_not_found() {
        let context = TestContext::setup().await;

        assert_eq!(
            DriverError::NotFound("Engine not found".to_owned()),
            context.driver().get_engine(Uuid::new_v4()).await.unwrap_err()
        );
    }

    #[tokio::test]
    async fn test_list_engines() {
        let context = TestContext::setup().await;

        assert!(context.driver().list_engines().await.unwrap().is_empty());

        let engine1 = context.create_engine().await;
        let engine2 = context.create_engine().await;
        let mut exp_engines = vec![engine1, engine2];
        exp_engines.sort_by_key(|e| e.engine_id);
        assert_eq!(exp_engines, context.driver().list_engines().await.unwrap());
    }

    #[tokio::test]
    async fn test_update_engine_ok() {
        let context = TestContext::setup().await;

        let engine = context.create_engine().await;
        let request = EngineRequest { displacement: 2000, no_of_cylinders: 6, car_range: 400 };
        let updated = context.driver().update_engine(engine.engine_id, request).await.unwrap();
        assert_eq!(
            Engine {
                engine_id: engine.engine_id,
                displacement: 2000,
                no_of_cylinders: 6,
                car_range: 400,
            },
            updated
        );
        assert_eq!(updated, context.driver().get_engine(engine.engine_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_engine_not_found() {
        let context = TestContext::setup().await;

        let request = EngineRequest { displacement: 2000, no_of_cylinders: 6, car_range: 400 };
        assert_eq!(
            DriverError::NotFound("Entity not found".to_owned()),
            context.driver().update_engine(Uuid::new_v4(), request).await.unwrap_err()
        );
        assert!(db::list_engines(&mut context.ex().await).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_engine_ok() {
        let context = TestContext::setup().await;

        let engine = context.create_engine().await;
        assert_eq!(engine, context.driver().delete_engine(engine.engine_id).await.unwrap());
        assert_eq!(None, db::get_engine(&mut context.ex().await, engine.engine_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_engine_in_use() {
        let context = TestContext::setup().await;

        let engine = context.create_engine().await;
        context.create_car("KAA001A", "Honda", &engine).await;
        match context.driver().delete_engine(engine.engine_id).await {
            Err(DriverError::ReferentialIntegrity(_)) => (),
            e => panic!("{:?}", e),
        }
        assert!(db::get_engine(&mut context.ex().await, engine.engine_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_engine_not_found() {
        let context = TestContext::setup().await;

        assert_eq!(
            DriverError::NotFound("Engine not found".to_owned()),
            context.driver().delete_engine(Uuid::new_v4()).await.unwrap_err()
        );
    }
}
