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

//! Common tests for any database implementation.

use crate::db::*;
use crate::model::{
    Car, CarStatus, Driver, DriverUser, Engine, FuelType, HashedPassword, Trip, User,
};
use fleet_core::db::{Db, DbError, Executor};
use std::sync::Arc;
use time::OffsetDateTime;
use time::macros::datetime;
use uuid::Uuid;

/// Creation time of all test fixtures.
const CREATED_AT: OffsetDateTime = datetime!(2024-03-01 10:00:00.000001 UTC);

/// Modification time used by tests that update fixtures.
const UPDATED_AT: OffsetDateTime = datetime!(2024-03-02 12:30:00.500000 UTC);

/// Creates and stores an engine with fixed specifications.
async fn put_engine(ex: &mut Executor) -> Engine {
    let engine = Engine {
        engine_id: Uuid::new_v4(),
        displacement: 1500,
        no_of_cylinders: 4,
        car_range: 600,
    };
    create_engine(ex, &engine).await.unwrap();
    engine
}

/// Creates and stores a car backed by `engine` with the given `registration_number`.
async fn put_car(
    ex: &mut Executor,
    registration_number: &str,
    brand: &str,
    engine: &Engine,
) -> Car {
    let car = Car {
        id: Uuid::new_v4(),
        registration_number: registration_number.to_owned(),
        name: "Civic".to_owned(),
        year: "2020".to_owned(),
        brand: brand.to_owned(),
        fuel_type: FuelType::Petrol,
        status: CarStatus::Available,
        engine: engine.clone(),
        price: 15000.0,
        created_by: "admin".to_owned(),
        updated_by: "admin".to_owned(),
        deleted_at: None,
        created_at: CREATED_AT,
        updated_at: CREATED_AT,
    };
    create_car(ex, &car).await.unwrap();
    car
}

/// Creates and stores an active user named `username`.
async fn put_user(ex: &mut Executor, username: &str) -> User {
    let user = User {
        id: Uuid::new_v4(),
        username: username.to_owned(),
        first_name: "First".to_owned(),
        last_name: "Last".to_owned(),
        email: format!("{}@example.com", username),
        phone_number: "+254700000000".to_owned(),
        role: "manager".to_owned(),
        active: true,
        created_by: "admin".to_owned(),
        deleted_at: None,
        created_at: CREATED_AT,
        updated_at: CREATED_AT,
    };
    create_user(ex, &user, &HashedPassword::new(format!("hash-of-{}", username))).await.unwrap();
    user
}

/// Creates and stores an active driver backed by `user`.
async fn put_driver(ex: &mut Executor, user: &User, license: &str) -> Driver {
    let driver = Driver {
        id: Uuid::new_v4(),
        user_id: user.id,
        driver_license_number: license.to_owned(),
        license_expiry: datetime!(2030-01-01 00:00:00 UTC),
        active: true,
        created_by: "admin".to_owned(),
        deleted_at: None,
        created_at: CREATED_AT,
        updated_at: CREATED_AT,
        user: None,
    };
    create_driver(ex, &driver).await.unwrap();
    driver
}

/// Creates and stores a trip of `driver` with `car` that starts at `start_time`.
async fn put_trip(
    ex: &mut Executor,
    driver: &Driver,
    car: &Car,
    start_time: OffsetDateTime,
) -> Trip {
    let trip = Trip {
        id: Uuid::new_v4(),
        description: "Delivery".to_owned(),
        driver_id: driver.id,
        car_id: car.id,
        start_location: "Nairobi".to_owned(),
        end_location: "Mombasa".to_owned(),
        start_time,
        end_time: None,
        distance_km: 480.5,
        fuel_consumed_liters: 35.2,
        status: "Scheduled".to_owned(),
        created_by: "admin".to_owned(),
        updated_by: "admin".to_owned(),
        created_at: CREATED_AT,
        updated_at: CREATED_AT,
    };
    create_trip(ex, &trip).await.unwrap();
    trip
}

/// Returns the details that joined reads attach to a driver backed by `user`.
fn driver_user(user: &User) -> DriverUser {
    DriverUser {
        id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
    }
}

pub(super) async fn test_engines_crud(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let engine1 = put_engine(&mut ex).await;
    let mut engine2 = put_engine(&mut ex).await;
    assert_eq!(Some(engine1.clone()), get_engine(&mut ex, engine1.engine_id).await.unwrap());

    let mut exp_engines = vec![engine1.clone(), engine2.clone()];
    exp_engines.sort_by_key(|e| e.engine_id);
    assert_eq!(exp_engines, list_engines(&mut ex).await.unwrap());

    engine2.displacement = 2000;
    engine2.no_of_cylinders = 6;
    engine2.car_range = 450;
    update_engine(&mut ex, &engine2).await.unwrap();
    assert_eq!(Some(engine2.clone()), get_engine(&mut ex, engine2.engine_id).await.unwrap());

    delete_engine(&mut ex, engine1.engine_id).await.unwrap();
    assert_eq!(None, get_engine(&mut ex, engine1.engine_id).await.unwrap());
    assert_eq!(vec![engine2], list_engines(&mut ex).await.unwrap());
}

pub(super) async fn test_engines_not_found(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let engine = Engine::with_id(Uuid::new_v4());
    assert_eq!(None, get_engine(&mut ex, engine.engine_id).await.unwrap());
    assert_eq!(DbError::NotFound, update_engine(&mut ex, &engine).await.unwrap_err());
    assert_eq!(DbError::NotFound, delete_engine(&mut ex, engine.engine_id).await.unwrap_err());
    assert!(list_engines(&mut ex).await.unwrap().is_empty());
}

pub(super) async fn test_engines_delete_in_use(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let engine = put_engine(&mut ex).await;
    put_car(&mut ex, "KAA001A", "Honda", &engine).await;
    assert_eq!(
        DbError::ReferentialIntegrityError,
        delete_engine(&mut ex, engine.engine_id).await.unwrap_err()
    );
    assert!(get_engine(&mut ex, engine.engine_id).await.unwrap().is_some());
}

pub(super) async fn test_cars_lifecycle(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let engine = put_engine(&mut ex).await;
    let car = put_car(&mut ex, "KAA001A", "Honda", &engine).await;
    assert_eq!(Some(car.clone()), get_car(&mut ex, car.id).await.unwrap());

    delete_car(&mut ex, car.id).await.unwrap();
    assert_eq!(None, get_car(&mut ex, car.id).await.unwrap());
    assert_eq!(DbError::NotFound, delete_car(&mut ex, car.id).await.unwrap_err());
}

pub(super) async fn test_cars_list(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let engine = put_engine(&mut ex).await;
    let car1 = put_car(&mut ex, "KBB002B", "Toyota", &engine).await;
    let car2 = put_car(&mut ex, "KAA001A", "Honda", &engine).await;
    let car3 = put_car(&mut ex, "KCC003C", "Honda", &engine).await;

    assert_eq!(
        vec![car2.clone(), car1.clone(), car3.clone()],
        list_cars(&mut ex, None, true).await.unwrap()
    );
    assert_eq!(
        vec![car2.clone(), car3.clone()],
        list_cars(&mut ex, Some("Honda"), true).await.unwrap()
    );
    assert!(list_cars(&mut ex, Some("Ford"), true).await.unwrap().is_empty());

    let mut exp_car = car1.clone();
    exp_car.engine = Engine::with_id(engine.engine_id);
    assert_eq!(vec![exp_car], list_cars(&mut ex, Some("Toyota"), false).await.unwrap());
}

pub(super) async fn test_cars_update(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let engine1 = put_engine(&mut ex).await;
    let engine2 = put_engine(&mut ex).await;
    let mut car = put_car(&mut ex, "KAA001A", "Honda", &engine1).await;

    car.registration_number = "KZZ999Z".to_owned();
    car.status = CarStatus::Maintenance;
    car.engine = engine2;
    car.price = 12500.5;
    car.updated_by = "mechanic".to_owned();
    car.updated_at = UPDATED_AT;
    update_car(&mut ex, &car).await.unwrap();
    assert_eq!(Some(car.clone()), get_car(&mut ex, car.id).await.unwrap());

    car.id = Uuid::new_v4();
    car.registration_number = "KYY888Y".to_owned();
    assert_eq!(DbError::NotFound, update_car(&mut ex, &car).await.unwrap_err());
    assert_eq!(1, list_cars(&mut ex, None, false).await.unwrap().len());
}

pub(super) async fn test_cars_integrity(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let missing = Engine::with_id(Uuid::new_v4());
    let car = Car {
        id: Uuid::new_v4(),
        registration_number: "KAA001A".to_owned(),
        name: "Civic".to_owned(),
        year: "2020".to_owned(),
        brand: "Honda".to_owned(),
        fuel_type: FuelType::Hybrid,
        status: CarStatus::Available,
        engine: missing,
        price: 1.0,
        created_by: "admin".to_owned(),
        updated_by: "admin".to_owned(),
        deleted_at: None,
        created_at: CREATED_AT,
        updated_at: CREATED_AT,
    };
    assert_eq!(DbError::ReferentialIntegrityError, create_car(&mut ex, &car).await.unwrap_err());
    assert!(list_cars(&mut ex, None, false).await.unwrap().is_empty());

    let engine = put_engine(&mut ex).await;
    put_car(&mut ex, "KAA001A", "Honda", &engine).await;
    let duplicate = Car { id: Uuid::new_v4(), engine, ..car };
    assert_eq!(DbError::AlreadyExists, create_car(&mut ex, &duplicate).await.unwrap_err());
}

pub(super) async fn test_users_crud(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let mut user1 = put_user(&mut ex, "zoe").await;
    let user2 = put_user(&mut ex, "adam").await;
    assert_eq!(Some(user1.clone()), get_user(&mut ex, user1.id).await.unwrap());
    assert_eq!(Some(user2.clone()), get_user_by_username(&mut ex, "adam").await.unwrap());
    assert_eq!(None, get_user_by_username(&mut ex, "eve").await.unwrap());
    assert_eq!(vec![user2.clone(), user1.clone()], list_users(&mut ex).await.unwrap());

    user1.username = "zoe2".to_owned();
    user1.email = "zoe@example.org".to_owned();
    user1.role = "driver".to_owned();
    user1.updated_at = UPDATED_AT;
    update_user(&mut ex, &user1).await.unwrap();
    assert_eq!(Some(user1.clone()), get_user(&mut ex, user1.id).await.unwrap());
    assert_eq!(None, get_user_by_username(&mut ex, "zoe").await.unwrap());

    let mut missing = user1.clone();
    missing.id = Uuid::new_v4();
    missing.username = "nobody".to_owned();
    assert_eq!(DbError::NotFound, update_user(&mut ex, &missing).await.unwrap_err());
}

pub(super) async fn test_users_duplicate(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = put_user(&mut ex, "admin").await;
    let duplicate = User { id: Uuid::new_v4(), ..user };
    assert_eq!(
        DbError::AlreadyExists,
        create_user(&mut ex, &duplicate, &HashedPassword::new("x")).await.unwrap_err()
    );
}

pub(super) async fn test_users_passwords(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = put_user(&mut ex, "admin").await;
    assert_eq!(
        Some(HashedPassword::new("hash-of-admin")),
        get_user_password(&mut ex, user.id).await.unwrap()
    );
    assert_eq!(
        Some(HashedPassword::new("hash-of-admin")),
        get_login_password(&mut ex, "admin").await.unwrap()
    );
    assert_eq!(None, get_login_password(&mut ex, "unknown").await.unwrap());

    update_user_password(&mut ex, user.id, &HashedPassword::new("new-hash"), UPDATED_AT)
        .await
        .unwrap();
    assert_eq!(
        Some(HashedPassword::new("new-hash")),
        get_login_password(&mut ex, "admin").await.unwrap()
    );
    assert_eq!(UPDATED_AT, get_user(&mut ex, user.id).await.unwrap().unwrap().updated_at);

    assert_eq!(
        DbError::NotFound,
        update_user_password(&mut ex, Uuid::new_v4(), &HashedPassword::new("x"), UPDATED_AT)
            .await
            .unwrap_err()
    );
}

pub(super) async fn test_users_toggle(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = put_user(&mut ex, "admin").await;

    set_user_active(&mut ex, user.id, false, UPDATED_AT).await.unwrap();
    assert!(!get_user(&mut ex, user.id).await.unwrap().unwrap().active);
    assert_eq!(None, get_login_password(&mut ex, "admin").await.unwrap());

    set_user_active(&mut ex, user.id, true, UPDATED_AT).await.unwrap();
    set_user_active(&mut ex, user.id, true, UPDATED_AT).await.unwrap();
    let toggled = get_user(&mut ex, user.id).await.unwrap().unwrap();
    assert!(toggled.active);
    assert_eq!(UPDATED_AT, toggled.updated_at);

    assert_eq!(
        DbError::NotFound,
        set_user_active(&mut ex, Uuid::new_v4(), true, UPDATED_AT).await.unwrap_err()
    );
}

pub(super) async fn test_users_soft_delete(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user1 = put_user(&mut ex, "admin").await;
    let user2 = put_user(&mut ex, "other").await;

    soft_delete_user(&mut ex, user1.id, UPDATED_AT).await.unwrap();
    assert_eq!(None, get_user(&mut ex, user1.id).await.unwrap());
    assert_eq!(None, get_user_by_username(&mut ex, "admin").await.unwrap());
    assert_eq!(None, get_user_password(&mut ex, user1.id).await.unwrap());
    assert_eq!(None, get_login_password(&mut ex, "admin").await.unwrap());
    assert_eq!(vec![user2], list_users(&mut ex).await.unwrap());

    assert_eq!(DbError::NotFound, update_user(&mut ex, &user1).await.unwrap_err());
    assert_eq!(
        DbError::NotFound,
        set_user_active(&mut ex, user1.id, true, UPDATED_AT).await.unwrap_err()
    );
    assert_eq!(
        DbError::NotFound,
        soft_delete_user(&mut ex, user1.id, UPDATED_AT).await.unwrap_err()
    );
}

pub(super) async fn test_drivers_crud(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user1 = put_user(&mut ex, "alice").await;
    let user2 = put_user(&mut ex, "bob").await;
    let mut driver1 = put_driver(&mut ex, &user1, "DL-200").await;
    let mut driver2 = put_driver(&mut ex, &user2, "DL-100").await;
    driver1.user = Some(driver_user(&user1));
    driver2.user = Some(driver_user(&user2));

    assert_eq!(Some(driver1.clone()), get_driver(&mut ex, driver1.id).await.unwrap());
    assert_eq!(vec![driver2.clone(), driver1.clone()], list_drivers(&mut ex).await.unwrap());

    driver1.driver_license_number = "DL-300".to_owned();
    driver1.license_expiry = datetime!(2035-06-30 00:00:00 UTC);
    driver1.updated_at = UPDATED_AT;
    update_driver(&mut ex, &driver1).await.unwrap();
    assert_eq!(Some(driver1.clone()), get_driver(&mut ex, driver1.id).await.unwrap());

    delete_driver(&mut ex, driver2.id).await.unwrap();
    assert_eq!(None, get_driver(&mut ex, driver2.id).await.unwrap());
    assert_eq!(vec![driver1.clone()], list_drivers(&mut ex).await.unwrap());

    let mut missing = driver1.clone();
    missing.id = Uuid::new_v4();
    assert_eq!(DbError::NotFound, update_driver(&mut ex, &missing).await.unwrap_err());
    assert_eq!(DbError::NotFound, delete_driver(&mut ex, missing.id).await.unwrap_err());
}

pub(super) async fn test_drivers_integrity(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = put_user(&mut ex, "alice").await;
    let driver = put_driver(&mut ex, &user, "DL-100").await;

    let orphan = Driver { id: Uuid::new_v4(), user_id: Uuid::new_v4(), ..driver.clone() };
    assert_eq!(
        DbError::ReferentialIntegrityError,
        create_driver(&mut ex, &orphan).await.unwrap_err()
    );

    let second = Driver { id: Uuid::new_v4(), ..driver };
    assert_eq!(DbError::AlreadyExists, create_driver(&mut ex, &second).await.unwrap_err());
}

pub(super) async fn test_drivers_toggle_and_soft_delete(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = put_user(&mut ex, "alice").await;
    let driver = put_driver(&mut ex, &user, "DL-100").await;

    set_driver_active(&mut ex, driver.id, true, UPDATED_AT).await.unwrap();
    set_driver_active(&mut ex, driver.id, true, UPDATED_AT).await.unwrap();
    assert!(get_driver(&mut ex, driver.id).await.unwrap().unwrap().active);
    set_driver_active(&mut ex, driver.id, false, UPDATED_AT).await.unwrap();
    assert!(!get_driver(&mut ex, driver.id).await.unwrap().unwrap().active);

    soft_delete_driver(&mut ex, driver.id, UPDATED_AT).await.unwrap();
    assert_eq!(None, get_driver(&mut ex, driver.id).await.unwrap());
    assert!(list_drivers(&mut ex).await.unwrap().is_empty());
    assert_eq!(
        DbError::NotFound,
        set_driver_active(&mut ex, driver.id, true, UPDATED_AT).await.unwrap_err()
    );
    assert_eq!(DbError::NotFound, update_driver(&mut ex, &driver).await.unwrap_err());
    assert_eq!(
        DbError::NotFound,
        soft_delete_driver(&mut ex, driver.id, UPDATED_AT).await.unwrap_err()
    );

    let deleted = get_driver_with_deleted(&mut ex, driver.id).await.unwrap().unwrap();
    assert_eq!(Some(UPDATED_AT), deleted.deleted_at);
    delete_driver(&mut ex, driver.id).await.unwrap();
    assert_eq!(None, get_driver_with_deleted(&mut ex, driver.id).await.unwrap());
}

pub(super) async fn test_trips_crud(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let engine = put_engine(&mut ex).await;
    let car1 = put_car(&mut ex, "KAA001A", "Honda", &engine).await;
    let car2 = put_car(&mut ex, "KBB002B", "Honda", &engine).await;
    let user = put_user(&mut ex, "alice").await;
    let driver = put_driver(&mut ex, &user, "DL-100").await;

    let mut trip1 = put_trip(&mut ex, &driver, &car1, datetime!(2024-05-02 08:00:00 UTC)).await;
    let trip2 = put_trip(&mut ex, &driver, &car2, datetime!(2024-05-01 08:00:00 UTC)).await;
    assert_eq!(Some(trip1.clone()), get_trip(&mut ex, trip1.id).await.unwrap());

    assert_eq!(vec![trip2.clone(), trip1.clone()], list_trips(&mut ex).await.unwrap());
    assert_eq!(vec![trip1.clone()], list_trips_by_car(&mut ex, car1.id).await.unwrap());
    assert_eq!(
        vec![trip2.clone(), trip1.clone()],
        list_trips_by_driver(&mut ex, driver.id).await.unwrap()
    );
    assert!(list_trips_by_driver(&mut ex, Uuid::new_v4()).await.unwrap().is_empty());

    trip1.car_id = car2.id;
    trip1.end_time = Some(datetime!(2024-05-02 17:45:00 UTC));
    trip1.status = "Completed".to_owned();
    trip1.updated_by = "alice".to_owned();
    trip1.updated_at = UPDATED_AT;
    update_trip(&mut ex, &trip1).await.unwrap();
    assert_eq!(Some(trip1.clone()), get_trip(&mut ex, trip1.id).await.unwrap());
    assert!(list_trips_by_car(&mut ex, car1.id).await.unwrap().is_empty());

    delete_trip(&mut ex, trip2.id).await.unwrap();
    assert_eq!(None, get_trip(&mut ex, trip2.id).await.unwrap());
    assert_eq!(DbError::NotFound, delete_trip(&mut ex, trip2.id).await.unwrap_err());
    assert_eq!(DbError::NotFound, update_trip(&mut ex, &trip2).await.unwrap_err());
}

pub(super) async fn test_trips_status(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let engine = put_engine(&mut ex).await;
    let car = put_car(&mut ex, "KAA001A", "Honda", &engine).await;
    let user = put_user(&mut ex, "alice").await;
    let driver = put_driver(&mut ex, &user, "DL-100").await;
    let trip = put_trip(&mut ex, &driver, &car, datetime!(2024-05-01 08:00:00 UTC)).await;

    for status in ["Completed", "Draft", "not-a-status"] {
        update_trip_status(&mut ex, trip.id, status, "bob", UPDATED_AT).await.unwrap();
        let updated = get_trip(&mut ex, trip.id).await.unwrap().unwrap();
        assert_eq!(status, updated.status);
        assert_eq!("bob", updated.updated_by);
        assert_eq!(UPDATED_AT, updated.updated_at);
    }

    assert_eq!(
        DbError::NotFound,
        update_trip_status(&mut ex, Uuid::new_v4(), "Draft", "bob", UPDATED_AT).await.unwrap_err()
    );
}

pub(super) async fn test_trips_integrity(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let engine = put_engine(&mut ex).await;
    let car = put_car(&mut ex, "KAA001A", "Honda", &engine).await;
    let user = put_user(&mut ex, "alice").await;
    let driver = put_driver(&mut ex, &user, "DL-100").await;
    let trip = put_trip(&mut ex, &driver, &car, datetime!(2024-05-01 08:00:00 UTC)).await;

    let orphan = Trip { id: Uuid::new_v4(), car_id: Uuid::new_v4(), ..trip.clone() };
    assert_eq!(
        DbError::ReferentialIntegrityError,
        create_trip(&mut ex, &orphan).await.unwrap_err()
    );

    assert_eq!(
        DbError::ReferentialIntegrityError,
        delete_car(&mut ex, car.id).await.unwrap_err()
    );
    assert_eq!(
        DbError::ReferentialIntegrityError,
        delete_driver(&mut ex, driver.id).await.unwrap_err()
    );
}

pub(super) async fn test_tx_rollback(db: Arc<dyn Db + Send + Sync>) {
    let engine =
        Engine { engine_id: Uuid::new_v4(), displacement: 1, no_of_cylinders: 1, car_range: 1 };
    {
        let mut tx = db.begin().await.unwrap();
        create_engine(tx.ex(), &engine).await.unwrap();
    }
    assert_eq!(None, get_engine(&mut db.ex().await.unwrap(), engine.engine_id).await.unwrap());

    let mut tx = db.begin().await.unwrap();
    create_engine(tx.ex(), &engine).await.unwrap();
    tx.commit().await.unwrap();
    assert_eq!(
        Some(engine.clone()),
        get_engine(&mut db.ex().await.unwrap(), engine.engine_id).await.unwrap()
    );
}

macro_rules! generate_db_tests [
    ( $setup:expr $(, #[$extra:meta] )? ) => {
        fleet_core::db::testutils::generate_tests!(
            $(#[$extra],)?
            $setup,
            $crate::db::tests,
            test_engines_crud,
            test_engines_not_found,
            test_engines_delete_in_use,
            test_cars_lifecycle,
            test_cars_list,
            test_cars_update,
            test_cars_integrity,
            test_users_crud,
            test_users_duplicate,
            test_users_passwords,
            test_users_toggle,
            test_users_soft_delete,
            test_drivers_crud,
            test_drivers_integrity,
            test_drivers_toggle_and_soft_delete,
            test_trips_crud,
            test_trips_status,
            test_trips_integrity,
            test_tx_rollback
        );
    }
];

use generate_db_tests;

#[cfg(feature = "postgres")]
mod postgres {
    use super::*;
    use crate::db::init_schema;
    use fleet_core::db::postgres::PostgresDb;

    async fn setup() -> PostgresDb {
        let db = fleet_core::db::postgres::testutils::setup().await;
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        db
    }

    generate_db_tests!(
        Arc::new(setup().await),
        #[ignore = "Requires environment configuration and is expensive"]
    );
}

mod sqlite {
    use super::*;
    use crate::db::init_schema;
    use fleet_core::db::sqlite::SqliteDb;

    async fn setup() -> SqliteDb {
        let _can_fail = env_logger::builder().is_test(true).try_init();
        let db = fleet_core::db::sqlite::testutils::setup().await;
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        db
    }

    generate_db_tests!(Arc::new(setup().await));
}
