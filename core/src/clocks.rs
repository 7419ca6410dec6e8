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

//! Sources of the current time.
//!
//! Every timestamp the services record flows through a `Clock` so that tests can pin it.

use async_trait::async_trait;
use std::time::Duration;
use time::OffsetDateTime;

/// Drops the sub-microsecond part of `t`, which PostgreSQL timestamps cannot represent.
fn truncate_to_micros(t: OffsetDateTime) -> OffsetDateTime {
    t - time::Duration::nanoseconds(i64::from(t.nanosecond() % 1000))
}

/// A source of the current time.
#[async_trait]
pub trait Clock {
    /// Returns the current UTC time with microsecond resolution.
    fn now_utc(&self) -> OffsetDateTime;

    /// Returns the current time as whole seconds since the Unix epoch.
    fn unix_timestamp(&self) -> i64 {
        self.now_utc().unix_timestamp()
    }

    /// Waits for `duration` to pass according to this clock.
    async fn sleep(&self, duration: Duration);
}

/// Clock backed by the system's real time.
#[derive(Clone, Default)]
pub struct SystemClock {}

#[async_trait]
impl Clock for SystemClock {
    fn now_utc(&self) -> OffsetDateTime {
        truncate_to_micros(OffsetDateTime::now_utc())
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await
    }
}

/// Test utilities.
#[cfg(any(test, feature = "testutils"))]
pub mod testutils {
    use super::*;
    use std::sync::Mutex;

    /// Panics if `t` carries more than microsecond precision.
    fn check_micros(t: OffsetDateTime) -> OffsetDateTime {
        assert_eq!(truncate_to_micros(t), t, "Nanosecond precision not supported");
        t
    }

    /// A clock frozen at a given instant that only moves when told to.
    pub struct SettableClock {
        /// Instant reported by `now_utc`.
        now: Mutex<OffsetDateTime>,
    }

    impl SettableClock {
        /// Creates a new clock stopped at `now`.
        pub fn new(now: OffsetDateTime) -> Self {
            Self { now: Mutex::new(check_micros(now)) }
        }

        /// Moves the clock to `now`, which may be in the past.
        pub fn set(&self, now: OffsetDateTime) {
            *self.now.lock().unwrap() = check_micros(now);
        }

        /// Moves the clock forward by `delta`.
        pub fn advance(&self, delta: Duration) {
            assert_eq!(0, delta.subsec_nanos() % 1000, "Nanosecond precision not supported");
            let mut now = self.now.lock().unwrap();
            *now += delta;
        }
    }

    #[async_trait]
    impl Clock for SettableClock {
        fn now_utc(&self) -> OffsetDateTime {
            *self.now.lock().unwrap()
        }

        async fn sleep(&self, duration: Duration) {
            self.advance(duration);
            tokio::task::yield_now().await;
        }
    }

}
