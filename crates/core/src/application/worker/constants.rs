// Worker constants (no magic values)
use std::time::Duration;

/// Sleep duration when no messages are available (100ms)
pub const IDLE_SLEEP_DURATION: Duration = Duration::from_millis(100);

/// Sleep duration after a queue error before the loop resumes (1s)
pub const ERROR_RECOVERY_SLEEP_DURATION: Duration = Duration::from_secs(1);

/// Default number of messages leased per receive call
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default delivery-attempt cap before a message is dead-lettered
pub const DEFAULT_MAX_ATTEMPTS: i32 = 5;

/// Default lease duration before an unacknowledged message is redelivered
pub const DEFAULT_VISIBILITY_TIMEOUT_MS: i64 = 30_000;
