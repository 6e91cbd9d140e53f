// Central constants for queue timing, truncation limits and dialogue paging.
pub const SELECT_PAGE_SIZE: usize = 8;
pub const SECONDS_PER_DAY: i64 = 86_400;
pub const TRIAL_WARNING_WINDOW_SECS: i64 = 6 * 3600;

// Worker pacing.
pub const WORKER_IDLE_SLEEP_SECS: u64 = 1;
pub const LOOP_BACKOFF_SECS: u64 = 2;
pub const POLL_TIMEOUT_SECS: u64 = 30;
pub const MONITOR_MIN_INTERVAL_SECS: u64 = 30;

// External command timeouts.
pub const PROVISION_TIMEOUT_SECS: u64 = 300;
pub const DELETE_TIMEOUT_SECS: u64 = 300;
pub const SYNC_TIMEOUT_SECS: u64 = 120;
pub const METRICS_TIMEOUT_SECS: u64 = 45;
pub const MONITOR_TIMEOUT_FLOOR_SECS: u64 = 60;
pub const MONITOR_TIMEOUT_CEIL_SECS: u64 = 180;
pub const EXIT_TIMEOUT: i32 = 124;
pub const EXIT_SPAWN_FAILED: i32 = 127;

// Truncation limits (characters).
pub const MAX_MESSAGE_CHARS: usize = 3500;
pub const MAX_JOB_RESULT_CHARS: usize = 4000;
pub const MAX_DIAG_TAIL_CHARS: usize = 1200;
pub const MAX_MONITOR_ALERT_CHARS: usize = 2500;
pub const MONITOR_SIGNATURE_CHARS: usize = 300;
pub const MAX_METRICS_ERROR_CHARS: usize = 3000;
pub const MAX_BUTTON_LABEL_CHARS: usize = 60;

/// Marker in provisioning output that, combined with registry presence, counts as success.
pub const ALREADY_EXISTS_MARKER: &str = "already exists";
