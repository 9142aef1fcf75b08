mod remaining;
mod ticker;

pub use remaining::{
    compute_remaining, remaining_from_millis, TimeRemaining, MILLIS_PER_DAY, MILLIS_PER_HOUR,
    MILLIS_PER_MINUTE, MILLIS_PER_SECOND,
};
pub use ticker::{snapshot_all, CountdownSnapshot, CountdownTicker, DEFAULT_TICK_INTERVAL};
