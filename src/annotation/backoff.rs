/*! Quota backoff.

The annotation service enforces a daily request quota. Once it is hit, the
only thing to do is wait for the next daily reset and retry. The wait is a
single cancellable suspension point: callers holding a
[CancellationToken] can abort a multi-hour pause instead of blocking until
the next day.
!*/
use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveTime};
use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::error::Error;

/// Wall-clock time of the daily quota reset: 01:01:01, one hour and a
/// minute past midnight to let the service refresh its counters.
const RESET_HOUR: u32 = 1;
const RESET_MIN: u32 = 1;
const RESET_SEC: u32 = 1;

/// Wait-until-tomorrow policy for quota-exhausted queries.
#[derive(Debug, Clone, Default)]
pub struct QuotaBackoff;

impl QuotaBackoff {
    pub fn new() -> Self {
        Self
    }

    /// The instant of the next quota reset: 01:01:01 local time on the
    /// next calendar day. Always the next day, even right after midnight.
    pub fn reset_instant(now: DateTime<Local>) -> DateTime<Local> {
        let tomorrow = now.date_naive() + ChronoDuration::days(1);
        let reset = tomorrow.and_time(
            NaiveTime::from_hms_opt(RESET_HOUR, RESET_MIN, RESET_SEC)
                .unwrap_or(NaiveTime::MIN),
        );
        match reset.and_local_timezone(Local) {
            chrono::LocalResult::Single(dt) => dt,
            // DST edge around the reset time, take whatever is usable
            chrono::LocalResult::Ambiguous(dt, _) => dt,
            chrono::LocalResult::None => now + ChronoDuration::days(1),
        }
    }

    /// How long to pause from `now` until the next reset.
    pub fn delay_until_reset(now: DateTime<Local>) -> std::time::Duration {
        (Self::reset_instant(now) - now)
            .to_std()
            .unwrap_or_default()
    }

    /// Suspend until the next quota reset, or until `cancel` fires.
    ///
    /// Cancellation yields [Error::Interrupted] so that a per-document
    /// timeout or operation abort never has to block behind the pause.
    pub async fn wait_for_reset(&self, cancel: &CancellationToken) -> Result<(), Error> {
        let delay = Self::delay_until_reset(Local::now());
        let hours = delay.as_secs() / 3600;
        let minutes = (delay.as_secs() % 3600) / 60;
        info!("daily request quota exhausted, pausing for {hours}h {minutes}m");

        tokio::select! {
            _ = cancel.cancelled() => {
                warn!("quota pause cancelled by the caller");
                Err(Error::Interrupted)
            }
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike};

    use super::*;

    #[test]
    fn test_reset_is_next_day() {
        let now = Local.with_ymd_and_hms(2021, 6, 15, 17, 30, 0).unwrap();
        let reset = QuotaBackoff::reset_instant(now);

        assert_eq!(reset.date_naive(), now.date_naive() + ChronoDuration::days(1));
        assert_eq!(reset.hour(), 1);
        assert_eq!(reset.minute(), 1);
        assert_eq!(reset.second(), 1);
    }

    #[test]
    fn test_reset_skips_to_next_day_even_after_midnight() {
        // hitting the quota at 00:30 still waits for tomorrow's window
        let now = Local.with_ymd_and_hms(2021, 6, 15, 0, 30, 0).unwrap();
        let reset = QuotaBackoff::reset_instant(now);

        assert_eq!(reset.date_naive(), now.date_naive() + ChronoDuration::days(1));
    }

    #[test]
    fn test_delay_is_positive() {
        let now = Local.with_ymd_and_hms(2021, 12, 31, 23, 59, 59).unwrap();
        let delay = QuotaBackoff::delay_until_reset(now);

        assert!(delay > std::time::Duration::from_secs(3600));
        assert!(delay <= std::time::Duration::from_secs(2 * 24 * 3600));
    }

    #[tokio::test]
    async fn test_wait_is_cancellable() {
        let cancel = CancellationToken::new();
        let backoff = QuotaBackoff::new();

        let token = cancel.clone();
        let waiter = tokio::spawn(async move {
            backoff.wait_for_reset(&token).await
        });

        cancel.cancel();
        let result = waiter.await.unwrap();
        assert!(matches!(result, Err(Error::Interrupted)));
    }
}
