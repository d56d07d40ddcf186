//! The night window that gates the tonight rail and the daily summary.

use chrono::{NaiveDateTime, Timelike};

use crate::config::NightConfig;

/// Half-open wall-clock window: `start_hour` inclusive, `end_hour` exclusive.
/// Hours wrap past midnight, so 19–5 means 19:00 through 04:59.
pub fn is_night(hour: u32, start_hour: u32, end_hour: u32) -> bool {
    hour >= start_hour || hour < end_hour
}

/// Reconciles two sources of truth for "is it night": the server's opinion
/// (sent with the tonight payload) and the locally evaluated clock. The
/// server value only bridges the gap until the first client evaluation; after
/// that the client value wins. `force_show` overrides both.
#[derive(Debug, Clone)]
pub struct NightGate {
    start_hour: u32,
    end_hour: u32,
    force_show: bool,
    server_seed: bool,
    client_value: Option<bool>,
}

impl NightGate {
    pub fn new(config: &NightConfig) -> Self {
        Self {
            start_hour: config.start_hour,
            end_hour: config.end_hour,
            force_show: config.force_show,
            server_seed: false,
            client_value: None,
        }
    }

    /// Record the server-computed value from the latest tonight response.
    pub fn seed(&mut self, server_is_night: bool) {
        self.server_seed = server_is_night;
    }

    /// Evaluate the local clock. Called once at startup and then on the
    /// periodic check; there is no push mechanism for wall-clock time.
    pub fn evaluate(&mut self, now: NaiveDateTime) -> bool {
        let value = is_night(now.hour(), self.start_hour, self.end_hour);
        self.client_value = Some(value);
        value
    }

    pub fn current(&self) -> bool {
        self.force_show || self.client_value.unwrap_or(self.server_seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at_hour(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 23)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    #[test]
    fn window_boundaries_are_half_open() {
        // start inclusive
        assert!(is_night(19, 19, 5));
        assert!(!is_night(18, 19, 5));
        // end exclusive
        assert!(!is_night(5, 19, 5));
        assert!(is_night(4, 19, 5));
        // deep night and midday
        assert!(is_night(0, 19, 5));
        assert!(!is_night(12, 19, 5));
    }

    #[test]
    fn gate_prefers_client_value_once_evaluated() {
        let mut gate = NightGate::new(&NightConfig::default());
        gate.seed(true);
        assert!(gate.current(), "seed holds before first evaluation");

        gate.evaluate(at_hour(12));
        assert!(!gate.current(), "client value wins over stale seed");

        gate.evaluate(at_hour(22));
        assert!(gate.current());
    }

    #[test]
    fn force_show_overrides_the_clock() {
        let config = NightConfig {
            force_show: true,
            ..NightConfig::default()
        };
        let mut gate = NightGate::new(&config);
        gate.evaluate(at_hour(12));
        assert!(gate.current());
    }
}
