use chrono::{DateTime, Utc};

#[cfg(not(test))]
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
pub use mock_datetime::now;

/// Overridable clock so lifecycle tests can pin start and stop instants.
#[cfg(test)]
pub mod mock_datetime {
    use std::cell::RefCell;

    use chrono::{DateTime, Utc};

    thread_local! {
        static MOCK_TIME: RefCell<Option<DateTime<Utc>>> = const { RefCell::new(None) };
    }

    pub fn now() -> DateTime<Utc> {
        MOCK_TIME.with(|cell| (*cell.borrow()).unwrap_or_else(Utc::now))
    }

    pub fn set_mock_time(time: DateTime<Utc>) {
        MOCK_TIME.with(|cell| *cell.borrow_mut() = Some(time));
    }

    pub fn clear_mock_time() {
        MOCK_TIME.with(|cell| *cell.borrow_mut() = None);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, SecondsFormat, Utc};

    use super::mock_datetime;

    #[test]
    fn returns_current_time_when_unset() {
        mock_datetime::clear_mock_time();
        assert_eq!(
            mock_datetime::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        );
    }

    #[test]
    fn returns_pinned_time_when_set() {
        let pinned = DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00")
            .unwrap()
            .to_utc();
        mock_datetime::set_mock_time(pinned);

        assert_eq!(mock_datetime::now(), pinned);
        mock_datetime::clear_mock_time();
    }
}
