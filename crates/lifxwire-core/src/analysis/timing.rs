use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Running inter-arrival statistics for one stream of packets.
///
/// Jitter is the smoothed mean deviation between consecutive inter-arrival
/// times (gain 1/16).
#[derive(Debug, Default, Clone)]
pub(crate) struct InterArrival {
    pub first_ts: Option<f64>,
    pub last_ts: Option<f64>,
    prev_iat: Option<f64>,
    max_iat: Option<f64>,
    jitter: f64,
}

impl InterArrival {
    pub fn observe(&mut self, ts: Option<f64>) {
        let Some(ts) = ts else {
            return;
        };
        if self.first_ts.is_none() {
            self.first_ts = Some(ts);
        }
        if let Some(last_ts) = self.last_ts {
            let iat = ts - last_ts;
            if let Some(prev_iat) = self.prev_iat {
                let diff = (iat - prev_iat).abs();
                self.jitter += (diff - self.jitter) / 16.0;
            }
            self.prev_iat = Some(iat);
            self.max_iat = Some(self.max_iat.map_or(iat, |max| max.max(iat)));
        }
        self.last_ts = Some(ts);
    }

    /// Available once two timestamps have been seen.
    pub fn jitter_ms(&self) -> Option<f64> {
        self.prev_iat.map(|_| self.jitter * 1000.0)
    }

    pub fn max_iat_ms(&self) -> Option<u64> {
        self.max_iat.map(|iat| (iat * 1000.0).round() as u64)
    }
}

pub(crate) fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let ts = match ts {
        Some(ts) => ts,
        None => return,
    };
    match first {
        None => *first = Some(ts),
        Some(existing) => {
            if ts < *existing {
                *first = Some(ts);
            }
        }
    }
    match last {
        None => *last = Some(ts),
        Some(existing) => {
            if ts > *existing {
                *last = Some(ts);
            }
        }
    }
}

pub(crate) fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}

#[cfg(test)]
mod tests {
    use super::{InterArrival, ts_to_rfc3339, update_ts_bounds};

    #[test]
    fn steady_stream_has_zero_jitter() {
        let mut timing = InterArrival::default();
        for idx in 0..10 {
            timing.observe(Some(idx as f64 * 0.1));
        }
        assert!(timing.jitter_ms().unwrap() < 1e-6);
        assert_eq!(timing.max_iat_ms(), Some(100));
    }

    #[test]
    fn single_packet_has_no_metrics() {
        let mut timing = InterArrival::default();
        timing.observe(Some(1.0));
        timing.observe(None);
        assert!(timing.jitter_ms().is_none());
        assert!(timing.max_iat_ms().is_none());
        assert_eq!(timing.first_ts, Some(1.0));
    }

    #[test]
    fn irregular_stream_accumulates_jitter() {
        let mut timing = InterArrival::default();
        for ts in [0.0, 0.1, 0.4, 0.5] {
            timing.observe(Some(ts));
        }
        let jitter = timing.jitter_ms().unwrap();
        assert!(jitter > 0.0);
        assert_eq!(timing.max_iat_ms(), Some(300));
    }

    #[test]
    fn bounds_track_min_and_max() {
        let mut first = None;
        let mut last = None;
        for ts in [Some(2.0), None, Some(1.0), Some(3.0)] {
            update_ts_bounds(&mut first, &mut last, ts);
        }
        assert_eq!(first, Some(1.0));
        assert_eq!(last, Some(3.0));
    }

    #[test]
    fn timestamps_render_as_rfc3339() {
        let text = ts_to_rfc3339(Some(1.5)).unwrap();
        assert!(text.starts_with("1970-01-01T00:00:01."));
        assert!(text.ends_with('Z'));
        assert!(ts_to_rfc3339(None).is_none());
    }
}
