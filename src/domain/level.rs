use serde::Deserialize;

fn silence_db() -> f32 {
    f32::NEG_INFINITY
}

/// One audio level reading from the capture backend.
///
/// Samples are ephemeral: only the most recent one matters and superseded
/// samples are dropped, never queued. The wire payload also carries an
/// `rms` value and a `recording` flag; neither drives the meter, so they
/// are ignored on decode.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LevelSample {
    /// Peak amplitude normalized to [0, 1].
    #[serde(default)]
    pub peak: f32,
    /// Level in dBFS. Non-finite for silence.
    #[serde(default = "silence_db")]
    pub db: f32,
}

impl LevelSample {
    /// Meter fill as a percentage, clamped to [0, 100].
    #[must_use]
    pub fn percent(&self) -> f32 {
        (self.peak * 100.0).clamp(0.0, 100.0)
    }

    /// One-decimal dB text, with a sentinel for non-finite readings.
    #[must_use]
    pub fn db_text(&self) -> String {
        if self.db.is_finite() {
            format!("{:.1} dB", self.db)
        } else {
            "-- dB".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_maps_linearly_and_clamps() {
        let half = LevelSample { peak: 0.5, db: -6.0 };
        assert!((half.percent() - 50.0).abs() < f32::EPSILON);

        let over = LevelSample { peak: 1.7, db: 0.0 };
        assert_eq!(over.percent(), 100.0);

        let under = LevelSample { peak: -0.2, db: -90.0 };
        assert_eq!(under.percent(), 0.0);
    }

    #[test]
    fn test_db_text_one_decimal() {
        let sample = LevelSample { peak: 0.2, db: -12.34 };
        assert_eq!(sample.db_text(), "-12.3 dB");
    }

    #[test]
    fn test_db_text_sentinel_for_non_finite() {
        let silent = LevelSample {
            peak: 0.0,
            db: f32::NEG_INFINITY,
        };
        assert_eq!(silent.db_text(), "-- dB");

        let nan = LevelSample {
            peak: 0.0,
            db: f32::NAN,
        };
        assert_eq!(nan.db_text(), "-- dB");
    }

    #[test]
    fn test_decode_ignores_extra_wire_fields() {
        let sample: LevelSample = serde_json::from_value(serde_json::json!({
            "rms": 0.1, "peak": 0.4, "db": -8.2, "recording": true
        }))
        .unwrap();
        assert!((sample.peak - 0.4).abs() < f32::EPSILON);
        assert!((sample.db - -8.2).abs() < 0.001);
    }

    #[test]
    fn test_decode_missing_db_is_silence() {
        let sample: LevelSample =
            serde_json::from_value(serde_json::json!({"peak": 0.0})).unwrap();
        assert!(!sample.db.is_finite());
    }
}
