use crate::blank;
use resonance_core::{Cell, DisplayState, Labeler, Tone, Widget};

const IDS: [&str; 4] = ["globalR", "rStatus", "bandIndicator", "bandCompliance"];

/// Global R(t), its band status and the band-compliance indicator.
#[derive(Debug, Default)]
pub struct ResonanceWidget;

impl ResonanceWidget {
    pub fn new() -> Self {
        Self
    }
}

/// `✓ Optimal` inside `[0.35, 0.65]`, `⚠ Low` / `⚠ High` outside.
pub fn r_status(r: f64) -> (&'static str, Tone) {
    if (0.35..=0.65).contains(&r) {
        ("✓ Optimal", Tone::Success)
    } else if r < 0.35 {
        ("⚠ Low", Tone::Warning)
    } else {
        ("⚠ High", Tone::Warning)
    }
}

/// Success at 85 % and above, warning from 70 %, danger below.
pub fn compliance_tone(compliance: f64) -> Tone {
    if compliance >= 85.0 {
        Tone::Success
    } else if compliance >= 70.0 {
        Tone::Warning
    } else {
        Tone::Danger
    }
}

impl Widget for ResonanceWidget {
    fn id(&self) -> &str {
        "resonance"
    }

    fn view(&self, state: &DisplayState<'_>, _labeler: &Labeler) -> Vec<Cell> {
        let Some(metrics) = state.metrics() else {
            return blank(&IDS);
        };

        let mut cells = Vec::with_capacity(IDS.len());
        match metrics.r.get() {
            Some(r) => {
                let defaulted = metrics.r.is_defaulted();
                let (status, tone) = r_status(r);
                // a substituted R says nothing about band health
                let tone = if defaulted { Tone::Neutral } else { tone };
                let position = (r * 100.0).clamp(0.0, 100.0);
                cells.push(Cell::new("globalR", format!("{r:.3}")).with_defaulted(defaulted));
                cells.push(Cell::new("rStatus", status).with_tone(tone).with_defaulted(defaulted));
                cells.push(
                    Cell::new("bandIndicator", format!("{position:.0}%"))
                        .with_gauge(position)
                        .with_defaulted(defaulted),
                );
            }
            None => cells.extend(blank(&IDS[..3])),
        }

        cells.push(match metrics.band_compliance.get() {
            Some(c) => Cell::new("bandCompliance", format!("{c:.1}%")).with_tone(compliance_tone(c)),
            None => Cell::no_data("bandCompliance"),
        });
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::live;
    use resonance_core::{Field, Metrics};

    fn view(metrics: Metrics) -> Vec<Cell> {
        let reading = live(metrics);
        let state = DisplayState { reading: &reading, last_updated: None };
        ResonanceWidget::new().view(&state, &Labeler::utc())
    }

    #[test]
    fn in_band_reading() {
        let cells = view(Metrics {
            r: Field::Value(0.52),
            band_compliance: Field::Value(100.0),
            ..Metrics::default()
        });
        assert_eq!(cells[0].text, "0.520");
        assert_eq!(cells[1].text, "✓ Optimal");
        assert_eq!(cells[1].tone, Tone::Success);
        assert!((cells[2].gauge.unwrap() - 52.0).abs() < 1e-9);
        assert_eq!(cells[3].text, "100.0%");
        assert_eq!(cells[3].tone, Tone::Success);
    }

    #[test]
    fn out_of_band_reading() {
        assert_eq!(r_status(0.2).0, "⚠ Low");
        assert_eq!(r_status(0.9).0, "⚠ High");
        let cells = view(Metrics {
            r: Field::Value(0.0),
            band_compliance: Field::Value(0.0),
            ..Metrics::default()
        });
        assert_eq!(cells[0].text, "0.000");
        assert_eq!(cells[3].text, "0.0%");
        assert_eq!(cells[3].tone, Tone::Danger);
    }

    #[test]
    fn compliance_thresholds() {
        assert_eq!(compliance_tone(85.0), Tone::Success);
        assert_eq!(compliance_tone(70.0), Tone::Warning);
        assert_eq!(compliance_tone(69.9), Tone::Danger);
    }

    #[test]
    fn unknown_compliance_is_placeholder() {
        let cells = view(Metrics {
            r: Field::Defaulted(0.5),
            ..Metrics::default()
        });
        assert_eq!(cells[0].text, "0.500");
        assert!(cells[3].is_no_data());
    }

    #[test]
    fn substituted_r_is_marked_and_neutral() {
        let defaulted = view(Metrics {
            r: Field::Defaulted(0.5),
            ..Metrics::default()
        });
        let reported = view(Metrics {
            r: Field::Value(0.5),
            ..Metrics::default()
        });
        assert_ne!(defaulted, reported);

        assert!(defaulted[..3].iter().all(|c| c.defaulted));
        assert_eq!(defaulted[1].tone, Tone::Neutral);
        assert!(reported[..3].iter().all(|c| !c.defaulted));
        assert_eq!(reported[1].tone, Tone::Success);
    }
}
