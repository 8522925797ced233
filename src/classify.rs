// AQI severity buckets, colors and health advice.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl Severity {
    pub fn name(self) -> &'static str {
        match self {
            Severity::Good => "Good",
            Severity::Moderate => "Moderate",
            Severity::UnhealthySensitive => "Unhealthy for Sensitive Groups",
            Severity::Unhealthy => "Unhealthy",
            Severity::VeryUnhealthy => "Very Unhealthy",
            Severity::Hazardous => "Hazardous",
        }
    }

    // Short machine-friendly label, usable as a style class.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Good => "good",
            Severity::Moderate => "moderate",
            Severity::UnhealthySensitive => "unhealthy-sg",
            Severity::Unhealthy => "unhealthy",
            Severity::VeryUnhealthy => "very-unhealthy",
            Severity::Hazardous => "hazardous",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Severity::Good => "#009966",
            Severity::Moderate => "#ffde33",
            Severity::UnhealthySensitive => "#ff9933",
            Severity::Unhealthy => "#cc0033",
            Severity::VeryUnhealthy => "#660099",
            Severity::Hazardous => "#7e0023",
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            Severity::Good => "Air quality is good. No precautions needed.",
            Severity::Moderate => {
                "Air quality is moderate. Sensitive individuals should consider limiting outdoor activities."
            }
            Severity::UnhealthySensitive => {
                "Unhealthy for sensitive groups. Limit prolonged outdoor exertion."
            }
            Severity::Unhealthy => "Unhealthy. Everyone should limit prolonged outdoor exertion.",
            Severity::VeryUnhealthy => "Very Unhealthy. Avoid outdoor activities.",
            Severity::Hazardous => "Hazardous. Stay indoors and keep windows closed.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub severity: Severity,
    pub color: &'static str,
    pub advice: &'static str,
}

// Boundaries are inclusive on the lower bucket: exactly 50 is still Good.
pub fn classify(aqi: f64) -> Classification {
    let severity = if aqi <= 50.0 {
        Severity::Good
    } else if aqi <= 100.0 {
        Severity::Moderate
    } else if aqi <= 150.0 {
        Severity::UnhealthySensitive
    } else if aqi <= 200.0 {
        Severity::Unhealthy
    } else if aqi <= 300.0 {
        Severity::VeryUnhealthy
    } else {
        Severity::Hazardous
    };
    Classification {
        severity,
        color: severity.color(),
        advice: severity.advice(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_inclusive_on_the_lower_bucket() {
        assert_eq!(classify(50.0).severity, Severity::Good);
        assert_eq!(classify(51.0).severity, Severity::Moderate);
        assert_eq!(classify(100.0).severity, Severity::Moderate);
        assert_eq!(classify(101.0).severity, Severity::UnhealthySensitive);
        assert_eq!(classify(150.0).severity, Severity::UnhealthySensitive);
        assert_eq!(classify(200.0).severity, Severity::Unhealthy);
        assert_eq!(classify(300.0).severity, Severity::VeryUnhealthy);
        assert_eq!(classify(500.0).severity, Severity::Hazardous);
    }

    #[test]
    fn extremes() {
        let low = classify(0.0);
        assert_eq!(low.severity, Severity::Good);
        assert_eq!(low.color, "#009966");

        let high = classify(301.0);
        assert_eq!(high.severity, Severity::Hazardous);
        assert_eq!(high.color, "#7e0023");
    }

    #[test]
    fn severity_is_monotonic_in_aqi() {
        let mut prev = classify(0.0).severity;
        let mut aqi = 0.0;
        while aqi <= 600.0 {
            let cur = classify(aqi).severity;
            assert!(cur >= prev, "severity dropped at aqi {}", aqi);
            prev = cur;
            aqi += 0.5;
        }
    }

    #[test]
    fn labels_are_stable_style_classes() {
        assert_eq!(classify(10.0).severity.label(), "good");
        assert_eq!(classify(120.0).severity.label(), "unhealthy-sg");
        assert_eq!(classify(250.0).severity.label(), "very-unhealthy");
        assert_eq!(classify(400.0).severity.name(), "Hazardous");
    }

    #[test]
    fn fractional_values_near_a_boundary() {
        assert_eq!(classify(50.5).severity, Severity::Moderate);
        assert_eq!(classify(49.9).severity, Severity::Good);
    }
}
