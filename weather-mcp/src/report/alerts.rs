//! Government weather alert reports.
//!
//! Severity is inferred from keywords in the alert's event name and
//! description. The lexicon is data, not code: callers can extend it for
//! providers whose wording the builtin table does not cover.

use std::cmp::Reverse;
use std::fmt::Write;

use crate::owm::models::{Alert, OneCall};

/// Alert severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
    Extreme,
}

impl Severity {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
            Self::Extreme => "extreme",
        }
    }

    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Minor => "🟡",
            Self::Moderate => "🟠",
            Self::Severe => "🔴",
            Self::Extreme => "🟣",
        }
    }
}

/// Keyword table mapping alert wording to a severity level.
///
/// Classification scans levels from most to least severe and returns the
/// first level with a matching keyword; an alert matching nothing is
/// `Minor`.
pub struct SeverityLexicon {
    extreme: Vec<String>,
    severe: Vec<String>,
    moderate: Vec<String>,
}

impl SeverityLexicon {
    /// Builtin English and Chinese keywords.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            extreme: to_owned(&["extreme", "极端", "严重"]),
            severe: to_owned(&["severe", "重大", "危险"]),
            moderate: to_owned(&["moderate", "中等", "注意"]),
        }
    }

    /// Add a keyword at the given level.
    pub fn add_keyword(&mut self, severity: Severity, keyword: impl Into<String>) {
        let keyword = keyword.into().to_lowercase();
        match severity {
            Severity::Extreme => self.extreme.push(keyword),
            Severity::Severe => self.severe.push(keyword),
            Severity::Moderate => self.moderate.push(keyword),
            Severity::Minor => {}
        }
    }

    #[must_use]
    pub fn classify(&self, alert: &Alert) -> Severity {
        let haystack = format!("{} {}", alert.event, alert.description).to_lowercase();
        let matches = |keywords: &[String]| keywords.iter().any(|k| haystack.contains(k.as_str()));

        if matches(&self.extreme) {
            Severity::Extreme
        } else if matches(&self.severe) {
            Severity::Severe
        } else if matches(&self.moderate) {
            Severity::Moderate
        } else {
            Severity::Minor
        }
    }
}

impl Default for SeverityLexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

fn to_owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

/// How soon an alert takes effect, bucketed for display.
#[must_use]
pub fn urgency(now: i64, start: i64) -> &'static str {
    let lead = start - now;
    if lead <= 0 {
        "⏰ In effect now"
    } else if lead <= 3600 {
        "⏰ Starts within the hour"
    } else if lead <= 6 * 3600 {
        "⏰ Starts within 6 hours"
    } else if lead <= 24 * 3600 {
        "⏰ Starts within 24 hours"
    } else {
        "⏰ Starts in more than a day"
    }
}

/// Render a duration in days, hours, and minutes. Negative or zero spans
/// render as "unspecified" since providers occasionally emit end < start.
#[must_use]
pub fn duration(start: i64, end: i64) -> String {
    let span = end - start;
    if span <= 0 {
        return "unspecified".to_string();
    }
    let days = span / 86_400;
    let hours = (span % 86_400) / 3600;
    let minutes = (span % 3600) / 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 || parts.is_empty() {
        parts.push(format!("{minutes}m"));
    }
    parts.join(" ")
}

/// Keyword-driven safety advice for common alert types.
const ADVICE: [(&[&str], &[&str]); 6] = [
    (
        &["storm", "thunder", "雷", "风暴"],
        &[
            "Stay indoors and away from windows.",
            "Unplug sensitive electronics.",
        ],
    ),
    (
        &["wind", "gale", "大风"],
        &[
            "Secure loose objects outdoors.",
            "Avoid parking under trees.",
        ],
    ),
    (
        &["rain", "flood", "暴雨", "洪"],
        &[
            "Avoid low-lying areas and underpasses.",
            "Do not drive through standing water.",
        ],
    ),
    (
        &["snow", "ice", "blizzard", "暴雪", "冰"],
        &[
            "Limit travel; roads may be hazardous.",
            "Keep emergency supplies in your vehicle.",
        ],
    ),
    (
        &["heat", "高温"],
        &[
            "Stay hydrated and avoid midday sun.",
            "Check on vulnerable neighbours.",
        ],
    ),
    (
        &["cold", "frost", "freeze", "寒", "霜冻"],
        &[
            "Dress in warm layers.",
            "Protect exposed pipes and plants.",
        ],
    ),
];

fn advice_for(alert: &Alert) -> &'static [&'static str] {
    let haystack = format!("{} {}", alert.event, alert.description).to_lowercase();
    for (keywords, lines) in &ADVICE {
        if keywords.iter().any(|k| haystack.contains(k)) {
            return lines;
        }
    }
    &["Follow guidance from local authorities."]
}

/// Render all active alerts for a location, most severe first.
///
/// Alerts of equal severity keep the provider's original order. `now` is
/// injected so rendering stays deterministic.
#[must_use]
pub fn format_weather_alerts(
    data: &OneCall,
    lat: f64,
    lon: f64,
    now: i64,
    lexicon: &SeverityLexicon,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🚨 Weather Alerts for {lat:.4}, {lon:.4}");
    let _ = writeln!(out, "🕐 Timezone: {}", data.timezone);
    out.push('\n');

    if data.alerts.is_empty() {
        out.push_str("✅ No active weather alerts for this location.\n");
        out.push_str("Conditions are currently within normal ranges.\n");
        return out;
    }

    let mut ranked: Vec<(Severity, &Alert)> = data
        .alerts
        .iter()
        .map(|alert| (lexicon.classify(alert), alert))
        .collect();
    ranked.sort_by_key(|(severity, _)| Reverse(*severity));

    let _ = writeln!(out, "{} active alert(s):", ranked.len());

    for (i, (severity, alert)) in ranked.iter().enumerate() {
        out.push('\n');
        let _ = writeln!(
            out,
            "{} **{}. {}** [{}]",
            severity.marker(),
            i + 1,
            alert.event,
            severity.label()
        );
        let _ = writeln!(out, "  📢 Issued by: {}", alert.sender_name);
        let _ = writeln!(out, "  {}", urgency(now, alert.start));
        let _ = writeln!(
            out,
            "  📅 {} to {} (duration {})",
            super::format_datetime(alert.start, data.timezone_offset),
            super::format_datetime(alert.end, data.timezone_offset),
            duration(alert.start, alert.end)
        );
        if !alert.tags.is_empty() {
            let _ = writeln!(out, "  🏷️ Tags: {}", alert.tags.join(", "));
        }

        for sentence in split_sentences(&alert.description) {
            let _ = writeln!(out, "  • {sentence}");
        }

        let _ = writeln!(out, "  💡 Advice:");
        for line in advice_for(alert) {
            let _ = writeln!(out, "    - {line}");
        }
    }

    out.push('\n');
    let highest = ranked.first().map(|(s, _)| *s);
    match highest {
        Some(Severity::Extreme) => {
            out.push_str("🟣 Extreme conditions reported. Take protective action immediately.\n");
        }
        Some(Severity::Severe) => {
            out.push_str("🔴 Severe conditions reported. Prepare and stay informed.\n");
        }
        _ => {
            out.push_str("Stay aware of changing conditions.\n");
        }
    }

    out
}

fn split_sentences(text: &str) -> Vec<String> {
    text.split(['.', '!', '?', '。', '！', '？'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(event: &str, description: &str, start: i64, end: i64) -> Alert {
        Alert {
            sender_name: "Test Met Office".to_string(),
            event: event.to_string(),
            start,
            end,
            description: description.to_string(),
            tags: vec![],
        }
    }

    fn one_call(alerts: Vec<Alert>) -> OneCall {
        OneCall {
            lat: 39.9,
            lon: 116.4,
            timezone: "Asia/Shanghai".to_string(),
            timezone_offset: 28_800,
            alerts,
        }
    }

    #[test]
    fn keywords_determine_severity() {
        let lexicon = SeverityLexicon::builtin();
        assert_eq!(
            lexicon.classify(&alert("Extreme Heat Warning", "", 0, 0)),
            Severity::Extreme
        );
        assert_eq!(
            lexicon.classify(&alert("Gale Warning", "severe gusts expected", 0, 0)),
            Severity::Severe
        );
        assert_eq!(
            lexicon.classify(&alert("暴雨预警", "注意防范", 0, 0)),
            Severity::Moderate
        );
        assert_eq!(
            lexicon.classify(&alert("Fog Advisory", "reduced visibility", 0, 0)),
            Severity::Minor
        );
    }

    #[test]
    fn most_severe_keyword_wins() {
        let lexicon = SeverityLexicon::builtin();
        let mixed = alert(
            "Storm Warning",
            "moderate risk escalating to extreme conditions",
            0,
            0,
        );
        assert_eq!(lexicon.classify(&mixed), Severity::Extreme);
    }

    #[test]
    fn custom_keywords_extend_the_lexicon() {
        let mut lexicon = SeverityLexicon::builtin();
        lexicon.add_keyword(Severity::Severe, "red warning");
        let a = alert("Red Warning of Rain", "", 0, 0);
        assert_eq!(lexicon.classify(&a), Severity::Severe);
    }

    #[test]
    fn alerts_sort_severity_descending_with_stable_ties() {
        let lexicon = SeverityLexicon::builtin();
        let data = one_call(vec![
            alert("Fog Advisory", "first minor", 100, 200),
            alert("Extreme Wind", "", 100, 200),
            alert("Moderate Rain", "", 100, 200),
            alert("Mist Advisory", "second minor", 100, 200),
        ]);
        let report = format_weather_alerts(&data, 39.9, 116.4, 50, &lexicon);

        let extreme = report.find("Extreme Wind").unwrap();
        let moderate = report.find("Moderate Rain").unwrap();
        let first_minor = report.find("Fog Advisory").unwrap();
        let second_minor = report.find("Mist Advisory").unwrap();
        assert!(extreme < moderate);
        assert!(moderate < first_minor);
        assert!(first_minor < second_minor);
    }

    #[test]
    fn no_alerts_renders_all_clear() {
        let report = format_weather_alerts(
            &one_call(vec![]),
            39.9,
            116.4,
            0,
            &SeverityLexicon::builtin(),
        );
        assert!(report.contains("No active weather alerts"));
    }

    #[test]
    fn urgency_buckets() {
        assert_eq!(urgency(100, 50), "⏰ In effect now");
        assert_eq!(urgency(100, 100), "⏰ In effect now");
        assert_eq!(urgency(0, 3600), "⏰ Starts within the hour");
        assert_eq!(urgency(0, 4 * 3600), "⏰ Starts within 6 hours");
        assert_eq!(urgency(0, 20 * 3600), "⏰ Starts within 24 hours");
        assert_eq!(urgency(0, 48 * 3600), "⏰ Starts in more than a day");
    }

    #[test]
    fn duration_rendering() {
        assert_eq!(duration(0, 90_000), "1d 1h");
        assert_eq!(duration(0, 5_400), "1h 30m");
        assert_eq!(duration(0, 120), "2m");
        assert_eq!(duration(100, 100), "unspecified");
        assert_eq!(duration(200, 100), "unspecified");
    }

    #[test]
    fn advice_matches_alert_type() {
        let flood = alert("Flood Warning", "river levels rising", 0, 100);
        assert!(advice_for(&flood)[0].contains("low-lying"));

        let unknown = alert("Volcanic Ash", "", 0, 100);
        assert!(advice_for(&unknown)[0].contains("local authorities"));
    }
}
