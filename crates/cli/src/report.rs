//! Human and JSON renderings of a match.

use std::fmt;

use serde::Serialize;
use shelver_core::{DiffRecord, Edit, EditKind, MatchResult};

/// Everything printed for one run.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub release_id: &'a str,
    pub release_title: &'a str,
    #[serde(flatten)]
    pub result: &'a MatchResult,
    /// Planned destinations, empty unless the match was accepted.
    pub destinations: Vec<String>,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Release: {} ({})", self.release_title, self.release_id)?;
        writeln!(
            f,
            "Score:   {:.2} -> {}",
            self.result.score,
            self.result.decision.as_str()
        )?;

        let changed: Vec<&DiffRecord> = self.result.changed().collect();
        if !changed.is_empty() {
            writeln!(f, "\nDifferences:")?;
            for record in changed {
                writeln!(f, "  {} (distance {})", record.field, record.distance)?;
                writeln!(f, "    - {}", marked(record.before_edits()))?;
                writeln!(f, "    + {}", marked(record.after_edits()))?;
            }
        }

        if !self.destinations.is_empty() {
            writeln!(f, "\nDestinations:")?;
            for path in &self.destinations {
                writeln!(f, "  {}", path)?;
            }
        }
        Ok(())
    }
}

/// Join edit runs, bracketing deleted `[-x-]` and inserted `{+x+}` text.
fn marked<'a>(edits: impl Iterator<Item = &'a Edit>) -> String {
    edits
        .map(|e| match e.kind {
            EditKind::Equal => e.text.clone(),
            EditKind::Delete => format!("[-{}-]", e.text),
            EditKind::Insert => format!("{{+{}+}}", e.text),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelver_core::{diff_field, Decision};

    #[test]
    fn test_marked_sides() {
        let record = diff_field("label", "Rough Trade", "Rough Trade Records");
        assert_eq!(marked(record.before_edits()), "Rough Trade");
        assert_eq!(marked(record.after_edits()), "Rough Trade{+ Records+}");

        let record = diff_field("catalogue num", "abc", "xyz");
        assert_eq!(marked(record.before_edits()), "[-abc-]");
        assert_eq!(marked(record.after_edits()), "{+xyz+}");
    }

    #[test]
    fn test_text_report() {
        let result = MatchResult {
            score: 62.5,
            diffs: vec![
                diff_field("release", "Hex", "Hex"),
                diff_field("label", "Rough Trade", "Kamera"),
            ],
            decision: Decision::Review,
        };
        let report = Report {
            release_id: "rel-1",
            release_title: "Hex",
            result: &result,
            destinations: Vec::new(),
        };
        let text = report.to_string();
        assert!(text.contains("Score:   62.50 -> review"));
        assert!(text.contains("  label (distance"));
        assert!(!text.contains("  release (distance"));
        assert!(!text.contains("Destinations:"));
    }

    #[test]
    fn test_text_report_lists_destinations() {
        let result = MatchResult {
            score: 100.0,
            diffs: Vec::new(),
            decision: Decision::Accept,
        };
        let report = Report {
            release_id: "rel-1",
            release_title: "Hex",
            result: &result,
            destinations: vec!["/m/Hex/1.flac".to_string(), "/m/Hex/2.flac".to_string()],
        };
        assert_eq!(
            report.to_string(),
            "Release: Hex (rel-1)\nScore:   100.00 -> accept\n\nDestinations:\n  /m/Hex/1.flac\n  /m/Hex/2.flac\n"
        );
    }

    #[test]
    fn test_json_report_flattens_result() {
        let result = MatchResult {
            score: 100.0,
            diffs: Vec::new(),
            decision: Decision::Accept,
        };
        let report = Report {
            release_id: "rel-1",
            release_title: "Hex",
            result: &result,
            destinations: vec!["/m/Hex/1".to_string()],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["decision"], "accept");
        assert_eq!(json["score"], 100.0);
        assert_eq!(json["destinations"][0], "/m/Hex/1");
    }
}
