use serde::{Deserialize, Serialize};

use crate::gateway::Classification;

/// Label the server uses for a positive review
pub const POSITIVE_LABEL: &str = "긍정";

const LEAD: &str = "분석 결과 : ";

/// A formatted classification result: lead-in, emphasized label, trailing phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub lead: String,
    pub label: String,
    pub trail: String,
}

impl Verdict {
    pub fn from_classification(result: &Classification) -> Self {
        Self {
            lead: LEAD.to_string(),
            label: result.sentiment.clone(),
            trail: format!(" 리뷰일 확률이 {}%입니다.", percent(result.confidence)),
        }
    }

    pub fn segments(&self) -> [&str; 3] {
        [&self.lead, &self.label, &self.trail]
    }

    pub fn is_positive(&self) -> bool {
        self.label == POSITIVE_LABEL
    }
}

/// Confidence as a percentage with exactly two decimals
fn percent(confidence: f64) -> String {
    let confidence = if confidence.is_finite() { confidence } else { 0.0 };
    format!("{:.2}", confidence * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(sentiment: &str, confidence: f64) -> Verdict {
        Verdict::from_classification(&Classification {
            sentiment: sentiment.to_string(),
            confidence,
        })
    }

    #[test]
    fn test_three_segments() {
        let verdict = classify("긍정", 0.95);
        let [lead, label, trail] = verdict.segments();
        assert_eq!(lead, "분석 결과 : ");
        assert_eq!(label, "긍정");
        assert!(trail.contains("95.00"));
        assert!(verdict.is_positive());
    }

    #[test]
    fn test_exact_trailing_phrase() {
        let verdict = classify("긍정", 0.87);
        assert_eq!(
            verdict.segments(),
            ["분석 결과 : ", "긍정", " 리뷰일 확률이 87.00%입니다."]
        );
    }

    #[test]
    fn test_negative_label() {
        let verdict = classify("부정", 0.6123);
        assert!(!verdict.is_positive());
        assert_eq!(verdict.trail, " 리뷰일 확률이 61.23%입니다.");
    }

    #[test]
    fn test_zero_and_non_finite_confidence() {
        assert!(classify("부정", 0.0).trail.contains("0.00%"));
        assert!(classify("부정", f64::NAN).trail.contains(" 0.00%"));
        assert!(classify("부정", f64::INFINITY).trail.contains(" 0.00%"));
    }

    #[test]
    fn test_label_with_markdown_markers_is_preserved() {
        let verdict = classify("**긍정**", 1.0);
        assert_eq!(verdict.label, "**긍정**");
        assert_eq!(verdict.segments().len(), 3);
        assert!(!verdict.is_positive());
        assert_eq!(verdict.trail, " 리뷰일 확률이 100.00%입니다.");
    }
}
