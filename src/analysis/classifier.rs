use crate::models::record::{Classification, ContentRecord};
use crate::taxonomy::{Category, CategoryCatalog};

/// Tunable scoring parameters. Title matches are weighted above body
/// matches; confidence saturates once the weighted score reaches
/// `confidence_saturation` (3 title hits at the defaults).
#[derive(Debug, Clone)]
pub struct ClassifierWeights {
    pub title_weight: f32,
    pub body_weight: f32,
    pub confidence_saturation: f32,
}

impl Default for ClassifierWeights {
    fn default() -> Self {
        Self {
            title_weight: 2.0,
            body_weight: 1.0,
            confidence_saturation: 6.0,
        }
    }
}

pub struct Classifier {
    catalog: CategoryCatalog,
    weights: ClassifierWeights,
}

impl Classifier {
    pub fn new() -> Self {
        Self::with_weights(ClassifierWeights::default())
    }

    pub fn with_weights(weights: ClassifierWeights) -> Self {
        Self {
            catalog: CategoryCatalog::new(),
            weights,
        }
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    /// Assigns exactly one (category, confidence) pair. Never fails:
    /// empty or unmatched text yields the fallback category at confidence 0.
    /// Ties between categories resolve to the earlier catalog entry.
    pub fn classify(&self, title: &str, body: &str) -> Classification {
        let title = title.trim().to_lowercase();
        let body = body.trim().to_lowercase();

        let mut winner: Option<&Category> = None;
        let mut best_score = 0.0f32;

        for category in self.catalog.scored() {
            let title_matches = count_matches(&title, &category.keywords);
            let body_matches = count_matches(&body, &category.keywords);
            let score = title_matches as f32 * self.weights.title_weight
                + body_matches as f32 * self.weights.body_weight;

            // Strictly greater, so equal scores keep the higher-priority
            // (earlier) category.
            if score > best_score {
                best_score = score;
                winner = Some(category);
            }
        }

        match winner {
            Some(category) => Classification {
                category: category.name.clone(),
                confidence: (best_score / self.weights.confidence_saturation).min(1.0),
            },
            None => Classification {
                category: self.catalog.fallback().name.clone(),
                confidence: 0.0,
            },
        }
    }

    pub fn classify_record(&self, record: &ContentRecord) -> Classification {
        self.classify(&record.title, &record.body)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of keywords present as substrings, each counted at most once.
fn count_matches(text: &str, keywords: &[String]) -> usize {
    if text.is_empty() {
        return 0;
    }
    keywords.iter().filter(|k| text.contains(k.as_str())).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::FALLBACK_CATEGORY;

    #[test]
    fn test_pain_point_title() {
        let classifier = Classifier::new();
        let result = classifier.classify("This software is terrible and keeps crashing", "");
        assert_eq!(result.category, "Pain Points");
        assert!(result.confidence > 0.0);
    }

    #[test]
    fn test_solution_request_title() {
        let classifier = Classifier::new();
        let result = classifier.classify("What's the best budget laptop for programming?", "");
        // "budget" also scores for Money Talk, but the solution-seeking
        // phrases outweigh it.
        assert_eq!(result.category, "Solution Requests");
        assert!(result.confidence > 0.0);
    }

    #[test]
    fn test_empty_text_falls_back_with_zero_confidence() {
        let classifier = Classifier::new();
        let result = classifier.classify("", "");
        assert_eq!(result.category, FALLBACK_CATEGORY);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_no_keyword_text_falls_back() {
        let classifier = Classifier::new();
        let result = classifier.classify("Weekly community thread", "Say hi and introduce yourself");
        assert_eq!(result.category, FALLBACK_CATEGORY);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_title_outweighs_body() {
        let classifier = Classifier::new();
        // One Pain Points keyword in the title vs one Money Talk keyword in
        // the body: the title match must win.
        let result = classifier.classify("My setup keeps crashing", "at least it was cheap");
        assert_eq!(result.category, "Pain Points");
    }

    #[test]
    fn test_tie_breaks_by_catalog_order() {
        let classifier = Classifier::new();
        // "broken" (Pain Points) and "recommend" (Solution Requests) each
        // match once in the title; Pain Points is declared first.
        let result = classifier.classify("Mine is broken, recommend me one", "");
        assert_eq!(result.category, "Pain Points");
    }

    #[test]
    fn test_confidence_is_monotonic_in_matches() {
        let classifier = Classifier::new();
        let one = classifier.classify("it crashed", "");
        let two = classifier.classify("it crashed with an awful error", "");
        let three = classifier.classify("it crashed with an awful error, totally broken and useless", "");

        assert_eq!(one.category, "Pain Points");
        assert!(two.confidence >= one.confidence);
        assert!(three.confidence >= two.confidence);
        assert!(three.confidence <= 1.0);
    }

    #[test]
    fn test_confidence_clamped_to_one() {
        let classifier = Classifier::new();
        let result = classifier.classify(
            "terrible awful broken useless nightmare, crash after crash, worst bug",
            "frustrating issue, stopped working, not working, unusable",
        );
        assert_eq!(result.category, "Pain Points");
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_custom_weights_change_scoring() {
        let classifier = Classifier::with_weights(ClassifierWeights {
            title_weight: 1.0,
            body_weight: 1.0,
            confidence_saturation: 2.0,
        });
        let result = classifier.classify("it crashed", "price was high");
        // Equal weights, one keyword each: tie goes to Pain Points.
        assert_eq!(result.category, "Pain Points");
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_case_insensitive_matching() {
        let classifier = Classifier::new();
        let result = classifier.classify("TERRIBLE experience, SO ANNOYING", "");
        assert_eq!(result.category, "Pain Points");
    }
}
