use serde::{Deserialize, Serialize};

/// Name of the category assigned when no keyword list matches.
pub const FALLBACK_CATEGORY: &str = "General Discussion";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub color: String,
    pub icon: String,
    pub keywords: Vec<String>,
}

/// Fixed catalog of discussion categories. The declared order of the scored
/// categories doubles as the tie-break priority during classification:
/// earlier wins when two categories score equally.
pub struct CategoryCatalog {
    scored: Vec<Category>,
    fallback: Category,
}

impl CategoryCatalog {
    pub fn new() -> Self {
        let mut catalog = Self {
            scored: Vec::new(),
            fallback: Category {
                name: FALLBACK_CATEGORY.to_string(),
                color: "#95a5a6".to_string(),
                icon: "💬".to_string(),
                keywords: Vec::new(),
            },
        };

        catalog.add_category(
            "Pain Points",
            "#e74c3c",
            "😤",
            &[
                "problem",
                "issue",
                "annoying",
                "frustrating",
                "frustrated",
                "hate",
                "terrible",
                "awful",
                "broken",
                "crash",
                "bug",
                "error",
                "fails",
                "failing",
                "doesn't work",
                "not working",
                "stopped working",
                "worst",
                "useless",
                "struggling",
                "struggle",
                "nightmare",
                "disappointed",
                "unusable",
            ],
        );

        catalog.add_category(
            "Solution Requests",
            "#3498db",
            "🙋",
            &[
                "how do i",
                "how to",
                "how can i",
                "what's the best",
                "what is the best",
                "best way",
                "best",
                "recommend",
                "suggestion",
                "suggest",
                "advice",
                "help me",
                "looking for",
                "any good",
                "which should",
                "should i use",
                "is there a",
                "tool for",
                "app for",
            ],
        );

        catalog.add_category(
            "Seeking Alternatives",
            "#9b59b6",
            "🔄",
            &[
                "alternative",
                "instead of",
                "replacement",
                "replace",
                "switch from",
                "switching from",
                "switch away",
                "similar to",
                "competitor",
                "migrate from",
                "migrating from",
                "moving away from",
                "better than",
            ],
        );

        catalog.add_category(
            "Money Talk",
            "#2ecc71",
            "💰",
            &[
                "price",
                "cost",
                "expensive",
                "cheap",
                "budget",
                "subscription",
                "pay for",
                "paid",
                "worth it",
                "money",
                "refund",
                "discount",
                "license",
                "per month",
                "per year",
                "$",
            ],
        );

        catalog.add_category(
            "Hot Discussions",
            "#e67e22",
            "🔥",
            &[
                "unpopular opinion",
                "am i the only one",
                "change my mind",
                "controversial",
                "debate",
                "hot take",
                "thoughts on",
                "what do you think",
                "agree",
                " vs ",
                "versus",
                "prove me wrong",
            ],
        );

        catalog
    }

    fn add_category(&mut self, name: &str, color: &str, icon: &str, keywords: &[&str]) {
        self.scored.push(Category {
            name: name.to_string(),
            color: color.to_string(),
            icon: icon.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        });
    }

    /// Categories that participate in keyword scoring, in priority order.
    pub fn scored(&self) -> &[Category] {
        &self.scored
    }

    pub fn fallback(&self) -> &Category {
        &self.fallback
    }

    /// All categories, scored ones first, fallback last.
    pub fn all(&self) -> impl Iterator<Item = &Category> {
        self.scored.iter().chain(std::iter::once(&self.fallback))
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.all().find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}
