//! Keyword-based headline classification.
//!
//! Classification is deliberately simple: lowercase the title and description,
//! then walk an ordered list of categories and return the first one whose
//! keyword list contains a substring of the text. No scoring, no
//! multi-category assignment. Predictable and dependency-free beats clever
//! here — the category set is small and the keyword lists are curated.

/// One category and the keywords that select it.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub name: &'static str,
    /// Optional icon for the web layer, seeded alongside the category row.
    pub icon: &'static str,
    pub keywords: &'static [&'static str],
}

/// Ordered category table with a guaranteed fallback entry.
///
/// The order of `rules` is the match order: the first category with a keyword
/// hit wins. The table is passed into [`classify`](CategoryTable::classify)
/// callers as data so tests can substitute fixtures.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
    fallback: CategoryRule,
}

impl CategoryTable {
    pub fn new(rules: Vec<CategoryRule>, fallback: CategoryRule) -> Self {
        Self { rules, fallback }
    }

    /// The built-in production table: nine keyword categories plus the
    /// `General` fallback.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_RULES.to_vec(), FALLBACK_RULE.clone())
    }

    /// Name of the category used when no keyword matches.
    pub fn fallback_name(&self) -> &str {
        self.fallback.name
    }

    /// All categories including the fallback, in declaration order.
    /// Used to seed the reference store.
    pub fn all(&self) -> impl Iterator<Item = &CategoryRule> {
        self.rules.iter().chain(std::iter::once(&self.fallback))
    }

    /// Classify a headline by keyword membership.
    ///
    /// Title and description are concatenated and lowercased; the first
    /// category (in table order) with any keyword appearing as a substring
    /// wins. Returns the fallback name when nothing matches.
    pub fn classify(&self, title: &str, description: &str) -> &str {
        let text = format!("{} {}", title, description).to_lowercase();
        for rule in &self.rules {
            if rule.keywords.iter().any(|kw| text.contains(kw)) {
                return rule.name;
            }
        }
        self.fallback.name
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::builtin()
    }
}

const FALLBACK_RULE: CategoryRule = CategoryRule {
    name: "General",
    icon: "📰",
    keywords: &[],
};

const BUILTIN_RULES: &[CategoryRule] = &[
    CategoryRule {
        name: "Politics",
        icon: "🏛️",
        keywords: &[
            "election",
            "government",
            "minister",
            "parliament",
            "politics",
            "political",
            "congress",
            "bjp",
            "vote",
            "pm",
            "president",
        ],
    },
    CategoryRule {
        name: "Technology",
        icon: "💻",
        keywords: &[
            "tech",
            "technology",
            "ai",
            "software",
            "hardware",
            "computer",
            "app",
            "digital",
            "cyber",
            "internet",
            "smartphone",
            "gadget",
        ],
    },
    CategoryRule {
        name: "Sports",
        icon: "⚽",
        keywords: &[
            "cricket",
            "football",
            "sports",
            "match",
            "player",
            "ipl",
            "fifa",
            "olympics",
            "tournament",
            "champion",
            "goal",
            "score",
        ],
    },
    CategoryRule {
        name: "Business",
        icon: "📈",
        keywords: &[
            "business",
            "economy",
            "market",
            "stock",
            "finance",
            "company",
            "corporate",
            "industry",
            "trade",
            "investment",
            "rupee",
            "revenue",
        ],
    },
    CategoryRule {
        name: "Entertainment",
        icon: "🎬",
        keywords: &[
            "movie",
            "film",
            "actor",
            "actress",
            "bollywood",
            "hollywood",
            "music",
            "celebrity",
            "entertainment",
            "show",
            "series",
        ],
    },
    CategoryRule {
        name: "Health",
        icon: "🏥",
        keywords: &[
            "health", "medical", "doctor", "hospital", "disease", "vaccine", "covid", "medicine",
            "treatment", "patient",
        ],
    },
    CategoryRule {
        name: "Science",
        icon: "🔬",
        keywords: &[
            "science",
            "research",
            "study",
            "scientist",
            "space",
            "nasa",
            "isro",
            "discovery",
            "experiment",
        ],
    },
    CategoryRule {
        name: "World",
        icon: "🌍",
        keywords: &[
            "world",
            "international",
            "global",
            "country",
            "nation",
            "usa",
            "china",
            "europe",
            "war",
            "peace",
        ],
    },
    CategoryRule {
        name: "Education",
        icon: "🎓",
        keywords: &[
            "education",
            "school",
            "college",
            "university",
            "student",
            "exam",
            "admission",
            "degree",
            "learning",
        ],
    },
];

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fixture_table() -> CategoryTable {
        CategoryTable::new(
            vec![
                CategoryRule {
                    name: "First",
                    icon: "",
                    keywords: &["alpha", "shared"],
                },
                CategoryRule {
                    name: "Second",
                    icon: "",
                    keywords: &["beta", "shared"],
                },
            ],
            CategoryRule {
                name: "Fallback",
                icon: "",
                keywords: &[],
            },
        )
    }

    #[test]
    fn test_politics_example() {
        let table = CategoryTable::builtin();
        let category = table.classify("PM announces new policy", "Government unveils plan");
        assert_eq!(category, "Politics");
    }

    #[test]
    fn test_no_match_returns_general() {
        let table = CategoryTable::builtin();
        assert_eq!(table.classify("Quiet day everywhere", "Nothing notable"), "General");
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let table = CategoryTable::builtin();
        assert_eq!(table.classify("CRICKET FINAL TONIGHT", ""), "Sports");
    }

    #[test]
    fn test_description_alone_can_match() {
        let table = CategoryTable::builtin();
        assert_eq!(table.classify("Morning brief", "vaccine rollout expands"), "Health");
    }

    #[test]
    fn test_first_match_wins_by_declared_order() {
        let table = fixture_table();
        // "shared" appears in both keyword lists; declaration order decides.
        assert_eq!(table.classify("shared keyword", ""), "First");
        assert_eq!(table.classify("beta only", ""), "Second");
        assert_eq!(table.classify("nothing", ""), "Fallback");
    }

    #[test]
    fn test_classification_is_deterministic() {
        let table = CategoryTable::builtin();
        let first = table.classify("AI startup raises funding round", "tech market news");
        for _ in 0..50 {
            assert_eq!(
                table.classify("AI startup raises funding round", "tech market news"),
                first
            );
        }
    }

    #[test]
    fn test_keyword_matches_as_substring() {
        let table = CategoryTable::builtin();
        // "pm" matches inside "PM" after lowercasing, even mid-sentence.
        assert_eq!(table.classify("The PM spoke today", ""), "Politics");
    }

    #[test]
    fn test_all_includes_fallback_last() {
        let table = CategoryTable::builtin();
        let names: Vec<&str> = table.all().map(|r| r.name).collect();
        assert_eq!(names.first().copied(), Some("Politics"));
        assert_eq!(names.last().copied(), Some("General"));
        assert_eq!(names.len(), 10);
    }
}
