use tally_core::FALLBACK_LABEL;

/// A label and the test that assigns it. Predicates receive lowercased text.
#[derive(Clone, Copy)]
pub struct ChainRule {
    pub label: &'static str,
    pub predicate: fn(&str) -> bool,
}

impl std::fmt::Debug for ChainRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainRule").field("label", &self.label).finish_non_exhaustive()
    }
}

/// Priority-ordered rules; the first one whose predicate holds wins.
///
/// Keyword sets overlap between rules, so the order is part of the
/// behaviour: "online" alone is Shopping because Shopping is tried first.
#[derive(Debug, Clone)]
pub struct RuleChain {
    rules: Vec<ChainRule>,
}

fn any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

impl RuleChain {
    pub fn new(rules: Vec<ChainRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ChainRule] {
        &self.rules
    }

    pub fn find_matching_rule(&self, text: &str) -> Option<&ChainRule> {
        let lower = text.to_lowercase();
        self.rules.iter().find(|r| (r.predicate)(&lower))
    }

    pub fn classify(&self, text: &str) -> &'static str {
        self.find_matching_rule(text).map_or(FALLBACK_LABEL, |r| r.label)
    }

    /// food → transport → medical → shopping → communication → education → culture
    pub fn categories() -> Self {
        Self::new(vec![
            ChainRule {
                label: "Food",
                predicate: |t| {
                    any(t, &[
                        "eat", "food", "lunch", "dinner", "breakfast", "meal", "restaurant",
                        "cafe", "coffee", "drink", "kimchi", "stew", "pizza", "burger",
                        "sandwich", "salad",
                    ])
                },
            },
            ChainRule {
                label: "Transportation",
                predicate: |t| {
                    any(t, &[
                        "transport", "subway", "bus", "taxi", "gas", "train", "metro", "uber",
                        "lyft", "drive", "car", "bike",
                    ])
                },
            },
            ChainRule {
                label: "Medical",
                predicate: |t| {
                    any(t, &[
                        "hospital", "medicine", "medical", "doctor", "pharmacy", "clinic",
                        "health", "treatment", "prescription",
                    ])
                },
            },
            ChainRule {
                label: "Shopping",
                predicate: |t| {
                    any(t, &[
                        "shopping", "clothes", "shoes", "store", "mall", "buy", "purchase",
                        "shop", "retail",
                    ]) || (t.contains("online") && any(t, &["shop", "buy", "purchase"]))
                },
            },
            ChainRule {
                label: "Communication",
                predicate: |t| {
                    any(t, &[
                        "phone", "internet", "communication", "mobile", "wifi", "data", "call",
                        "message", "text",
                    ]) || (t.contains("online") && any(t, &["call", "message", "internet"]))
                },
            },
            ChainRule {
                label: "Education",
                predicate: |t| {
                    any(t, &[
                        "book", "school", "education", "study", "course", "university",
                        "college", "learn", "class",
                    ])
                },
            },
            ChainRule {
                label: "Culture",
                predicate: |t| {
                    any(t, &[
                        "movie", "cinema", "culture", "entertainment", "game", "music",
                        "theater", "concert", "show",
                    ])
                },
            },
        ])
    }

    pub fn places() -> Self {
        Self::new(vec![
            ChainRule { label: "Home", predicate: |t| any(t, &["home", "house", "apartment"]) },
            ChainRule { label: "Office", predicate: |t| any(t, &["office", "work", "company"]) },
            ChainRule { label: "Cafe", predicate: |t| any(t, &["cafe", "coffee", "starbucks"]) },
            ChainRule {
                label: "Restaurant",
                predicate: |t| any(t, &["restaurant", "dining", "food"]),
            },
            ChainRule {
                label: "Mart",
                predicate: |t| any(t, &["mart", "supermarket", "grocery", "store"]),
            },
            ChainRule {
                label: "Online",
                predicate: |t| any(t, &["online", "internet", "website", "app"]),
            },
            ChainRule {
                label: "Hospital",
                predicate: |t| any(t, &["hospital", "clinic", "medical"]),
            },
            ChainRule {
                label: "School",
                predicate: |t| any(t, &["school", "university", "college"]),
            },
        ])
    }

    pub fn purposes() -> Self {
        Self::new(vec![
            ChainRule {
                label: "Meal",
                predicate: |t| any(t, &["meal", "lunch", "dinner", "breakfast", "eat"]),
            },
            ChainRule {
                label: "Snack",
                predicate: |t| any(t, &["snack", "dessert", "candy", "coffee", "drink"]),
            },
            ChainRule {
                label: "Meeting",
                predicate: |t| any(t, &["meeting", "business", "work", "party", "gathering"]),
            },
            ChainRule {
                label: "Personal Items",
                predicate: |t| any(t, &["personal", "cosmetics", "supplies", "clothes", "shoes"]),
            },
            ChainRule {
                label: "Household Items",
                predicate: |t| any(t, &["household", "cleaning", "home"]),
            },
            ChainRule {
                label: "Clothing",
                predicate: |t| any(t, &["clothing", "clothes", "shoes", "fashion"]),
            },
            ChainRule {
                label: "Transportation",
                predicate: |t| any(t, &["transport", "travel", "commute"]),
            },
            ChainRule {
                label: "Medical",
                predicate: |t| any(t, &["medical", "health", "medicine", "doctor"]),
            },
            ChainRule {
                label: "Education",
                predicate: |t| any(t, &["education", "study", "book", "course"]),
            },
            ChainRule {
                label: "Culture",
                predicate: |t| any(t, &["culture", "entertainment", "movie", "game"]),
            },
        ])
    }
}
