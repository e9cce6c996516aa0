/// Keyword-matching chatbot. Rules are checked in order against the lowercased
/// message; the first rule with any matching keyword wins. There is no NLP
/// behind this, only the substring table.
pub struct ChatRule {
    pub keywords: &'static [&'static str],
    pub category: &'static str,
    pub response: &'static str,
}

pub const MAIZE_RESPONSE: &str = "Maize grows best with consistent rainfall and \
well-drained soils. Expect a strong yield this season if you plant early and \
apply nitrogen-rich fertilizer once the plants reach knee height.";

pub const FALLBACK_RESPONSE: &str = "I can help with crops, weather, pests, soil \
and market prices. Could you tell me a bit more about your farm?";

pub const FALLBACK_CATEGORY: &str = "general";

pub static RULES: &[ChatRule] = &[
    ChatRule {
        keywords: &["maize", "corn"],
        category: "crops",
        response: MAIZE_RESPONSE,
    },
    ChatRule {
        keywords: &["beans", "legume"],
        category: "crops",
        response: "Beans do well intercropped with maize. Sow at the onset of \
rains and avoid waterlogged plots to prevent root rot.",
    },
    ChatRule {
        keywords: &["weather", "rain", "forecast", "drought"],
        category: "weather",
        response: "The outlook for your region shows seasonal rainfall near the \
long-term average. Check the weather panel for the latest local conditions.",
    },
    ChatRule {
        keywords: &["pest", "insect", "disease", "armyworm"],
        category: "pests",
        response: "Scout your fields weekly. For fall armyworm, act early: \
handpick egg masses and apply a registered pesticide in the late afternoon.",
    },
    ChatRule {
        keywords: &["fertilizer", "soil", "manure", "compost"],
        category: "soil",
        response: "Test your soil before the season. Most plots here benefit \
from DAP at planting and a nitrogen top-dressing four weeks after emergence.",
    },
    ChatRule {
        keywords: &["harvest", "storage", "store"],
        category: "harvest",
        response: "Harvest once moisture drops below 13 percent and store in \
airtight bags to keep weevils out.",
    },
    ChatRule {
        keywords: &["price", "market", "sell"],
        category: "market",
        response: "Market prices vary by county. Selling through a cooperative \
usually gets a better rate than the farm gate.",
    },
    ChatRule {
        keywords: &["hello", "good morning", "good afternoon", "habari"],
        category: "greeting",
        response: "Hello! Ask me about your crops, the weather, pests or \
market prices.",
    },
];

/// First matching rule wins; no match falls back to the generic prompt.
pub fn reply(message: &str) -> (&'static str, &'static str) {
    let msg = message.to_lowercase();
    for rule in RULES {
        if rule.keywords.iter().any(|k| msg.contains(k)) {
            return (rule.response, rule.category);
        }
    }
    (FALLBACK_RESPONSE, FALLBACK_CATEGORY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maize_matches_any_case_and_surrounding_text() {
        for msg in [
            "maize",
            "Tell me about MAIZE yields",
            "is MaIzE ok to plant now?",
        ] {
            let (response, category) = reply(msg);
            assert_eq!(category, "crops");
            assert_eq!(response, MAIZE_RESPONSE);
        }
    }

    #[test]
    fn first_matching_rule_wins() {
        // Mentions both maize and weather; maize rule is earlier in the table.
        let (_, category) = reply("will the rain be enough for my maize?");
        assert_eq!(category, "crops");
    }

    #[test]
    fn weather_keywords_map_to_weather() {
        let (_, category) = reply("what's the forecast this week");
        assert_eq!(category, "weather");
    }

    #[test]
    fn unmatched_message_falls_back() {
        let (response, category) = reply("xyzzy");
        assert_eq!(category, FALLBACK_CATEGORY);
        assert_eq!(response, FALLBACK_RESPONSE);
    }
}
