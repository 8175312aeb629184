//! Canned-response resolution.
//!
//! The "AI" is an ordered table of (trigger substrings, reply) pairs evaluated
//! top to bottom against the lower-cased user input. The first rule with any
//! trigger contained in the input wins; a fixed fallback covers everything
//! else. Replies mix Hindi and English on purpose, the assistant is bilingual.

/// The assistant greeting the conversation is seeded with at startup.
pub const GREETING_SEED: &str = "नमस्ते! मैं DecentraGPT हूं, आपका decentralized AI assistant जो Internet Computer Protocol पर चलता है। आज मैं आपकी कैसे मदद कर सकता हूं? 🚀";

/// Suggested prompts a surface can offer while the conversation still only
/// holds the seeded greeting.
pub const QUICK_REPLIES: [&str; 4] = [
    "ICP के बारे में बताएं",
    "Decentralized AI क्या है?",
    "Live agent से बात करना चाहता हूं",
    "Features दिखाएं",
];

pub const GREETING_REPLY: &str = "नमस्ते! मैं पूरी तरह से on-chain Internet Computer पर चल रहा हूं। हर interaction decentralized और transparent है। आप क्या जानना चाहते हैं? 🌟";

pub const PLATFORM_REPLY: &str = "Internet Computer Protocol (ICP) web speed पर unlimited capacity के साथ smart contracts चलाने में सक्षम बनाता है। मैं ICP canisters द्वारा powered हूं, जो हर conversation को securely on-chain store करता है बिना किसी intermediaries के। 🔗⚡";

pub const DECENTRALIZATION_REPLY: &str = "Decentralization का मतलब है कोई single point of failure नहीं! Traditional AI assistants के विपरीत, मैं nodes के distributed network पर चलता हूं। आपका data secure, private रहता है और आपका पूरा control रहता है। 🛡️🌐";

pub const FEATURES_REPLY: &str = "मैं कई advanced features प्रदान करता हूं:\n\n🎯 Real-time AI conversations\n🔊 Voice interactions\n📁 File sharing & analysis\n🎨 Image processing\n💾 On-chain data storage\n🔐 Complete privacy & security\n\nऔर भी बहुत कुछ! कोई specific feature के बारे में पूछना चाहते हैं?";

pub const AGENT_REPLY: &str = "हमारे live agents आपकी advanced queries के लिए उपलब्ध हैं! Right side में chat widget से आप directly human experts से बात कर सकते हैं। वे ICP, blockchain development, और decentralized AI के specialists हैं। 👨‍💻✨";

pub const FUTURE_REPLY: &str = "AI का भविष्य decentralized है! ICP पर चलकर, हम intermediaries को eliminate करते हैं, data sovereignty ensure करते हैं, और truly trustless AI systems बनाते हैं। यह autonomous, on-chain intelligence की शुरुआत है। 🚀🤖";

pub const FALLBACK_REPLY: &str = "बहुत दिलचस्प सवाल! एक decentralized AI के रूप में, मैं on-chain interactions से लगातार सीख रहा हूं while privacy और security maintain करते हुए। हर response Internet Computer network के distributed computation के through generate होता है। कुछ और specific पूछना चाहते हैं? 💡🔮";

struct Rule {
    triggers: &'static [&'static str],
    reply: &'static str,
}

/// Priority order is part of the contract: e.g. "tell me about ICP features"
/// hits the platform rule, not the capability rule, because it comes first.
/// Triggers must be lower-case; matching is plain substring containment.
const RULES: &[Rule] = &[
    Rule {
        triggers: &["hello", "hi", "नमस्ते", "हैलो"],
        reply: GREETING_REPLY,
    },
    Rule {
        triggers: &["icp", "internet computer"],
        reply: PLATFORM_REPLY,
    },
    Rule {
        triggers: &["decentralized", "blockchain", "विकेंद्रीकृत"],
        reply: DECENTRALIZATION_REPLY,
    },
    Rule {
        triggers: &["features", "क्या कर सकते"],
        reply: FEATURES_REPLY,
    },
    Rule {
        triggers: &["agent", "एजेंट"],
        reply: AGENT_REPLY,
    },
    Rule {
        triggers: &["future", "ai", "भविष्य"],
        reply: FUTURE_REPLY,
    },
];

/// Map a user utterance to a canned reply.
///
/// Pure and total: every input yields exactly one reply. The input is
/// lower-cased for matching only; the caller keeps the original text.
pub fn resolve(input: &str) -> &'static str {
    let normalized = input.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.triggers.iter().any(|t| normalized.contains(t)))
        .map(|rule| rule.reply)
        .unwrap_or(FALLBACK_REPLY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_each_trigger_group() {
        assert_eq!(resolve("hello there"), GREETING_REPLY);
        assert_eq!(resolve("what is icp?"), PLATFORM_REPLY);
        assert_eq!(resolve("explain blockchain to me"), DECENTRALIZATION_REPLY);
        assert_eq!(resolve("what features do you offer"), FEATURES_REPLY);
        assert_eq!(resolve("connect me to a support agent"), AGENT_REPLY);
        assert_eq!(resolve("what does the future look like"), FUTURE_REPLY);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(resolve("HELLO"), GREETING_REPLY);
        assert_eq!(resolve("Tell me about Internet Computer"), PLATFORM_REPLY);
    }

    #[test]
    fn matches_multi_script_triggers() {
        assert_eq!(resolve("नमस्ते दोस्त"), GREETING_REPLY);
        assert_eq!(resolve("आप क्या कर सकते हो"), FEATURES_REPLY);
    }

    #[test]
    fn first_match_wins_across_rules() {
        // Triggers from rule 1 (greeting) and rule 3 (decentralization) both
        // present: table order decides.
        assert_eq!(resolve("hello, how does blockchain work"), GREETING_REPLY);
    }

    #[test]
    fn platform_rule_outranks_feature_rule() {
        assert_eq!(resolve("tell me about ICP features"), PLATFORM_REPLY);
    }

    #[test]
    fn unmatched_input_falls_back() {
        assert_eq!(resolve("asdkjasd"), FALLBACK_REPLY);
        assert_eq!(resolve(""), FALLBACK_REPLY);
    }

    #[test]
    fn resolution_is_deterministic() {
        let input = "so what's the future of decentralized ai?";
        assert_eq!(resolve(input), resolve(input));
    }
}
