//! User agent classification.
//!
//! # Design Decisions
//! - Substring match on the uppercased agent, not a token match: any agent
//!   containing "bot" anywhere counts as automated, false positives included
//! - Missing header behaves as an empty agent, which is human

/// Header consulted for classification.
pub const USER_AGENT: &str = "user-agent";

const BOT_MARKER: &str = "BOT";

/// Who is on the other end of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentClass {
    /// Crawlers, link unfurlers and anything else calling itself a bot.
    Automated,
    Human,
}

impl AgentClass {
    /// Classify a raw `User-Agent` value; `None` means the header was absent.
    pub fn from_user_agent(agent: Option<&str>) -> Self {
        let agent = agent.unwrap_or_default();
        if agent.to_uppercase().contains(BOT_MARKER) {
            AgentClass::Automated
        } else {
            AgentClass::Human
        }
    }

    pub fn is_automated(self) -> bool {
        self == AgentClass::Automated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_crawlers_are_automated() {
        for agent in [
            "Googlebot/2.1 (+http://www.google.com/bot.html)",
            "Mozilla/5.0 (compatible; Discordbot/2.0; +https://discordapp.com)",
            "TelegramBot (like TwitterBot)",
            "Slackbot-LinkExpanding 1.0",
        ] {
            assert_eq!(AgentClass::from_user_agent(Some(agent)), AgentClass::Automated, "{agent}");
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert!(AgentClass::from_user_agent(Some("bot")).is_automated());
        assert!(AgentClass::from_user_agent(Some("bOt")).is_automated());
    }

    #[test]
    fn test_substring_inside_unrelated_word() {
        // "Abbott" contains "bot" contiguously.
        assert!(AgentClass::from_user_agent(Some("Abbott Browser 1.0")).is_automated());
        assert!(AgentClass::from_user_agent(Some("robotics-lab")).is_automated());
        assert!(!AgentClass::from_user_agent(Some("B-O-T")).is_automated());
    }

    #[test]
    fn test_browsers_and_missing_header_are_human() {
        assert_eq!(AgentClass::from_user_agent(Some("Mozilla/5.0")), AgentClass::Human);
        assert_eq!(AgentClass::from_user_agent(Some("")), AgentClass::Human);
        assert_eq!(AgentClass::from_user_agent(None), AgentClass::Human);
    }
}
