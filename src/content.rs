use log::error;
use serde::Deserialize;
use thiserror::Error;

use crate::chat::script::CustomMessages;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid content json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Hero {
    #[serde(default)]
    pub badge: String,
    pub title: String,
    #[serde(default)]
    pub highlight: String,
    #[serde(default)]
    pub subtitle: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct BulletSection {
    pub title: String,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Pricing {
    pub old: String,
    pub current: String,
    #[serde(default)]
    pub cents: String,
    #[serde(default)]
    pub installments_text: Option<String>,
    #[serde(default)]
    pub installment_value: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct CtaLinks {
    #[serde(default)]
    pub checkout: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Cta {
    #[serde(default)]
    pub pricing: Option<Pricing>,
    #[serde(default)]
    pub links: CtaLinks,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ChatContent {
    #[serde(default = "default_mentor_name")]
    pub mentor_name: String,
    #[serde(default)]
    pub custom_messages: Option<CustomMessages>,
}

impl Default for ChatContent {
    fn default() -> Self {
        Self {
            mentor_name: default_mentor_name(),
            custom_messages: None,
        }
    }
}

fn default_mentor_name() -> String {
    "Equipe V&A".to_string()
}

/// Copy of one sales page, loaded from `content/*.json`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct PageContent {
    pub hero: Hero,
    #[serde(default)]
    pub problem: BulletSection,
    #[serde(default)]
    pub solution: BulletSection,
    #[serde(default)]
    pub faq: Vec<FaqEntry>,
    #[serde(default)]
    pub cta: Cta,
    #[serde(default)]
    pub chat: ChatContent,
}

impl PageContent {
    pub fn from_json(raw: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Parses embedded page copy, degrading to an almost empty page rather
    /// than failing to render.
    pub fn load(name: &str, raw: &str) -> Self {
        match Self::from_json(raw) {
            Ok(content) => content,
            Err(e) => {
                error!("Failed to load page content {}: {}", name, e);
                Self {
                    hero: Hero {
                        title: "Mentoria".to_string(),
                        ..Hero::default()
                    },
                    ..Self::default()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::script::ChatScript;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_chat_speaks_the_builtin_script() {
        let chat = ChatContent::default();
        assert_eq!(chat.mentor_name, "Equipe V&A");
        assert_eq!(
            ChatScript::with_custom(chat.custom_messages.as_ref()),
            ChatScript::builtin()
        );
    }

    #[test]
    fn minimal_page_uses_defaults() {
        let content = PageContent::from_json(r#"{ "hero": { "title": "Oi" } }"#).unwrap();
        assert_eq!(content.hero.title, "Oi");
        assert!(content.faq.is_empty());
        assert_eq!(content.chat.mentor_name, "Equipe V&A");
        assert_eq!(content.cta.links.checkout, None);
    }

    #[test]
    fn chat_overrides_are_read() {
        let content = PageContent::from_json(
            r#"{
                "hero": { "title": "Oi" },
                "chat": {
                    "mentor_name": "Túlio",
                    "custom_messages": { "initial": ["a", "b"], "followUp": [{ "text": "c" }] }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(content.chat.mentor_name, "Túlio");
        let custom = content.chat.custom_messages.unwrap();
        assert_eq!(custom.initial.len(), 2);
        assert_eq!(custom.follow_up[0].as_str(), "c");
    }

    #[test]
    fn broken_json_degrades_to_placeholder() {
        let content = PageContent::load("broken", "{");
        assert_eq!(content.hero.title, "Mentoria");
    }

    #[test]
    fn shipped_pages_parse() {
        for (name, raw) in [
            ("mentoria-ia", include_str!("../content/mentoria-ia.json")),
            ("mentoria-gestao", include_str!("../content/mentoria-gestao.json")),
        ] {
            let content = PageContent::from_json(raw)
                .unwrap_or_else(|e| panic!("{} does not parse: {}", name, e));
            assert!(!content.faq.is_empty(), "{} has no faq", name);
            assert!(content.cta.pricing.is_some(), "{} has no pricing", name);
        }
    }
}
