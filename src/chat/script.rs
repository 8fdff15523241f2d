use log::{error, warn};
use serde::Deserialize;

#[cfg(test)]
use crate::content::ContentError;
use crate::timing::random::RandomSource;

const BUILTIN_CHAT_JSON: &str = include_str!("../../content/chat.json");

/// A message either as a bare string or as `{ "text": ... }`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageText {
    Plain(String),
    Rich { text: String },
}

impl MessageText {
    pub fn as_str(&self) -> &str {
        match self {
            MessageText::Plain(text) => text,
            MessageText::Rich { text } => text,
        }
    }
}

/// Per-page override of the scripted copy, as found in the page JSON.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct CustomMessages {
    #[serde(default)]
    pub initial: Vec<MessageText>,
    #[serde(default, rename = "followUp", alias = "follow_up")]
    pub follow_up: Vec<MessageText>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct InitialPair {
    pub first: String,
    pub second: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ChatUiText {
    pub status_online: String,
    pub typing_suffix: String,
    pub cta_button: String,
}

impl Default for ChatUiText {
    fn default() -> Self {
        Self {
            status_online: "Online agora".to_string(),
            typing_suffix: "está digitando...".to_string(),
            cta_button: "Falar no WhatsApp".to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ChatDefaults {
    initial_pairs: Vec<InitialPair>,
    follow_up_messages: Vec<String>,
}

#[derive(Deserialize)]
struct ChatFile {
    defaults: ChatDefaults,
    #[serde(default)]
    ui: ChatUiText,
}

/// Everything the scripted chat may say.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatScript {
    pub initial_pairs: Vec<InitialPair>,
    pub follow_up: Vec<String>,
    pub ui: ChatUiText,
}

impl Default for ChatScript {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ChatScript {
    /// Copy shipped with the site in `content/chat.json`.
    pub fn builtin() -> Self {
        match serde_json::from_str::<ChatFile>(BUILTIN_CHAT_JSON) {
            Ok(file) => {
                let script = Self {
                    initial_pairs: file.defaults.initial_pairs,
                    follow_up: file.defaults.follow_up_messages,
                    ui: file.ui,
                };
                if script.is_complete() {
                    script
                } else {
                    error!("Built-in chat copy is incomplete, using fallback");
                    Self::fallback()
                }
            }
            Err(e) => {
                error!("Failed to parse built-in chat copy: {}", e);
                Self::fallback()
            }
        }
    }

    fn fallback() -> Self {
        Self {
            initial_pairs: vec![InitialPair {
                first: "Oi! Tudo bem? 👋".to_string(),
                second: "Posso te ajudar com alguma dúvida sobre a mentoria?".to_string(),
            }],
            follow_up: vec!["Ainda está por aí? Estou à disposição. 💬".to_string()],
            ui: ChatUiText::default(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.initial_pairs.is_empty() && !self.follow_up.is_empty()
    }

    /// Applies a page override on top of the built-in copy. Parts of the
    /// override that are missing or blank keep the built-in text.
    pub fn with_custom(custom: Option<&CustomMessages>) -> Self {
        let mut script = Self::builtin();
        let Some(custom) = custom else {
            return script;
        };

        let initial: Vec<&str> = custom
            .initial
            .iter()
            .map(MessageText::as_str)
            .filter(|text| !text.trim().is_empty())
            .collect();
        match initial.as_slice() {
            [first, second, ..] => {
                script.initial_pairs = vec![InitialPair {
                    first: first.to_string(),
                    second: second.to_string(),
                }];
            }
            [] => {}
            _ => warn!("Custom chat needs two opening messages, keeping defaults"),
        }

        let follow_up: Vec<String> = custom
            .follow_up
            .iter()
            .map(MessageText::as_str)
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string)
            .collect();
        if !follow_up.is_empty() {
            script.follow_up = follow_up;
        }

        script
    }

    #[cfg(test)]
    pub fn from_json(raw: &str) -> Result<Self, ContentError> {
        let custom: CustomMessages = serde_json::from_str(raw)?;
        Ok(Self::with_custom(Some(&custom)))
    }

    pub fn choose_pair(&self, random: &mut dyn RandomSource) -> Option<&InitialPair> {
        random.pick(self.initial_pairs.len()).map(|i| &self.initial_pairs[i])
    }

    /// Uniform pick with replacement; repeats are allowed.
    pub fn choose_follow_up(&self, random: &mut dyn RandomSource) -> Option<&str> {
        random.pick(self.follow_up.len()).map(|i| self.follow_up[i].as_str())
    }
}
