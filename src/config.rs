/// Length of one evergreen countdown cycle.
pub const COUNTDOWN_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

/// Storage key of the countdown shown on the AI mentorship page.
pub const IA_COUNTDOWN_KEY: &str = "mentoria_ia_countdown_end";

/// Storage key of the countdown shown on the office management page.
pub const GESTAO_COUNTDOWN_KEY: &str = "mentoria_gestao_countdown_end";

pub const NOTIFICATION_SOUND_URL: &str =
    "https://assets.mixkit.co/active_storage/sfx/2354/2354-preview.mp3";

pub const NOTIFICATION_VOLUME: f64 = 0.5;

pub const WHATSAPP_URL: &str = "https://wa.me/5562999999999";

/// Scroll offset after which the sticky checkout bar slides in.
pub const STICKY_CTA_SCROLL_PX: f64 = 500.0;

/// Delays driving the scripted chat, all in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChatTimings {
    pub first_message_ms: u32,
    pub second_message_ms: u32,
    pub resume_delay_ms: u32,
    pub loop_min_ms: u32,
    pub loop_max_ms: u32,
    pub typing_min_ms: u32,
    pub typing_max_ms: u32,
}

impl Default for ChatTimings {
    fn default() -> Self {
        Self {
            first_message_ms: 1_500,
            second_message_ms: 4_000,
            resume_delay_ms: 5_000,
            loop_min_ms: 25_000,
            loop_max_ms: 60_000,
            typing_min_ms: 2_000,
            typing_max_ms: 4_000,
        }
    }
}
