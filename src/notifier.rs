use thiserror::Error;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::HtmlAudioElement;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SoundError {
    #[error("could not create audio element: {0}")]
    Create(String),
    #[error("audio playback was rejected: {0}")]
    Play(String),
}

/// Plays the short "new message" cue.
pub trait Notifier {
    fn notify(&self) -> Result<(), SoundError>;
}

pub struct AudioNotifier {
    src: String,
    volume: f64,
}

impl AudioNotifier {
    pub fn new(src: impl Into<String>, volume: f64) -> Self {
        Self {
            src: src.into(),
            volume: volume.clamp(0.0, 1.0),
        }
    }
}

impl Notifier for AudioNotifier {
    fn notify(&self) -> Result<(), SoundError> {
        let audio = HtmlAudioElement::new_with_src(&self.src)
            .map_err(|e| SoundError::Create(format!("{:?}", e)))?;
        audio.set_volume(self.volume);
        let playing = audio
            .play()
            .map_err(|e| SoundError::Play(format!("{:?}", e)))?;

        // Autoplay policies reject the promise until the user has interacted
        // with the page; that is expected and only worth a log line.
        spawn_local(async move {
            if let Err(e) = JsFuture::from(playing).await {
                log::info!("Audio play failed: {:?}", e);
            }
        });
        Ok(())
    }
}

#[cfg(test)]
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentNotifier;

#[cfg(test)]
impl Notifier for SilentNotifier {
    fn notify(&self) -> Result<(), SoundError> {
        Ok(())
    }
}
