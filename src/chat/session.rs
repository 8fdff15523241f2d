use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, info};

use crate::chat::script::ChatScript;
use crate::config::ChatTimings;
use crate::notifier::Notifier;
use crate::timing::random::RandomSource;
use crate::timing::scheduler::{OwnerId, Scheduler};

/// Visible state of one mounted chat widget.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatSession {
    pub messages: Vec<String>,
    pub is_typing: bool,
    pub is_open: bool,
}

type Listener = Box<dyn Fn(&ChatSession)>;

struct ChatState {
    session: ChatSession,
    // Bumped on every open/close; tasks from an older epoch are ignored.
    epoch: u64,
}

struct ChatInner {
    owner: OwnerId,
    state: RefCell<ChatState>,
    script: ChatScript,
    timings: ChatTimings,
    scheduler: Rc<dyn Scheduler>,
    random: RefCell<Box<dyn RandomSource>>,
    notifier: Rc<dyn Notifier>,
    listener: RefCell<Option<Listener>>,
}

impl Drop for ChatInner {
    fn drop(&mut self) {
        self.scheduler.cancel_all(self.owner);
    }
}

/// Drives the fake operator: an opening pair of messages right after the
/// first open, then random follow-ups at random intervals while open.
///
/// Every timer goes through the injected [`Scheduler`] under this chat's
/// owner id, so closing is one `cancel_all`.
#[derive(Clone)]
pub struct ChatScheduler {
    inner: Rc<ChatInner>,
}

impl ChatScheduler {
    pub fn new(
        script: ChatScript,
        timings: ChatTimings,
        scheduler: Rc<dyn Scheduler>,
        random: Box<dyn RandomSource>,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        Self {
            inner: Rc::new(ChatInner {
                owner: OwnerId::next(),
                state: RefCell::new(ChatState {
                    session: ChatSession::default(),
                    epoch: 0,
                }),
                script,
                timings,
                scheduler,
                random: RefCell::new(random),
                notifier,
                listener: RefCell::new(None),
            }),
        }
    }

    /// Called with a fresh snapshot after every visible change.
    pub fn set_listener(&self, listener: impl Fn(&ChatSession) + 'static) {
        *self.inner.listener.borrow_mut() = Some(Box::new(listener));
    }

    pub fn snapshot(&self) -> ChatSession {
        self.inner.state.borrow().session.clone()
    }

    pub fn script(&self) -> &ChatScript {
        &self.inner.script
    }

    pub fn owner(&self) -> OwnerId {
        self.inner.owner
    }

    pub fn open(&self) {
        let (epoch, has_history) = {
            let mut state = self.inner.state.borrow_mut();
            if state.session.is_open {
                return;
            }
            state.session.is_open = true;
            state.epoch += 1;
            (state.epoch, !state.session.messages.is_empty())
        };

        if has_history {
            debug!("Chat reopened, resuming follow-ups");
            self.inner.after(epoch, self.inner.timings.resume_delay_ms, ChatInner::start_loop);
        } else {
            info!("Chat opened for the first time, starting opening sequence");
            self.inner.start_opening(epoch);
        }
        self.inner.emit();
    }

    pub fn close(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if !state.session.is_open {
                return;
            }
            state.session.is_open = false;
            state.session.is_typing = false;
            state.epoch += 1;
        }
        self.inner.scheduler.cancel_all(self.inner.owner);
        debug!("Chat closed, pending timers cancelled");
        self.inner.emit();
    }

    pub fn toggle(&self) {
        if self.snapshot().is_open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Cancels everything without touching the visible state. Used on unmount.
    pub fn shutdown(&self) {
        self.inner.state.borrow_mut().epoch += 1;
        self.inner.scheduler.cancel_all(self.inner.owner);
    }
}

impl ChatInner {
    fn is_live(&self, epoch: u64) -> bool {
        let state = self.state.borrow();
        state.epoch == epoch && state.session.is_open
    }

    fn emit(&self) {
        let snapshot = self.state.borrow().session.clone();
        if let Some(listener) = self.listener.borrow().as_ref() {
            listener(&snapshot);
        }
    }

    /// Runs `step` after `delay_ms` if this chat still exists and is still in
    /// the same open epoch.
    fn after(self: &Rc<Self>, epoch: u64, delay_ms: u32, step: fn(&Rc<ChatInner>, u64)) {
        let weak: Weak<ChatInner> = Rc::downgrade(self);
        self.scheduler.schedule_once(
            self.owner,
            delay_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    if inner.is_live(epoch) {
                        step(&inner, epoch);
                    }
                }
            }),
        );
    }

    fn start_opening(self: &Rc<Self>, epoch: u64) {
        let pair = {
            let mut random = self.random.borrow_mut();
            self.script.choose_pair(&mut **random).cloned()
        };
        let Some(pair) = pair else {
            self.after(epoch, self.timings.second_message_ms, ChatInner::start_loop);
            return;
        };

        self.state.borrow_mut().session.is_typing = true;

        let weak = Rc::downgrade(self);
        let first = pair.first;
        self.scheduler.schedule_once(
            self.owner,
            self.timings.first_message_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.deliver(epoch, first, true);
                }
            }),
        );

        let weak = Rc::downgrade(self);
        let second = pair.second;
        self.scheduler.schedule_once(
            self.owner,
            self.timings.second_message_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.deliver(epoch, second, false);
                }
            }),
        );

        self.after(epoch, self.timings.second_message_ms, ChatInner::start_loop);
    }

    fn start_loop(self: &Rc<Self>, epoch: u64) {
        let wait = self
            .random
            .borrow_mut()
            .range_inclusive(self.timings.loop_min_ms, self.timings.loop_max_ms);
        debug!("Next follow-up in {}ms", wait);
        self.after(epoch, wait, ChatInner::begin_typing);
    }

    fn begin_typing(self: &Rc<Self>, epoch: u64) {
        self.state.borrow_mut().session.is_typing = true;
        self.emit();

        let typing = self
            .random
            .borrow_mut()
            .range(self.timings.typing_min_ms, self.timings.typing_max_ms);
        self.after(epoch, typing, ChatInner::send_follow_up);
    }

    fn send_follow_up(self: &Rc<Self>, epoch: u64) {
        let message = {
            let mut random = self.random.borrow_mut();
            self.script
                .choose_follow_up(&mut **random)
                .map(str::to_string)
        };
        match message {
            Some(message) => self.deliver(epoch, message, false),
            None => self.state.borrow_mut().session.is_typing = false,
        }
        self.start_loop(epoch);
    }

    fn deliver(&self, epoch: u64, message: String, keep_typing: bool) {
        if !self.is_live(epoch) {
            return;
        }
        {
            let mut state = self.state.borrow_mut();
            state.session.messages.push(message);
            state.session.is_typing = keep_typing;
        }
        if let Err(e) = self.notifier.notify() {
            info!("Audio play failed: {}", e);
        }
        self.emit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::{SilentNotifier, SoundError};
    use crate::timing::random::{ScriptedRandom, SeededRandom};
    use crate::timing::scheduler::VirtualScheduler;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    struct CountingNotifier {
        plays: Cell<usize>,
        fail: bool,
    }

    impl Notifier for CountingNotifier {
        fn notify(&self) -> Result<(), SoundError> {
            self.plays.set(self.plays.get() + 1);
            if self.fail {
                Err(SoundError::Play("NotAllowedError".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn script(follow_up: &[&str]) -> ChatScript {
        let follow_up: Vec<String> = follow_up.iter().map(|s| format!("\"{}\"", s)).collect();
        ChatScript::from_json(&format!(
            r#"{{ "initial": ["hello", "how can I help?"], "followUp": [{}] }}"#,
            follow_up.join(",")
        ))
        .unwrap()
    }

    /// Every random draw returns its minimum: 25s loop wait, 2s typing,
    /// first follow-up.
    fn chat_with_min_random(scheduler: &Rc<VirtualScheduler>) -> ChatScheduler {
        ChatScheduler::new(
            script(&["A", "B"]),
            ChatTimings::default(),
            scheduler.clone(),
            Box::new(ScriptedRandom::new(vec![0.0])),
            Rc::new(SilentNotifier),
        )
    }

    #[test]
    fn opening_sequence_delivers_pair_on_schedule() {
        let scheduler = Rc::new(VirtualScheduler::new());
        let chat = chat_with_min_random(&scheduler);

        chat.open();
        let session = chat.snapshot();
        assert!(session.is_open);
        assert!(session.is_typing);
        assert!(session.messages.is_empty());

        scheduler.advance(1_499);
        assert!(chat.snapshot().messages.is_empty());

        scheduler.advance(1);
        assert_eq!(chat.snapshot().messages, vec!["hello".to_string()]);
        assert!(chat.snapshot().is_typing);

        scheduler.advance(2_500);
        let session = chat.snapshot();
        assert_eq!(session.messages, vec!["hello".to_string(), "how can I help?".to_string()]);
        assert!(!session.is_typing);
    }

    #[test]
    fn follow_ups_start_only_after_opening_pair() {
        let scheduler = Rc::new(VirtualScheduler::new());
        let chat = chat_with_min_random(&scheduler);
        chat.open();

        // Opening ends at 4s, loop waits 25s, typing 2s.
        scheduler.advance(28_999);
        assert_eq!(chat.snapshot().messages.len(), 2);
        assert!(!chat.snapshot().is_typing);

        scheduler.advance(1);
        assert!(chat.snapshot().is_typing);

        scheduler.advance(2_000);
        let session = chat.snapshot();
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.messages[2], "A");
        assert!(!session.is_typing);

        scheduler.advance(27_000);
        assert_eq!(chat.snapshot().messages.len(), 4);
    }

    #[test]
    fn close_mid_opening_stops_all_messages() {
        let scheduler = Rc::new(VirtualScheduler::new());
        let chat = chat_with_min_random(&scheduler);
        chat.open();

        scheduler.advance(2_000);
        assert_eq!(chat.snapshot().messages.len(), 1);

        chat.close();
        let session = chat.snapshot();
        assert!(!session.is_open);
        assert!(!session.is_typing);
        assert_eq!(scheduler.pending(chat.owner()), 0);

        scheduler.advance(24 * 60 * 60 * 1_000);
        assert_eq!(chat.snapshot().messages, vec!["hello".to_string()]);
    }

    #[test]
    fn reopen_with_history_skips_opening_pair() {
        let scheduler = Rc::new(VirtualScheduler::new());
        let chat = chat_with_min_random(&scheduler);
        chat.open();
        scheduler.advance(4_000);
        chat.close();

        chat.open();
        assert!(!chat.snapshot().is_typing);

        // 5s resume delay + 25s loop wait before typing starts.
        scheduler.advance(29_999);
        assert_eq!(chat.snapshot().messages.len(), 2);
        assert!(!chat.snapshot().is_typing);

        scheduler.advance(1);
        assert!(chat.snapshot().is_typing);

        scheduler.advance(2_000);
        let session = chat.snapshot();
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.messages[2], "A");
    }

    #[test]
    fn reopen_without_history_replays_opening() {
        let scheduler = Rc::new(VirtualScheduler::new());
        let chat = chat_with_min_random(&scheduler);
        chat.open();
        scheduler.advance(500);
        chat.close();

        // Nothing was delivered, so this is a fresh opening again.
        chat.open();
        scheduler.advance(4_000);
        assert_eq!(chat.snapshot().messages.len(), 2);
    }

    #[test]
    fn double_open_does_not_double_schedule() {
        let scheduler = Rc::new(VirtualScheduler::new());
        let chat = chat_with_min_random(&scheduler);

        chat.open();
        let pending = scheduler.pending(chat.owner());
        chat.open();
        chat.open();
        assert_eq!(scheduler.pending(chat.owner()), pending);

        scheduler.advance(4_000);
        assert_eq!(chat.snapshot().messages.len(), 2);
    }

    #[test]
    fn toggle_flips_visibility() {
        let scheduler = Rc::new(VirtualScheduler::new());
        let chat = chat_with_min_random(&scheduler);

        chat.toggle();
        assert!(chat.snapshot().is_open);
        chat.toggle();
        assert!(!chat.snapshot().is_open);
        assert_eq!(scheduler.pending(chat.owner()), 0);
    }

    #[test]
    fn close_while_typing_follow_up_drops_it() {
        let scheduler = Rc::new(VirtualScheduler::new());
        let chat = chat_with_min_random(&scheduler);
        chat.open();

        scheduler.advance(29_500);
        assert!(chat.snapshot().is_typing);
        chat.close();
        assert!(!chat.snapshot().is_typing);

        scheduler.advance(120_000);
        assert_eq!(chat.snapshot().messages.len(), 2);
    }

    #[test]
    fn sound_failures_are_swallowed() {
        let scheduler = Rc::new(VirtualScheduler::new());
        let notifier = Rc::new(CountingNotifier {
            plays: Cell::new(0),
            fail: true,
        });
        let chat = ChatScheduler::new(
            script(&["A"]),
            ChatTimings::default(),
            scheduler.clone(),
            Box::new(ScriptedRandom::new(vec![0.0])),
            notifier.clone(),
        );

        chat.open();
        scheduler.advance(31_000);
        assert_eq!(chat.snapshot().messages.len(), 3);
        assert_eq!(notifier.plays.get(), 3);
    }

    #[test]
    fn listener_sees_every_change() {
        let scheduler = Rc::new(VirtualScheduler::new());
        let chat = chat_with_min_random(&scheduler);
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = seen.clone();
            chat.set_listener(move |session| seen.borrow_mut().push(session.clone()));
        }

        chat.open();
        scheduler.advance(4_000);
        chat.close();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 4);
        assert!(seen[0].is_open && seen[0].is_typing);
        assert_eq!(seen[1].messages.len(), 1);
        assert_eq!(seen[2].messages.len(), 2);
        assert!(!seen[3].is_open);
    }

    #[test]
    fn shutdown_cancels_pending_timers() {
        let scheduler = Rc::new(VirtualScheduler::new());
        let chat = chat_with_min_random(&scheduler);
        chat.open();
        chat.shutdown();

        assert_eq!(scheduler.pending(chat.owner()), 0);
        scheduler.advance(60_000);
        assert!(chat.snapshot().messages.is_empty());
    }

    #[test]
    fn dropping_chat_cancels_its_timers() {
        let scheduler = Rc::new(VirtualScheduler::new());
        let chat = chat_with_min_random(&scheduler);
        chat.open();
        assert!(scheduler.total_pending() > 0);

        drop(chat);
        assert_eq!(scheduler.total_pending(), 0);
    }

    #[test]
    fn follow_up_choice_is_roughly_uniform() {
        let scheduler = Rc::new(VirtualScheduler::new());
        let chat = ChatScheduler::new(
            script(&["A", "B"]),
            ChatTimings::default(),
            scheduler.clone(),
            Box::new(SeededRandom::from_seed(2024)),
            Rc::new(SilentNotifier),
        );
        chat.open();

        // Each loop iteration takes at most 64s.
        scheduler.advance(70_000_000);
        let session = chat.snapshot();
        let follow_ups = &session.messages[2..];
        assert!(follow_ups.len() >= 1_000);

        let sample = &follow_ups[..1_000];
        let a = sample.iter().filter(|m| m.as_str() == "A").count();
        let b = sample.iter().filter(|m| m.as_str() == "B").count();
        assert_eq!(a + b, 1_000);
        assert!((450..=550).contains(&a), "A appeared {} times", a);
    }
}
