// systems/guide.rs
//
// The guide character's conversation: click-to-advance, per-line effects and
// the farewell sequence that ends in a close request.

use crate::core::timer::TimerQueue;
use crate::extensions::throttle::Throttle;

use super::character::{CharacterAnimator, Motion};
use super::dialogue::{DialogueLine, DialogueSequencer, GOODBYE_ID};
use super::guide_channel::GuideChannel;

/// Line action that asks the portal to close once the line has been read.
pub const CLOSE_PORTAL: &str = "close_portal";

/// Something that can run a farewell before the portal closes.
/// Its completion is reported back as a close request.
pub trait Farewell {
    /// Returns false when no farewell will follow and the caller should
    /// close directly.
    fn say_goodbye(&mut self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideConfig {
    /// Minimum spacing between honoured clicks.
    pub click_interval: f32,
    /// Reading time on a `close_portal` line before the close request.
    pub close_delay: f32,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            click_interval: 0.3,
            close_delay: 1.5,
        }
    }
}

pub struct GuideController {
    config: GuideConfig,
    dialogue: DialogueSequencer,
    channel: GuideChannel,
    throttle: Throttle,
    /// Held from `say_goodbye` until the next open. Clicks are ignored meanwhile.
    goodbye_lock: bool,
    /// Bumped on every line change. A scheduled close only fires while unchanged.
    line_serial: u32,
    /// The current line's effects have not run yet (waiting for the character).
    effects_pending: bool,
    queued_motion: Option<Motion>,
    close_timer: TimerQueue<u32>,
    close_requested: bool,
}

impl GuideController {
    /// `None` when the script is empty.
    pub fn new(lines: Vec<DialogueLine>, channel: GuideChannel, config: GuideConfig) -> Option<Self> {
        let dialogue = DialogueSequencer::new(lines)?;
        Some(Self {
            config,
            dialogue,
            channel,
            throttle: Throttle::new(config.click_interval),
            goodbye_lock: false,
            line_serial: 0,
            effects_pending: true,
            queued_motion: None,
            close_timer: TimerQueue::new(),
            close_requested: false,
        })
    }

    /// The portal opened: back to the first line, farewell lock released.
    pub fn on_open(&mut self) {
        self.goodbye_lock = false;
        self.dialogue.reset();
        self.line_changed();
    }

    /// Click on the character or its bubble. Returns true when the dialogue
    /// advanced.
    pub fn click(&mut self, now: f32, portal_closing: bool, character: &mut CharacterAnimator) -> bool {
        if !self.throttle.try_fire(now) {
            return false;
        }
        if portal_closing || self.goodbye_lock {
            log::debug!("guide: click ignored (closing: {}, farewell: {})", portal_closing, self.goodbye_lock);
            return false;
        }
        character.trigger_jump();
        self.dialogue.next();
        self.line_changed();
        true
    }

    fn line_changed(&mut self) {
        self.line_serial = self.line_serial.wrapping_add(1);
        self.effects_pending = true;
    }

    /// Per frame: run the current line's effects once the character has
    /// emerged, and fire a due close request.
    pub fn tick(&mut self, now: f32, character: &mut CharacterAnimator) {
        if let Some(motion) = self.queued_motion.take() {
            character.trigger_motion(motion);
        }

        if self.effects_pending && character.has_emerged() {
            self.effects_pending = false;
            self.run_line_effects(now, character);
        }

        for serial in self.close_timer.drain_due(now) {
            if serial == self.line_serial {
                log::info!("guide: farewell line read, requesting close");
                self.close_requested = true;
            } else {
                log::debug!("guide: stale close request dropped");
            }
        }
    }

    fn run_line_effects(&mut self, now: f32, character: &mut CharacterAnimator) {
        let line = self.dialogue.current();

        if line.action.as_deref() == Some(CLOSE_PORTAL) {
            self.close_timer.schedule(now, self.config.close_delay, self.line_serial);
            return;
        }

        self.channel.publish(line.action.as_deref());
        if let Some(motion) = line.motion {
            character.trigger_motion(motion);
        }
    }

    /// Drain the close request raised by a read `close_portal` line.
    pub fn take_close_request(&mut self) -> bool {
        std::mem::take(&mut self.close_requested)
    }

    pub fn teardown(&mut self) {
        self.close_timer.clear();
        self.close_requested = false;
        self.queued_motion = None;
    }

    pub fn current(&self) -> &DialogueLine {
        self.dialogue.current()
    }

    pub fn dialogue(&self) -> &DialogueSequencer {
        &self.dialogue
    }

    /// Whether the bubble shows its "next" hint.
    pub fn shows_next_hint(&self) -> bool {
        !self.dialogue.is_terminal()
    }

    pub fn is_farewell_locked(&self) -> bool {
        self.goodbye_lock
    }

    pub fn channel(&self) -> &GuideChannel {
        &self.channel
    }
}

impl Farewell for GuideController {
    fn say_goodbye(&mut self) -> bool {
        if self.goodbye_lock || self.dialogue.current().id == GOODBYE_ID {
            return true;
        }
        if !self.dialogue.jump_to(GOODBYE_ID) {
            log::warn!("guide: script has no '{}' line", GOODBYE_ID);
            return false;
        }
        self.goodbye_lock = true;
        self.line_changed();
        self.queued_motion = Some(Motion::Nod);
        true
    }
}
