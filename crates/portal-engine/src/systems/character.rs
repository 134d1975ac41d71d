// systems/character.rs
//
// The guide character: entrance, idle, scripted motions and exit.
//
// One tagged state per character, advanced by `tick` once per rendered frame.
// Each frame runs the same pipeline: read state → eased progress → body pose
// → glow and shadow copies. Later steps read what earlier steps wrote.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::components::node::Node;
use crate::core::rng::RandomSource;
use crate::core::time::FrameTime;
use crate::extensions::easing::{ease_in_quad, ease_out_quad, falloff, lerp};

/// Timing and placement of the character's clips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterConfig {
    /// Hold before the emerge jump starts.
    pub emerge_delay: f32,
    /// Length of the emerge jump.
    pub emerge_duration: f32,
    /// Depth the character emerges from.
    pub emerge_from_z: f32,
    /// Resting spot in front of the portal.
    pub rest_position: Vec3,
    /// Length of the idle re-jump.
    pub jump_duration: f32,
    pub jump_height: f32,
    /// Full exit length.
    pub disappear_duration: f32,
    /// Depth the exit walks toward.
    pub disappear_to_z: f32,
    /// The horizontal re-centre finishes faster than the exit.
    pub recenter_duration: f32,
    /// Fraction of the scale lost by the end of the exit.
    pub shrink: f32,
    /// Height of the ground plane the shadow sits on.
    pub ground_y: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            emerge_delay: 0.1,
            emerge_duration: 0.6,
            emerge_from_z: -10.0,
            rest_position: Vec3::new(-4.0, 0.0, 3.5),
            jump_duration: 0.6,
            jump_height: 1.2,
            disappear_duration: 2.0,
            disappear_to_z: 15.0,
            recenter_duration: 1.0,
            shrink: 0.95,
            ground_y: -5.5,
        }
    }
}

/// The three entrance styles, picked at random on every expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmergeVariant {
    /// Parabolic hop out of the portal.
    JumpArc,
    /// Full turn around Z while floating.
    Spin,
    /// Side-to-side wiggle while floating.
    Wiggle,
}

impl EmergeVariant {
    pub const COUNT: u32 = 3;

    pub fn from_index(i: u32) -> Self {
        match i % Self::COUNT {
            0 => EmergeVariant::JumpArc,
            1 => EmergeVariant::Spin,
            _ => EmergeVariant::Wiggle,
        }
    }

    pub fn pick(rng: &mut dyn RandomSource) -> Self {
        Self::from_index(rng.next_int(Self::COUNT))
    }
}

/// Scripted gestures layered over the idle pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    /// Two quick nods on the X axis over 1s.
    Nod,
    /// One eased tilt back and return over 1.5s.
    LookUp,
}

impl Motion {
    pub fn duration(self) -> f32 {
        match self {
            Motion::Nod => 1.0,
            Motion::LookUp => 1.5,
        }
    }

    /// X rotation offset `elapsed` seconds into the motion.
    pub fn offset(self, elapsed: f32) -> f32 {
        match self {
            Motion::Nod => (elapsed * PI * 4.0).sin() * 0.15,
            Motion::LookUp => {
                let p = (elapsed / self.duration()).min(1.0);
                (p * PI).sin() * -0.25
            }
        }
    }
}

/// Which side of the character faces the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Front,
    Back,
}

/// Start stamp taken from the clock at the first frame that evaluates the clip.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Clip {
    started: Option<f32>,
}

impl Clip {
    pub fn pending() -> Self {
        Self { started: None }
    }

    fn elapsed(&mut self, now: f32) -> f32 {
        now - *self.started.get_or_insert(now)
    }

    pub fn started(&self) -> Option<f32> {
        self.started
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharacterState {
    Hidden,
    Emerging { variant: EmergeVariant, clip: Clip },
    /// Emerged and resting. `bounce` is a running re-jump.
    Idle { bounce: Option<Clip> },
    /// Exit clip. Holds its last pose once finished.
    Disappearing { clip: Clip },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveMotion {
    motion: Motion,
    clip: Clip,
}

/// Transform written onto one scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
    pub opacity: f32,
}

impl Pose {
    pub const HIDDEN: Pose = Pose {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: 0.0,
        opacity: 0.0,
    };

    pub fn apply_to(&self, node: &mut Node) {
        node.position = self.position;
        node.rotation = self.rotation;
        node.scale = self.scale;
        node.opacity = self.opacity;
    }
}

pub struct CharacterAnimator {
    config: CharacterConfig,
    state: CharacterState,
    motion: Option<ActiveMotion>,
    /// Collapse that arrived mid-entrance, applied once Idle is reached.
    pending_collapse: bool,
    body: Pose,
    glow: Pose,
    shadow: Pose,
    facing: Facing,
}

impl CharacterAnimator {
    pub fn new(config: CharacterConfig) -> Self {
        Self {
            config,
            state: CharacterState::Hidden,
            motion: None,
            pending_collapse: false,
            body: Pose::HIDDEN,
            glow: Pose::HIDDEN,
            shadow: Pose::HIDDEN,
            facing: Facing::Front,
        }
    }

    // -- External signals --

    /// The portal opened. Starts a fresh entrance from Hidden or from a
    /// (finished or running) exit; all transient flags are reset.
    pub fn expand(&mut self, rng: &mut dyn RandomSource) {
        match self.state {
            CharacterState::Hidden | CharacterState::Disappearing { .. } => {
                let variant = EmergeVariant::pick(rng);
                log::debug!("character: emerging ({:?})", variant);
                self.state = CharacterState::Emerging { variant, clip: Clip::pending() };
                self.motion = None;
                self.pending_collapse = false;
                self.facing = Facing::Front;
            }
            CharacterState::Emerging { .. } => {
                self.pending_collapse = false;
            }
            CharacterState::Idle { .. } => {}
        }
    }

    /// The portal is closing. Only an emerged character starts its exit;
    /// a collapse during the entrance waits for the entrance to finish.
    pub fn collapse(&mut self) {
        match self.state {
            CharacterState::Idle { .. } => self.begin_disappearing(),
            CharacterState::Emerging { .. } => {
                log::debug!("character: collapse deferred until emerged");
                self.pending_collapse = true;
            }
            CharacterState::Hidden | CharacterState::Disappearing { .. } => {}
        }
    }

    /// Restart the idle hop. Ignored unless Idle.
    pub fn trigger_jump(&mut self) {
        if let CharacterState::Idle { bounce } = &mut self.state {
            *bounce = Some(Clip::pending());
        }
    }

    /// Start a motion, pre-empting any running one.
    pub fn trigger_motion(&mut self, motion: Motion) {
        self.motion = Some(ActiveMotion { motion, clip: Clip::pending() });
    }

    fn begin_disappearing(&mut self) {
        log::debug!("character: disappearing");
        self.state = CharacterState::Disappearing { clip: Clip::pending() };
        self.motion = None;
        self.pending_collapse = false;
    }

    // -- Per-frame --

    pub fn tick(&mut self, time: &FrameTime) {
        let now = time.elapsed;
        let cfg = self.config;

        match self.state {
            CharacterState::Hidden => {
                self.body.scale = 0.0;
                self.body.opacity = 0.0;
            }
            CharacterState::Emerging { variant, mut clip } => {
                let elapsed = clip.elapsed(now);
                self.state = CharacterState::Emerging { variant, clip };
                self.tick_emerging(variant, elapsed, now);
            }
            CharacterState::Idle { mut bounce } => {
                let bounce_elapsed = bounce.as_mut().map(|c| c.elapsed(now));
                let bounce = match bounce_elapsed {
                    Some(e) if e < cfg.jump_duration => bounce,
                    _ => None,
                };
                self.state = CharacterState::Idle { bounce };
                self.tick_idle(bounce_elapsed.filter(|_| bounce.is_some()), now);
            }
            CharacterState::Disappearing { mut clip } => {
                let elapsed = clip.elapsed(now);
                self.state = CharacterState::Disappearing { clip };
                self.tick_disappearing(elapsed);
            }
        }

        self.sync_companions();
    }

    fn tick_emerging(&mut self, variant: EmergeVariant, elapsed: f32, now: f32) {
        let cfg = self.config;

        if elapsed < cfg.emerge_delay {
            // Waiting deep in the portal, invisible.
            self.body = Pose {
                position: Vec3::new(0.0, (now * 2.0).sin() * 0.1, -2.0),
                rotation: Vec3::ZERO,
                scale: 0.8,
                opacity: 0.0,
            };
            return;
        }

        let progress = ((elapsed - cfg.emerge_delay) / cfg.emerge_duration).min(1.0);
        let eased = ease_out_quad(progress);
        let rest = cfg.rest_position;

        let mut position = Vec3::new(
            lerp(0.0, rest.x, eased),
            0.0,
            lerp(cfg.emerge_from_z, rest.z, eased),
        );
        let mut rotation = Vec3::ZERO;
        let float = (now * 2.0).sin() * 0.3;

        match variant {
            EmergeVariant::JumpArc => {
                position.y = (progress * PI).sin() * cfg.jump_height;
            }
            EmergeVariant::Spin => {
                position.y = float;
                rotation.z = progress * TAU;
            }
            EmergeVariant::Wiggle => {
                position.y = float;
                position.x += (progress * PI * 3.0).sin() * 1.5;
            }
        }

        let opacity = self.body.opacity + (1.0 - self.body.opacity) * 0.1;
        self.body = Pose { position, rotation, scale: 1.0, opacity };

        if progress >= 1.0 {
            log::debug!("character: emerged");
            self.state = CharacterState::Idle { bounce: None };
            if self.pending_collapse {
                self.begin_disappearing();
            }
        }
    }

    fn tick_idle(&mut self, bounce_elapsed: Option<f32>, now: f32) {
        let cfg = self.config;

        let mut tilt = 0.0;
        if let Some(active) = &mut self.motion {
            let e = active.clip.elapsed(now);
            if e < active.motion.duration() {
                tilt = active.motion.offset(e);
            } else {
                self.motion = None;
            }
        }

        let hop = bounce_elapsed
            .map(|e| (e / cfg.jump_duration * PI).sin() * cfg.jump_height)
            .unwrap_or(0.0);

        self.body = Pose {
            position: Vec3::new(cfg.rest_position.x, hop, cfg.rest_position.z),
            rotation: Vec3::new(tilt, 0.0, 0.0),
            scale: 1.0,
            opacity: 1.0,
        };
    }

    fn tick_disappearing(&mut self, elapsed: f32) {
        let cfg = self.config;
        let progress = (elapsed / cfg.disappear_duration).min(1.0);
        let eased = ease_in_quad(progress);

        // Turn away (0 → π), walk, then turn back to face the camera (π → 2π).
        // The back texture shows while the character faces away.
        let (yaw, facing) = if progress < 0.25 {
            let t = progress / 0.25;
            (t * PI, if t > 0.5 { Facing::Back } else { Facing::Front })
        } else if progress < 0.75 {
            (PI, Facing::Back)
        } else {
            let t = (progress - 0.75) / 0.25;
            (PI + t * PI, if t < 0.5 { Facing::Back } else { Facing::Front })
        };

        let recenter = ease_out_quad((elapsed / cfg.recenter_duration).min(1.0));

        self.facing = facing;
        self.body = Pose {
            position: Vec3::new(
                lerp(cfg.rest_position.x, 0.0, recenter),
                0.0,
                lerp(cfg.rest_position.z, cfg.disappear_to_z, eased),
            ),
            rotation: Vec3::new(0.0, yaw, 0.0),
            scale: 1.0 - eased * cfg.shrink,
            // Stays visible: the character walks off small rather than fading.
            opacity: 1.0,
        };
    }

    /// Glow and ground shadow follow the body every frame.
    fn sync_companions(&mut self) {
        let body = self.body;

        self.glow = Pose {
            position: body.position - Vec3::new(0.0, 0.0, 0.01),
            rotation: body.rotation,
            scale: body.scale * 1.04,
            opacity: body.opacity * 0.5,
        };

        let ground = self.config.ground_y;
        let height = (body.position.y - ground).abs();
        self.shadow = Pose {
            position: Vec3::new(body.position.x, ground, body.position.z - 0.5),
            rotation: Vec3::new(-FRAC_PI_2, 0.0, 0.0),
            scale: body.scale * falloff(height, 1.2, 0.15, 0.6),
            opacity: falloff(height, 0.4, 0.08, 0.1) * body.opacity,
        };
    }

    // -- Read side --

    pub fn state(&self) -> CharacterState {
        self.state
    }

    pub fn pose(&self) -> &Pose {
        &self.body
    }

    pub fn glow(&self) -> &Pose {
        &self.glow
    }

    pub fn shadow(&self) -> &Pose {
        &self.shadow
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn active_motion(&self) -> Option<Motion> {
        self.motion.map(|m| m.motion)
    }

    pub fn has_emerged(&self) -> bool {
        matches!(self.state, CharacterState::Idle { .. })
    }

    pub fn is_disappearing(&self) -> bool {
        matches!(self.state, CharacterState::Disappearing { .. })
    }

    /// Whether the exit clip has run to its end (the pose is held).
    pub fn has_disappeared(&self, now: f32) -> bool {
        match self.state {
            CharacterState::Disappearing { clip } => clip
                .started()
                .is_some_and(|s| now - s >= self.config.disappear_duration),
            _ => false,
        }
    }

    /// Visible at all (drives the dialogue bubble's mount).
    pub fn is_visible(&self) -> bool {
        !matches!(self.state, CharacterState::Hidden)
    }

    /// Clicks on the character advance the dialogue only in this window.
    pub fn is_interactive(&self) -> bool {
        self.has_emerged()
    }

    pub fn config(&self) -> &CharacterConfig {
        &self.config
    }
}

impl Default for CharacterAnimator {
    fn default() -> Self {
        Self::new(CharacterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::SeqRandom;
    use crate::core::time::FrameClock;

    const FRAME: f32 = 0.016;

    fn emerged(variant: u32) -> (CharacterAnimator, FrameClock) {
        let mut c = CharacterAnimator::default();
        let mut clock = FrameClock::new(0.1);
        c.expand(&mut SeqRandom::new(vec![variant]));
        c.tick(&clock.now());
        while !c.has_emerged() {
            c.tick(&clock.advance(FRAME));
        }
        (c, clock)
    }

    #[test]
    fn starts_hidden_and_invisible() {
        let mut c = CharacterAnimator::default();
        c.tick(&FrameTime::default());
        assert_eq!(c.state(), CharacterState::Hidden);
        assert_eq!(c.pose().opacity, 0.0);
        assert_eq!(c.pose().scale, 0.0);
    }

    #[test]
    fn emerges_into_idle_with_rising_opacity() {
        for variant in 0..3 {
            let mut c = CharacterAnimator::default();
            let mut clock = FrameClock::new(0.1);
            c.expand(&mut SeqRandom::new(vec![variant]));
            c.tick(&clock.now());
            assert!(matches!(c.state(), CharacterState::Emerging { .. }));

            let mut last_opacity = c.pose().opacity;
            let mut idle_at = None;
            for _ in 0..120 {
                let t = clock.advance(FRAME);
                c.tick(&t);
                if c.has_emerged() {
                    idle_at = Some(t.elapsed);
                    break;
                }
                assert!(c.pose().opacity >= last_opacity);
                last_opacity = c.pose().opacity;
            }
            let idle_at = idle_at.expect("never emerged");
            assert!((0.6..=0.8).contains(&idle_at), "variant {} idle at {}", variant, idle_at);
        }
    }

    #[test]
    fn variant_is_chosen_by_the_injected_source() {
        let mut c = CharacterAnimator::default();
        c.expand(&mut SeqRandom::new(vec![1]));
        match c.state() {
            CharacterState::Emerging { variant, .. } => assert_eq!(variant, EmergeVariant::Spin),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn idle_holds_rest_pose() {
        let (mut c, mut clock) = emerged(0);
        c.tick(&clock.advance(FRAME));
        let body = *c.pose();
        assert_eq!(body.position, Vec3::new(-4.0, 0.0, 3.5));
        assert_eq!(body.scale, 1.0);
        assert_eq!(body.opacity, 1.0);
    }

    #[test]
    fn jump_bounces_then_lands() {
        let (mut c, mut clock) = emerged(2);
        c.trigger_jump();
        let mut peak: f32 = 0.0;
        for _ in 0..60 {
            c.tick(&clock.advance(FRAME));
            peak = peak.max(c.pose().position.y);
        }
        assert!(peak > 1.0);
        assert_eq!(c.pose().position.y, 0.0);
        assert!(c.has_emerged());
    }

    #[test]
    fn nod_runs_then_clears() {
        let (mut c, mut clock) = emerged(0);
        c.trigger_motion(Motion::Nod);
        c.tick(&clock.advance(FRAME));
        c.tick(&clock.advance(0.1));
        assert!(c.pose().rotation.x.abs() > 0.0);
        assert_eq!(c.active_motion(), Some(Motion::Nod));
        for _ in 0..70 {
            c.tick(&clock.advance(FRAME));
        }
        assert_eq!(c.active_motion(), None);
        assert_eq!(c.pose().rotation.x, 0.0);
    }

    #[test]
    fn look_up_tilts_back_then_returns() {
        let (mut c, mut clock) = emerged(0);
        c.trigger_motion(Motion::LookUp);
        c.tick(&clock.advance(FRAME));
        for _ in 0..46 {
            c.tick(&clock.advance(FRAME));
        }
        assert!(c.pose().rotation.x < -0.2);
        for _ in 0..60 {
            c.tick(&clock.advance(FRAME));
        }
        assert_eq!(c.active_motion(), None);
    }

    #[test]
    fn new_motion_preempts_running_one() {
        let (mut c, mut clock) = emerged(0);
        c.trigger_motion(Motion::LookUp);
        c.tick(&clock.advance(FRAME));
        c.trigger_motion(Motion::Nod);
        assert_eq!(c.active_motion(), Some(Motion::Nod));
    }

    #[test]
    fn back_texture_shows_in_middle_of_exit() {
        let (mut c, mut clock) = emerged(0);
        c.collapse();
        let start = clock.advance(FRAME);
        c.tick(&start);
        assert!(c.is_disappearing());

        for _ in 0..130 {
            let t = clock.advance(FRAME);
            c.tick(&t);
            let progress = (t.elapsed - start.elapsed) / 2.0;
            // Stay clear of the boundaries themselves.
            if progress > 0.13 && progress < 0.87 {
                assert_eq!(c.facing(), Facing::Back, "progress {}", progress);
            } else if progress < 0.12 || (progress > 0.88 && progress <= 1.0) {
                assert_eq!(c.facing(), Facing::Front, "progress {}", progress);
            }
        }
    }

    #[test]
    fn exit_shrinks_but_stays_opaque_and_holds() {
        let (mut c, mut clock) = emerged(0);
        c.collapse();
        for _ in 0..200 {
            c.tick(&clock.advance(FRAME));
            assert_eq!(c.pose().opacity, 1.0);
        }
        let body = *c.pose();
        assert!((body.scale - 0.05).abs() < 1e-4);
        assert!((body.position.z - 15.0).abs() < 1e-3);
        assert!(body.position.x.abs() < 1e-6);
        assert!((body.rotation.y - TAU).abs() < 1e-5);
        assert_eq!(c.facing(), Facing::Front);
        assert!(c.is_disappearing());
        assert!(c.has_disappeared(clock.now().elapsed));
    }

    #[test]
    fn collapse_during_entrance_is_deferred() {
        let mut c = CharacterAnimator::default();
        let mut clock = FrameClock::new(0.1);
        c.expand(&mut SeqRandom::new(vec![0]));
        c.tick(&clock.now());
        c.tick(&clock.advance(0.2));
        c.collapse();
        assert!(matches!(c.state(), CharacterState::Emerging { .. }));

        for _ in 0..60 {
            c.tick(&clock.advance(FRAME));
        }
        assert!(c.is_disappearing());
    }

    #[test]
    fn expand_cancels_deferred_collapse() {
        let mut c = CharacterAnimator::default();
        let mut clock = FrameClock::new(0.1);
        let mut rng = SeqRandom::new(vec![0]);
        c.expand(&mut rng);
        c.tick(&clock.now());
        c.collapse();
        c.expand(&mut rng);
        for _ in 0..60 {
            c.tick(&clock.advance(FRAME));
        }
        assert!(c.has_emerged());
    }

    #[test]
    fn expand_after_exit_restarts_entrance() {
        let (mut c, mut clock) = emerged(0);
        c.collapse();
        for _ in 0..150 {
            c.tick(&clock.advance(FRAME));
        }
        c.expand(&mut SeqRandom::new(vec![2]));
        assert!(matches!(c.state(), CharacterState::Emerging { variant: EmergeVariant::Wiggle, .. }));
        assert_eq!(c.facing(), Facing::Front);
    }

    #[test]
    fn collapse_when_hidden_is_ignored() {
        let mut c = CharacterAnimator::default();
        c.collapse();
        assert_eq!(c.state(), CharacterState::Hidden);
    }

    #[test]
    fn shadow_tracks_body_on_the_ground() {
        let (mut c, mut clock) = emerged(0);
        c.trigger_jump();
        c.tick(&clock.advance(FRAME));
        c.tick(&clock.advance(0.1));
        let body = *c.pose();
        let shadow = *c.shadow();
        assert_eq!(shadow.position.x, body.position.x);
        assert_eq!(shadow.position.y, -5.5);
        assert!((shadow.position.z - (body.position.z - 0.5)).abs() < 1e-6);

        let glow = *c.glow();
        assert!((glow.scale - body.scale * 1.04).abs() < 1e-6);
        assert!((glow.opacity - body.opacity * 0.5).abs() < 1e-6);

        // Higher body → smaller, fainter shadow.
        let high_opacity = shadow.opacity;
        for _ in 0..60 {
            c.tick(&clock.advance(FRAME));
        }
        assert!(c.shadow().opacity >= high_opacity);
    }
}
