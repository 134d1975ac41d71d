// systems/portal.rs
//
// Open/close choreography of the layered portal.
//
// Every multi-step sequence runs as delayed steps on a `TimerQueue`. Each step
// carries the generation current when it was scheduled; starting a new
// sequence bumps the generation, so steps left over from an older sequence
// find a mismatch and do nothing.

use serde::{Deserialize, Serialize};

use crate::core::timer::TimerQueue;

use super::guide::Farewell;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub layer_count: usize,
    /// Gap between consecutive layers unfolding.
    pub open_stagger: f32,
    /// Pause after the last layer before the portal counts as open.
    pub settle_delay: f32,
    /// Wait before the first layer folds; covers the character's exit.
    pub close_delay: f32,
    /// Gap between consecutive layers folding, shorter than opening.
    pub close_stagger: f32,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            layer_count: 10,
            open_stagger: 0.12,
            settle_delay: 0.3,
            close_delay: 2.0,
            close_stagger: 0.08,
        }
    }
}

/// Notifications for the rest of the scene, drained once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalSignal {
    /// An open started; the character should emerge.
    Expand,
    /// A close started; the character should leave.
    Collapse,
    /// Every layer is unfolded.
    Opened,
    /// Every layer is folded again.
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepKind {
    UnfoldLayer(usize),
    FinishOpen,
    FoldLayer(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PortalStep {
    generation: u32,
    kind: StepKind,
}

pub struct PortalSequencer {
    config: PortalConfig,
    generation: u32,
    layers: Vec<bool>,
    is_expanded: bool,
    is_animating: bool,
    is_closing: bool,
    steps: TimerQueue<PortalStep>,
    signals: Vec<PortalSignal>,
}

impl PortalSequencer {
    pub fn new(config: PortalConfig) -> Self {
        Self {
            config,
            generation: 0,
            layers: vec![false; config.layer_count],
            is_expanded: false,
            is_animating: false,
            is_closing: false,
            steps: TimerQueue::new(),
            signals: Vec::new(),
        }
    }

    /// Start unfolding the layers one by one. Rejected while a sequence is
    /// running or when already open.
    pub fn open(&mut self, now: f32) -> bool {
        if self.is_animating || self.is_closing || self.is_expanded {
            log::debug!(
                "portal: open rejected (animating: {}, closing: {}, expanded: {})",
                self.is_animating,
                self.is_closing,
                self.is_expanded
            );
            return false;
        }

        self.generation = self.generation.wrapping_add(1);
        self.is_animating = true;
        self.layers.iter_mut().for_each(|l| *l = false);
        self.signals.push(PortalSignal::Expand);
        log::info!("portal: opening (generation {})", self.generation);

        let stagger = self.config.open_stagger;
        for i in 0..self.layers.len() {
            self.schedule(now, i as f32 * stagger, StepKind::UnfoldLayer(i));
        }
        let last = self.layers.len().saturating_sub(1) as f32 * stagger;
        self.schedule(now, last + self.config.settle_delay, StepKind::FinishOpen);
        true
    }

    /// Close through the farewell when one is available, else immediately.
    /// The farewell ends in a close request that calls `execute_close`.
    pub fn request_close(&mut self, now: f32, farewell: Option<&mut dyn Farewell>) {
        if self.is_closing {
            return;
        }
        let farewell_started = farewell.is_some_and(|f| f.say_goodbye());
        if !farewell_started {
            self.execute_close(now);
        }
    }

    /// Fold the portal: the character leaves first, then the layers fold in
    /// reverse order. Supersedes a running open.
    pub fn execute_close(&mut self, now: f32) -> bool {
        let anything_open = self.is_expanded || self.is_animating || self.layers.iter().any(|l| *l);
        if self.is_closing || !anything_open {
            log::debug!("portal: close rejected (closing: {}, open: {})", self.is_closing, anything_open);
            return false;
        }

        self.generation = self.generation.wrapping_add(1);
        self.is_closing = true;
        self.is_animating = true;
        self.is_expanded = false;
        self.signals.push(PortalSignal::Collapse);
        log::info!("portal: closing (generation {})", self.generation);

        let n = self.layers.len();
        for (k, i) in (0..n).rev().enumerate() {
            let delay = self.config.close_delay + k as f32 * self.config.close_stagger;
            self.schedule(now, delay, StepKind::FoldLayer(i));
        }
        if n == 0 {
            self.finish_close();
        }
        true
    }

    fn schedule(&mut self, now: f32, delay: f32, kind: StepKind) {
        let step = PortalStep { generation: self.generation, kind };
        self.steps.schedule(now, delay, step);
    }

    /// Run every step due at `now`.
    pub fn tick(&mut self, now: f32) {
        for step in self.steps.drain_due(now) {
            if step.generation != self.generation {
                log::debug!("portal: stale {:?} from generation {} skipped", step.kind, step.generation);
                continue;
            }
            match step.kind {
                StepKind::UnfoldLayer(i) => self.set_layer(i, true),
                StepKind::FinishOpen => {
                    self.is_expanded = true;
                    self.is_animating = false;
                    self.signals.push(PortalSignal::Opened);
                    log::info!("portal: open");
                }
                StepKind::FoldLayer(i) => {
                    self.set_layer(i, false);
                    if i == 0 {
                        self.finish_close();
                    }
                }
            }
        }
    }

    fn set_layer(&mut self, i: usize, expanded: bool) {
        if let Some(layer) = self.layers.get_mut(i) {
            *layer = expanded;
        }
    }

    fn finish_close(&mut self) {
        self.is_animating = false;
        self.is_closing = false;
        self.signals.push(PortalSignal::Closed);
        log::info!("portal: closed");
    }

    pub fn drain_signals(&mut self) -> Vec<PortalSignal> {
        std::mem::take(&mut self.signals)
    }

    /// Drop every pending step. The scene is going away.
    pub fn teardown(&mut self) {
        self.steps.clear();
        self.signals.clear();
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_expanded(&self) -> bool {
        self.is_expanded
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    pub fn is_closing(&self) -> bool {
        self.is_closing
    }

    /// The portal surface takes no clicks while closing.
    pub fn is_interactive(&self) -> bool {
        !self.is_closing
    }

    pub fn layer_expanded(&self, i: usize) -> bool {
        self.layers.get(i).copied().unwrap_or(false)
    }

    pub fn layers(&self) -> &[bool] {
        &self.layers
    }

    pub fn pending_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }
}

impl Default for PortalSequencer {
    fn default() -> Self {
        Self::new(PortalConfig::default())
    }
}
