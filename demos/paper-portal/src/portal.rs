//! Paper portal scene - thin controller layer.
//!
//! A click on the stacked paper sheets opens the portal; the guide character
//! emerges and talks through its script. The close button goes through the
//! guide's farewell when the guide is out, otherwise the portal folds
//! straight away.

use glam::{Vec2, Vec3};
use portal_engine::input::queue::{InputEvent, InputQueue};
use portal_engine::{
    CharacterAnimator, DialogueLine, DialogueScript, Facing, Farewell, GuideConfig, GuideController,
    LayerConfig, NavHighlight, Node, NodeId, PaperLayer, PortalConfig, PortalSequencer, PortalSignal,
    Scene, SceneConfig, SceneContext, SceneEvent, SceneManifest, TextureId, Tilt, TiltConfig,
};

const BUNDLED_SCRIPT: &str = include_str!("../assets/guide.json");

/// Custom event kinds from the page.
mod events {
    /// The close button was pressed.
    pub const CLOSE_BUTTON: u32 = 1;
    /// The speech bubble was clicked.
    pub const BUBBLE_CLICK: u32 = 2;
}

/// Scene event kinds to the page.
mod scene_events {
    /// a: expanded, b: animating, c: closing (1.0 / 0.0).
    pub const PORTAL_STATE: u32 = 1;
    /// a: line index, b: 1.0 when the "next" hint shows.
    pub const DIALOGUE_CHANGED: u32 = 2;
    /// a: 1.0 when the character and bubble are on screen.
    pub const CHARACTER_VISIBLE: u32 = 3;
    /// a: 1.0 while the nav bar should glow.
    pub const NAV_HIGHLIGHT: u32 = 4;
}

/// Rim sits just in front of its sheet.
const NEON_OFFSET: f32 = 0.21;

fn spawn_hidden(ctx: &mut SceneContext, tag: &str) -> NodeId {
    let id = ctx.next_id();
    let mut node = Node::new(id).with_tag(tag).with_scale(0.0).with_opacity(0.0);
    node.active = false;
    ctx.nodes.spawn(node);
    id
}

struct CharacterNodes {
    body: NodeId,
    glow: NodeId,
    shadow: NodeId,
}

/// Last values reported to the page, to emit only on change.
#[derive(Default)]
struct Reported {
    portal: Option<(bool, bool, bool)>,
    line: Option<usize>,
    visible: Option<bool>,
    nav: Option<bool>,
}

pub struct PaperPortal {
    portal_config: PortalConfig,
    sequencer: PortalSequencer,
    layers: Vec<PaperLayer>,
    layer_nodes: Vec<NodeId>,
    neon_nodes: Vec<NodeId>,
    character: CharacterAnimator,
    character_nodes: Option<CharacterNodes>,
    tilt: Tilt,
    pointer: Vec2,
    script: Vec<DialogueLine>,
    guide: Option<GuideController>,
    nav: Option<NavHighlight>,
    front: Option<TextureId>,
    back: Option<TextureId>,
    reported: Reported,
}

fn bundled_script() -> Vec<DialogueLine> {
    match DialogueScript::from_json(BUNDLED_SCRIPT) {
        Ok(script) => script.dialogues,
        Err(e) => {
            log::error!("paper-portal: bundled script unreadable: {}", e);
            Vec::new()
        }
    }
}

impl PaperPortal {
    pub fn new() -> Self {
        let script = bundled_script();
        let portal_config = PortalConfig::default();

        Self {
            portal_config,
            sequencer: PortalSequencer::new(portal_config),
            layers: Vec::new(),
            layer_nodes: Vec::new(),
            neon_nodes: Vec::new(),
            character: CharacterAnimator::default(),
            character_nodes: None,
            tilt: Tilt::new(TiltConfig::default()),
            pointer: Vec2::ZERO,
            script,
            guide: None,
            nav: None,
            front: None,
            back: None,
            reported: Reported::default(),
        }
    }

    fn is_layer(&self, node: NodeId) -> bool {
        self.layer_nodes.contains(&node) || self.neon_nodes.contains(&node)
    }

    fn is_character(&self, node: NodeId) -> bool {
        self.character_nodes
            .as_ref()
            .is_some_and(|c| c.body == node || c.glow == node)
    }

    fn handle_input(&mut self, input: &InputQueue, now: f32) {
        for event in input.iter() {
            match *event {
                InputEvent::PointerNormalized { x, y } => self.pointer = Vec2::new(x, y),
                InputEvent::PointerLeave => self.pointer = Vec2::ZERO,
                InputEvent::NodeClick { node } if self.is_layer(node) => {
                    if self.sequencer.is_interactive() {
                        self.sequencer.open(now);
                    }
                }
                InputEvent::NodeClick { node } if self.is_character(node) => self.click_guide(now),
                InputEvent::Custom { kind, .. } => match kind {
                    events::CLOSE_BUTTON => self.close(now),
                    events::BUBBLE_CLICK => self.click_guide(now),
                    other => log::debug!("paper-portal: unknown custom event {}", other),
                },
                _ => {}
            }
        }
    }

    fn click_guide(&mut self, now: f32) {
        if !self.character.is_interactive() {
            return;
        }
        if let Some(guide) = &mut self.guide {
            guide.click(now, self.sequencer.is_closing(), &mut self.character);
        }
    }

    fn close(&mut self, now: f32) {
        let farewell = match &mut self.guide {
            Some(guide) if self.character.has_emerged() => Some(guide as &mut dyn Farewell),
            _ => None,
        };
        self.sequencer.request_close(now, farewell);
    }

    fn apply_signals(&mut self, ctx: &mut SceneContext) {
        for signal in self.sequencer.drain_signals() {
            match signal {
                PortalSignal::Expand => {
                    self.character.expand(&mut ctx.rng);
                    if let Some(guide) = &mut self.guide {
                        guide.on_open();
                    }
                }
                PortalSignal::Collapse => self.character.collapse(),
                PortalSignal::Opened | PortalSignal::Closed => {
                    log::debug!("paper-portal: {:?}", signal);
                }
            }
        }
    }

    fn write_nodes(&self, ctx: &mut SceneContext, tilt: Vec2) {
        let interactive = self.sequencer.is_interactive();

        for (layer, &id) in self.layers.iter().zip(&self.layer_nodes) {
            let Some(node) = ctx.nodes.get_mut(id) else { continue };
            layer.apply_to(node);
            node.interactive = interactive;
        }

        for (layer, &id) in self.layers.iter().zip(&self.neon_nodes) {
            let Some(node) = ctx.nodes.get_mut(id) else { continue };
            layer.apply_to(node);
            node.position.z += NEON_OFFSET;
            node.active = layer.neon_visible();
            node.interactive = interactive && node.active;
        }

        let Some(ids) = &self.character_nodes else { return };
        let texture = match self.character.facing() {
            Facing::Front => self.front,
            Facing::Back => self.back.or(self.front),
        };
        let tilt = Vec3::new(tilt.x, tilt.y, 0.0);
        let visible = self.character.is_visible();

        if let Some(node) = ctx.nodes.get_mut(ids.body) {
            self.character.pose().apply_to(node);
            node.rotation += tilt;
            node.texture = texture;
            node.active = visible;
            node.interactive = self.character.is_interactive();
        }
        if let Some(node) = ctx.nodes.get_mut(ids.glow) {
            self.character.glow().apply_to(node);
            node.rotation += tilt;
            node.texture = texture;
            node.active = visible;
            node.interactive = self.character.is_interactive();
        }
        if let Some(node) = ctx.nodes.get_mut(ids.shadow) {
            self.character.shadow().apply_to(node);
            node.active = visible;
        }
    }

    fn emit_changes(&mut self, ctx: &mut SceneContext) {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };

        let portal = (
            self.sequencer.is_expanded(),
            self.sequencer.is_animating(),
            self.sequencer.is_closing(),
        );
        if self.reported.portal != Some(portal) {
            self.reported.portal = Some(portal);
            ctx.emit_event(SceneEvent::new(
                scene_events::PORTAL_STATE,
                flag(portal.0),
                flag(portal.1),
                flag(portal.2),
            ));
        }

        let line = self.guide.as_ref().map(|g| g.dialogue().index());
        if let Some(index) = line.filter(|_| self.reported.line != line) {
            self.reported.line = line;
            ctx.emit_event(SceneEvent::new(
                scene_events::DIALOGUE_CHANGED,
                index as f32,
                flag(self.shows_next_hint()),
                0.0,
            ));
        }

        let visible = self.character_visible_at(ctx.time.elapsed);
        if self.reported.visible != Some(visible) {
            self.reported.visible = Some(visible);
            ctx.emit_event(SceneEvent::new(scene_events::CHARACTER_VISIBLE, flag(visible), 0.0, 0.0));
        }

        if let Some(nav) = &self.nav {
            let glowing = nav.is_glowing();
            if self.reported.nav != Some(glowing) {
                self.reported.nav = Some(glowing);
                ctx.emit_event(SceneEvent::new(scene_events::NAV_HIGHLIGHT, flag(glowing), 0.0, 0.0));
            }
        }
    }

    fn character_visible_at(&self, now: f32) -> bool {
        self.character.is_visible() && !self.character.has_disappeared(now)
    }

    // -- Read side for the page --

    /// Current dialogue line text, empty without a script.
    pub fn dialogue_text(&self) -> &str {
        self.guide.as_ref().map_or("", |g| g.current().text.as_str())
    }

    pub fn shows_next_hint(&self) -> bool {
        self.guide.as_ref().is_some_and(|g| g.shows_next_hint())
    }

    /// Whether the character and its bubble are on screen.
    pub fn character_visible(&self) -> bool {
        self.reported.visible.unwrap_or(false)
    }

    pub fn sequencer(&self) -> &PortalSequencer {
        &self.sequencer
    }

    pub fn character(&self) -> &CharacterAnimator {
        &self.character
    }

    pub fn guide(&self) -> Option<&GuideController> {
        self.guide.as_ref()
    }
}

impl Default for PaperPortal {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for PaperPortal {
    fn config(&self) -> SceneConfig {
        SceneConfig {
            max_instances: 2 * self.portal_config.layer_count + 3,
            ..SceneConfig::default()
        }
    }

    /// Every manifest starts from the defaults; a reload never inherits the
    /// previous manifest's overrides.
    fn configure(&mut self, manifest: &SceneManifest) {
        self.portal_config = manifest.portal.unwrap_or_default();
        self.sequencer = PortalSequencer::new(self.portal_config);
        self.script = if manifest.dialogues.is_empty() {
            bundled_script()
        } else {
            manifest.dialogues.clone()
        };
    }

    fn init(&mut self, ctx: &mut SceneContext) {
        self.front = ctx.textures.get("front");
        self.back = ctx.textures.get("back");
        if self.front.is_none() {
            log::warn!("paper-portal: no 'front' texture, character drawn untextured");
        }

        // init also runs on a restart; start from a closed portal.
        self.sequencer = PortalSequencer::new(self.portal_config);
        self.character = CharacterAnimator::default();
        self.tilt = Tilt::new(TiltConfig::default());
        self.pointer = Vec2::ZERO;
        self.reported = Reported::default();

        self.layers = PaperLayer::stack(self.portal_config.layer_count, LayerConfig::default());
        self.layer_nodes.clear();
        self.neon_nodes.clear();
        for layer in &self.layers {
            let id = ctx.next_id();
            ctx.nodes.spawn(
                Node::new(id)
                    .with_tag(format!("layer:{}", layer.index()))
                    .with_position(Vec3::new(0.0, 0.0, layer.base_z()))
                    .interactive(),
            );
            self.layer_nodes.push(id);

            let id = ctx.next_id();
            let mut neon = Node::new(id)
                .with_tag(format!("neon:{}", layer.index()))
                .with_position(Vec3::new(0.0, 0.0, layer.base_z() + NEON_OFFSET));
            neon.active = false;
            ctx.nodes.spawn(neon);
            self.neon_nodes.push(id);
        }

        self.character_nodes = Some(CharacterNodes {
            body: spawn_hidden(ctx, "character"),
            glow: spawn_hidden(ctx, "character:glow"),
            shadow: spawn_hidden(ctx, "character:shadow"),
        });

        self.guide = GuideController::new(self.script.clone(), ctx.guide.clone(), GuideConfig::default());
        if self.guide.is_none() {
            log::warn!("paper-portal: empty dialogue script, guide disabled");
        }
        self.nav = Some(NavHighlight::attach(&ctx.guide));

        log::info!(
            "paper-portal: {} layers, {} dialogue lines",
            self.layers.len(),
            self.script.len()
        );
    }

    fn update(&mut self, ctx: &mut SceneContext, input: &InputQueue) {
        let time = ctx.time;
        let now = time.elapsed;

        self.handle_input(input, now);
        self.sequencer.tick(now);

        if let Some(guide) = &mut self.guide {
            guide.tick(now, &mut self.character);
            if guide.take_close_request() {
                self.sequencer.execute_close(now);
            }
        }

        self.apply_signals(ctx);
        self.character.tick(&time);
        let tilt = self.tilt.tick(self.pointer, self.character.is_interactive());
        for (i, layer) in self.layers.iter_mut().enumerate() {
            layer.tick(&time, self.sequencer.layer_expanded(i));
        }

        self.write_nodes(ctx, tilt);
        self.emit_changes(ctx);
    }

    fn teardown(&mut self, _ctx: &mut SceneContext) {
        self.sequencer.teardown();
        if let Some(guide) = &mut self.guide {
            guide.teardown();
        }
        self.nav = None;
        log::info!("paper-portal: torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_engine::{CharacterState, FrameClock, GOODBYE_ID};
    use portal_web::SceneRunner;

    const FRAME: f32 = 0.016;

    struct Rig {
        scene: PaperPortal,
        ctx: SceneContext,
        clock: FrameClock,
        input: InputQueue,
        events: Vec<SceneEvent>,
    }

    impl Rig {
        fn new() -> Self {
            let mut scene = PaperPortal::new();
            let mut ctx = SceneContext::new();
            scene.init(&mut ctx);
            Rig {
                scene,
                ctx,
                clock: FrameClock::new(0.1),
                input: InputQueue::new(),
                events: Vec::new(),
            }
        }

        fn frame(&mut self) {
            self.ctx.clear_frame_data();
            self.ctx.time = self.clock.advance(FRAME);
            self.scene.update(&mut self.ctx, &self.input);
            self.input.drain();
            self.events.extend(self.ctx.events.iter().copied());
        }

        fn run(&mut self, seconds: f32) {
            let frames = (seconds / FRAME).ceil() as usize;
            for _ in 0..frames {
                self.frame();
            }
        }

        fn push(&mut self, event: InputEvent) {
            self.input.push(event);
            self.frame();
        }

        fn click_layer(&mut self, i: usize) {
            let node = self.scene.layer_nodes[i];
            self.push(InputEvent::NodeClick { node });
        }

        fn click_character(&mut self) {
            let node = self.scene.character_nodes.as_ref().map(|c| c.body).unwrap();
            self.push(InputEvent::NodeClick { node });
        }

        fn custom(&mut self, kind: u32) {
            self.push(InputEvent::Custom { kind, a: 0.0, b: 0.0, c: 0.0 });
        }

        fn opened() -> Self {
            let mut rig = Rig::new();
            rig.click_layer(0);
            rig.run(2.5);
            rig
        }

        fn node(&self, id: NodeId) -> &Node {
            self.ctx.nodes.get(id).unwrap()
        }

        fn saw(&self, kind: u32, a: f32) -> bool {
            self.events.iter().any(|e| e.kind == kind as f32 && e.a == a)
        }
    }

    #[test]
    fn bundled_script_loads() {
        let scene = PaperPortal::new();
        assert_eq!(scene.script.len(), 6);
        assert_eq!(scene.script.last().map(|l| l.id.as_str()), Some(GOODBYE_ID));
    }

    #[test]
    fn spawns_layers_rims_and_character() {
        let rig = Rig::new();
        assert_eq!(rig.scene.layer_nodes.len(), 10);
        assert_eq!(rig.scene.neon_nodes.len(), 10);
        assert_eq!(rig.ctx.nodes.len(), 23);
        assert!(rig.scene.neon_nodes.iter().all(|&id| !rig.node(id).active));
    }

    #[test]
    fn layer_click_opens_and_character_emerges() {
        let mut rig = Rig::opened();

        assert!(rig.scene.sequencer().is_expanded());
        assert!(rig.scene.character().has_emerged());
        assert!(rig.scene.character_visible());
        assert!(rig.scene.neon_nodes.iter().all(|&id| rig.node(id).active));
        assert!(rig.scene.dialogue_text().starts_with("Oh! You found the portal."));
        assert!(rig.saw(scene_events::PORTAL_STATE, 1.0));
        assert!(rig.saw(scene_events::CHARACTER_VISIBLE, 1.0));
    }

    #[test]
    fn character_click_advances_dialogue() {
        let mut rig = Rig::opened();
        rig.click_character();
        assert_eq!(rig.scene.guide().map(|g| g.dialogue().index()), Some(1));
        assert!(rig.saw(scene_events::DIALOGUE_CHANGED, 1.0));

        // The bubble advances too, once the throttle allows it.
        rig.run(0.4);
        rig.custom(events::BUBBLE_CLICK);
        rig.run(0.1);
        assert_eq!(rig.scene.guide().map(|g| g.current().id.as_str()), Some("menu"));
        assert!(rig.saw(scene_events::NAV_HIGHLIGHT, 1.0));
    }

    #[test]
    fn close_button_runs_farewell_then_folds() {
        let mut rig = Rig::opened();
        rig.custom(events::CLOSE_BUTTON);

        let guide = rig.scene.guide().unwrap();
        assert_eq!(guide.current().id, GOODBYE_ID);
        assert!(!rig.scene.shows_next_hint());
        assert!(!rig.scene.sequencer().is_closing());

        rig.run(1.7);
        assert!(rig.scene.sequencer().is_closing());
        assert!(rig.scene.character().is_disappearing());
        assert!(rig.scene.layer_nodes.iter().all(|&id| !rig.node(id).interactive));

        rig.run(3.0);
        assert!(!rig.scene.sequencer().is_closing());
        assert!(!rig.scene.sequencer().is_expanded());
        assert!(!rig.scene.character_visible());
        assert!(rig.saw(scene_events::CHARACTER_VISIBLE, 0.0));
    }

    #[test]
    fn close_before_emergence_folds_directly() {
        let mut rig = Rig::new();
        rig.click_layer(3);
        rig.run(0.2);
        assert!(!rig.scene.character().has_emerged());

        rig.custom(events::CLOSE_BUTTON);
        assert!(rig.scene.sequencer().is_closing());
        assert_eq!(rig.scene.guide().map(|g| g.dialogue().index()), Some(0));

        // The entrance finishes before the character leaves.
        rig.run(1.0);
        assert!(matches!(
            rig.scene.character().state(),
            CharacterState::Disappearing { .. }
        ));
    }

    #[test]
    fn layer_clicks_ignored_while_closing() {
        let mut rig = Rig::opened();
        rig.scene.sequencer.execute_close(rig.clock.now().elapsed);
        let generation = rig.scene.sequencer().generation();
        rig.click_layer(0);
        assert_eq!(rig.scene.sequencer().generation(), generation);
    }

    #[test]
    fn reloaded_manifest_starts_from_defaults() {
        let mut runner = SceneRunner::new(PaperPortal::new());
        let custom = r#"{ "dialogues": [ { "id": "x", "text": "custom" } ],
                          "portal": { "layer_count": 3 } }"#;
        assert!(runner.load_manifest(custom));
        runner.init();
        assert_eq!(runner.scene().dialogue_text(), "custom");
        assert_eq!(runner.scene().layers.len(), 3);

        assert!(runner.load_manifest("{}"));
        assert_eq!(runner.scene().layers.len(), 10);
        assert_eq!(runner.scene().sequencer().config().layer_count, 10);
        assert!(runner.scene().dialogue_text().starts_with("Oh! You found the portal."));
    }

    #[test]
    fn capacity_covers_manifest_layer_count() {
        let mut runner = SceneRunner::new(PaperPortal::new());
        assert!(runner.load_manifest(r#"{ "portal": { "layer_count": 20 } }"#));
        runner.init();
        runner.tick(0.016);
        assert_eq!(runner.context().nodes.len(), 43);
        assert_eq!(runner.max_instances(), 43);
        assert!(runner.instance_count() <= runner.max_instances());
    }

    #[test]
    fn teardown_drops_pending_steps() {
        let mut rig = Rig::new();
        rig.click_layer(0);
        rig.scene.teardown(&mut rig.ctx);
        assert_eq!(rig.scene.sequencer().pending_steps(), 0);
        assert_eq!(rig.ctx.guide.subscriber_count(), 0);
    }
}
