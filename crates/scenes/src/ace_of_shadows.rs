//! Ace of Shadows: cards travelling between stacks.

use crate::config::ShowcaseConfig;
use crate::scene::{Scene, SceneContext};
use common::color::Color;
use common::geometry::{Point, Rect, Size};
use compositor::{AnimationController, Easing, FrameClock, LayerId, Stage, Tween};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info};

const CARD_WIDTH: f32 = 64.0;
const CARD_HEIGHT: f32 = 96.0;
const CARD_RADIUS: f32 = 8.0;
const CARD_COLORS: [u32; 4] = [0xff7675, 0x74b9ff, 0x55efc4, 0xfeca57];
const STACK_MARGIN: f32 = 40.0;
const TRANSIT_MS: f32 = 2000.0;
/// Keeps a travelling card above its siblings.
const TRANSIT_Z: i32 = 10_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardState {
    Idle,
    InTransit,
}

#[derive(Clone, Debug)]
pub struct Card {
    pub layer: LayerId,
    pub state: CardState,
}

/// A stack and the cards it owns, bottom first.
#[derive(Clone, Debug)]
pub struct CardStack {
    pub layer: LayerId,
    pub cards: Vec<usize>,
}

/// A card move that has been started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardMove {
    pub card: usize,
    pub from: usize,
    pub to: usize,
}

/// Everything the transit tweens mutate.
pub struct CardTable {
    stage: Stage,
    cards: Vec<Card>,
    stacks: Vec<CardStack>,
    top_stack_z: i32,
}

impl CardTable {
    fn new(viewport: Size) -> Self {
        Self {
            stage: Stage::with_viewport(viewport),
            cards: Vec::new(),
            stacks: Vec::new(),
            top_stack_z: 0,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn stacks(&self) -> &[CardStack] {
        &self.stacks
    }

    /// Cards across all stacks. Travelling cards count toward their source.
    pub fn total_cards(&self) -> usize {
        self.stacks.iter().map(|s| s.cards.len()).sum()
    }

    /// Stack currently owning a card.
    pub fn stack_of(&self, card: usize) -> Option<usize> {
        self.stacks.iter().position(|s| s.cards.contains(&card))
    }

    pub fn in_transit(&self) -> usize {
        self.cards
            .iter()
            .filter(|c| c.state == CardState::InTransit)
            .count()
    }

    /// Next free slot of `to`, expressed in the local space of `from`.
    ///
    /// Read every frame so that a card always heads for the slot it will
    /// land in, even when other cards reach `to` first.
    fn landing_offset(&self, from: usize, to: usize) -> Option<Point> {
        let from_pos = self.stage.get_layer(self.stacks[from].layer)?.position;
        let to_pos = self.stage.get_layer(self.stacks[to].layer)?.position;
        Some(to_pos + slot_offset(self.stacks[to].cards.len()) - from_pos)
    }

    fn land(&mut self, card: usize, from: usize, to: usize, rotation: f32) {
        self.stacks[from].cards.retain(|&c| c != card);
        let slot = self.stacks[to].cards.len();
        self.stacks[to].cards.push(card);
        self.cards[card].state = CardState::Idle;

        let card_layer = self.cards[card].layer;
        let tree = self.stage.layer_tree_mut();
        tree.append_child(self.stacks[to].layer, card_layer);
        if let Some(layer) = tree.get_mut(card_layer) {
            layer.position = slot_offset(slot);
            layer.rotation = rotation;
            layer.z_index = slot as i32;
        }

        debug!(card, from, to, slot, "Card landed");
    }
}

/// Local position of the `index`th card in a stack.
fn slot_offset(index: usize) -> Point {
    Point::new(index as f32 * 0.4, -(index as f32) * 0.8)
}

/// Card-shuffle scene.
pub struct AceOfShadows {
    table: CardTable,
    tweens: AnimationController<CardTable>,
    rng: StdRng,
    stack_count: usize,
    cards_per_stack: usize,
    interval_ms: f32,
    since_move_ms: f32,
    moves_started: u64,
}

impl AceOfShadows {
    pub fn new(config: &ShowcaseConfig) -> Self {
        Self {
            table: CardTable::new(config.viewport()),
            tweens: AnimationController::new(),
            rng: config.rng(),
            stack_count: config.card_stacks,
            cards_per_stack: config.cards_per_stack,
            interval_ms: config.card_interval_ms,
            since_move_ms: 0.0,
            moves_started: 0,
        }
    }

    pub fn table(&self) -> &CardTable {
        &self.table
    }

    pub fn moves_started(&self) -> u64 {
        self.moves_started
    }

    /// Send the top idle card of a random stack toward another stack.
    pub fn start_move(&mut self) -> Option<CardMove> {
        let stack_count = self.table.stacks.len();
        if stack_count < 2 {
            return None;
        }

        let sources: Vec<usize> = (0..stack_count)
            .filter(|&i| self.top_idle_card(i).is_some())
            .collect();
        if sources.is_empty() {
            debug!("No idle cards to move");
            return None;
        }

        let from = sources[self.rng.gen_range(0..sources.len())];
        let mut to = self.rng.gen_range(0..stack_count);
        if to == from {
            to = (to + 1) % stack_count;
        }
        self.move_card(from, to)
    }

    /// Send the top idle card of `from` toward `to`.
    pub fn move_card(&mut self, from: usize, to: usize) -> Option<CardMove> {
        if from == to || from >= self.table.stacks.len() || to >= self.table.stacks.len() {
            return None;
        }
        let card = self.top_idle_card(from)?;

        let card_layer = self.table.cards[card].layer;
        let (start, start_rotation) = self
            .table
            .stage
            .get_layer(card_layer)
            .map(|l| (l.position, l.rotation))?;
        let end_rotation = (self.rng.gen::<f32>() - 0.5) * 0.2;

        self.table.cards[card].state = CardState::InTransit;
        self.table.top_stack_z += 1;
        let stack_z = self.table.top_stack_z;
        let from_layer = self.table.stacks[from].layer;
        let tree = self.table.stage.layer_tree_mut();
        if let Some(layer) = tree.get_mut(from_layer) {
            layer.z_index = stack_z;
        }
        if let Some(layer) = tree.get_mut(card_layer) {
            layer.z_index = TRANSIT_Z;
        }

        self.tweens.add(
            Tween::new(0.0, 1.0, TRANSIT_MS)
                .easing(Easing::QuadInOut)
                .on_update(move |table: &mut CardTable, t| {
                    let Some(end) = table.landing_offset(from, to) else {
                        return;
                    };
                    if let Some(layer) = table.stage.get_layer_mut(card_layer) {
                        layer.position = start.lerp(end, t);
                        layer.rotation = start_rotation + (end_rotation - start_rotation) * t;
                    }
                })
                .on_complete(move |table: &mut CardTable| table.land(card, from, to, end_rotation)),
        );

        self.moves_started += 1;
        debug!(card, from, to, "Card move started");
        Some(CardMove { card, from, to })
    }

    fn top_idle_card(&self, stack: usize) -> Option<usize> {
        self.table.stacks[stack]
            .cards
            .iter()
            .rev()
            .copied()
            .find(|&c| self.table.cards[c].state == CardState::Idle)
    }
}

impl Scene for AceOfShadows {
    fn name(&self) -> &'static str {
        "Ace of Shadows"
    }

    fn build(&mut self, ctx: &SceneContext) {
        let viewport = ctx.viewport();
        let n = self.stack_count;
        let y = viewport.height * 0.5 - CARD_HEIGHT * 0.5;
        let root = self.table.stage.root_layer();

        for i in 0..n {
            let x = if n > 1 {
                STACK_MARGIN + i as f32 * ((viewport.width - STACK_MARGIN * 2.0) / (n - 1) as f32)
            } else {
                viewport.width * 0.5
            };
            let layer = self.table.stage.create_layer(root);
            if let Some(stack) = self.table.stage.get_layer_mut(layer) {
                stack.set_position(x, y);
                stack.z_index = i as i32;
            }
            self.table.stacks.push(CardStack {
                layer,
                cards: Vec::with_capacity(self.cards_per_stack),
            });
        }

        for s in 0..n {
            let stack_layer = self.table.stacks[s].layer;
            for i in 0..self.cards_per_stack {
                let layer = self.table.stage.create_layer(stack_layer);
                let rotation = (self.rng.gen::<f32>() - 0.5) * 0.1;
                if let Some(card) = self.table.stage.get_layer_mut(layer) {
                    card.position = slot_offset(i);
                    card.rotation = rotation;
                    card.z_index = i as i32;
                    paint_card(&mut card.display_list, Color::from_rgb_u32(CARD_COLORS[i % CARD_COLORS.len()]));
                }
                let index = self.table.cards.len();
                self.table.cards.push(Card {
                    layer,
                    state: CardState::Idle,
                });
                self.table.stacks[s].cards.push(index);
            }
        }

        info!(
            stacks = n,
            cards = self.table.total_cards(),
            "Ace of Shadows built"
        );
    }

    fn update(&mut self, clock: &FrameClock) {
        let delta = clock.delta_ms();
        self.tweens.update(delta, &mut self.table);

        self.since_move_ms += delta;
        if self.interval_ms <= 0.0 {
            self.since_move_ms = 0.0;
            self.start_move();
            return;
        }
        while self.since_move_ms >= self.interval_ms {
            self.since_move_ms -= self.interval_ms;
            self.start_move();
        }
    }

    fn stage(&self) -> &Stage {
        &self.table.stage
    }
}

/// Rounded card centred on the layer origin, with an outline and two pips.
fn paint_card(list: &mut render::DisplayList, color: Color) {
    let body = Rect::anchored(Size::new(CARD_WIDTH, CARD_HEIGHT), 0.5, 0.5);
    let pip = Color::WHITE;
    list.fill_rect(body, color, Some(CARD_RADIUS))
        .stroke_rect(body, 2.0, Color::BLACK.with_alpha(0.35), Some(CARD_RADIUS))
        .fill_circle(Point::new(body.x + 16.0, body.y + 16.0), 4.0, pip)
        .fill_circle(Point::new(body.right() - 16.0, body.bottom() - 16.0), 4.0, pip);
}

#[cfg(test)]
mod tests {
    use super::*;
    use networking::MemoryFetcher;
    use std::sync::Arc;

    fn built(config: ShowcaseConfig) -> AceOfShadows {
        let ctx = SceneContext::new(config.clone(), Arc::new(MemoryFetcher::new()));
        let mut scene = AceOfShadows::new(&config);
        scene.build(&ctx);
        scene
    }

    fn run(scene: &mut AceOfShadows, clock: &mut FrameClock, total_ms: f32, step_ms: f32) {
        let mut elapsed = 0.0;
        while elapsed < total_ms {
            clock.advance(step_ms);
            scene.update(clock);
            elapsed += step_ms;
        }
    }

    #[test]
    fn test_build() {
        let scene = built(ShowcaseConfig::default().with_seed(1));
        let table = scene.table();

        assert_eq!(table.stacks().len(), 4);
        assert!(table.stacks().iter().all(|s| s.cards.len() == 36));
        assert_eq!(table.total_cards(), 144);
        assert_eq!(scene.stage().layer_tree().len(), 1 + 4 + 144);

        let first = scene.stage().get_layer(table.stacks()[0].layer).unwrap();
        assert_eq!(first.position, Point::new(40.0, 360.0 - 48.0));
        let last = scene.stage().get_layer(table.stacks()[3].layer).unwrap();
        assert_eq!(last.position.x, 1280.0 - 40.0);
    }

    #[test]
    fn test_cards_are_conserved() {
        let mut scene = built(ShowcaseConfig::default().with_seed(7));
        let mut clock = FrameClock::new();

        for _ in 0..12 {
            run(&mut scene, &mut clock, 1000.0, 16.0);
            assert_eq!(scene.table().total_cards(), 144);
        }
        assert!(scene.moves_started() >= 11);
        assert!(scene.table().in_transit() <= 3);
    }

    #[test]
    fn test_landed_card_joins_destination() {
        let mut scene = built(ShowcaseConfig::default().with_seed(3).with_card_interval(f32::INFINITY));
        let mv = scene.start_move().unwrap();
        assert_ne!(mv.from, mv.to);
        assert_eq!(scene.table().cards()[mv.card].state, CardState::InTransit);
        assert_eq!(scene.table().stack_of(mv.card), Some(mv.from));

        let mut clock = FrameClock::new();
        run(&mut scene, &mut clock, 1000.0, 16.0);
        assert_eq!(scene.table().stack_of(mv.card), Some(mv.from));

        run(&mut scene, &mut clock, 1100.0, 16.0);
        let table = scene.table();
        assert_eq!(table.cards()[mv.card].state, CardState::Idle);
        assert_eq!(table.stack_of(mv.card), Some(mv.to));
        assert_eq!(table.stacks()[mv.to].cards.last(), Some(&mv.card));
        assert_eq!(table.stacks()[mv.from].cards.len(), 35);

        let layer = scene.stage().get_layer(table.cards()[mv.card].layer).unwrap();
        assert_eq!(layer.parent, Some(table.stacks()[mv.to].layer));
        assert_eq!(layer.z_index, 36);
        assert_eq!(layer.position, slot_offset(36));
    }

    #[test]
    fn test_moves_follow_interval() {
        let mut scene = built(ShowcaseConfig::default().with_seed(11));
        let mut clock = FrameClock::new();

        run(&mut scene, &mut clock, 992.0, 16.0);
        assert_eq!(scene.moves_started(), 0);
        run(&mut scene, &mut clock, 16.0, 16.0);
        assert_eq!(scene.moves_started(), 1);
    }

    fn world_position(scene: &AceOfShadows, card: usize) -> Point {
        let tree = scene.stage().layer_tree();
        let layer = scene.table().cards()[card].layer;
        tree.world_transform(layer).transform_point(Point::new(0.0, 0.0))
    }

    #[test]
    fn test_shared_destination_lands_without_jump() {
        let mut scene = built(ShowcaseConfig::default().with_seed(5).with_card_interval(f32::INFINITY));
        let mut clock = FrameClock::new();

        let first = scene.move_card(0, 2).unwrap();
        run(&mut scene, &mut clock, 500.0, 10.0);
        let second = scene.move_card(1, 2).unwrap();

        let mut previous = world_position(&scene, second.card);
        let mut largest_step: f32 = 0.0;
        while scene.table().cards()[second.card].state == CardState::InTransit {
            clock.advance(10.0);
            scene.update(&clock);
            let current = world_position(&scene, second.card);
            if scene.table().cards()[second.card].state == CardState::Idle {
                assert!(current.distance(previous) < 0.5, "jumped {}", current.distance(previous));
            }
            largest_step = largest_step.max(current.distance(previous));
            previous = current;
        }
        assert!(largest_step > 0.0);

        let table = scene.table();
        assert_eq!(table.stacks()[2].cards[36..], [first.card, second.card]);
        let layer = scene.stage().get_layer(table.cards()[second.card].layer).unwrap();
        assert_eq!(layer.position, slot_offset(37));
    }

    #[test]
    fn test_move_card_rejects_same_stack() {
        let mut scene = built(ShowcaseConfig::default().with_seed(2));
        assert!(scene.move_card(1, 1).is_none());
        assert!(scene.move_card(0, 9).is_none());
    }

    #[test]
    fn test_single_stack_never_moves() {
        let mut scene = built(ShowcaseConfig::default().with_cards(1, 5).with_seed(2));
        assert!(scene.start_move().is_none());
        assert_eq!(scene.table().total_cards(), 5);
    }
}
