// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Card motions, deferred actions and the animation queue.
//!
//! Every visible change the server causes (a card sliding out of the deck, the
//! hole card lifting and flipping) is an [`Animation`] appended to one FIFO
//! [`AnimationQueue`]. Each logic step advances only the head entry, so cards
//! move one at a time in the order the server dealt them.
//!
//! Some steps must not be evaluated until everything before them has played:
//! the dealer's next card leaves from wherever the deck is *then*, and the
//! hole card settles from wherever the flip left it. Those are [`Action`]s,
//! zero-duration entries that change the scene when they reach the head and
//! may yield one follow-up [`CardMotion`], which goes to the tail.
//!
//! # Force-finish
//!
//! [`AnimationQueue::advance`] takes a `force_finish` flag. Entries that
//! finish on their own are drained as usual; the first entry that is still
//! running is snapped to its end state and dequeued, and the step ends. A
//! backlog therefore drains one motion per logic step, never all at once.

use alloc::collections::VecDeque;

use kurbo::{Point, Vec2};

use crate::card::Face;
use crate::scene::Scene;
use crate::sprite::{SpriteId, SpriteStore};
use crate::trace::{AnimationEnqueuedEvent, AnimationFinishedEvent, Tracer};

/// How long a motion takes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Timing {
    /// A fixed duration in seconds.
    Fixed(f64),
    /// A constant speed in pixels per second; the duration follows from the
    /// distance.
    BySpeed(f64),
}

impl Timing {
    /// Resolves to a duration in seconds for a motion covering `distance`.
    ///
    /// A non-positive speed resolves to zero.
    #[must_use]
    pub fn duration(self, distance: Vec2) -> f64 {
        match self {
            Self::Fixed(secs) => secs,
            Self::BySpeed(speed) if speed > 0.0 => distance.hypot() / speed,
            Self::BySpeed(_) => 0.0,
        }
    }
}

/// One sprite travelling to a target, optionally flipping on the way.
///
/// The flip is a horizontal squash: the sprite narrows to nothing at the
/// midpoint, swaps texture, then widens back. Position shifts by half the
/// width change so the card stays centered on its path.
#[derive(Clone, Debug, PartialEq)]
pub struct CardMotion {
    sprite: SpriteId,
    target: Point,
    duration: f64,
    flip: Option<Face>,
    elapsed: f64,
    velocity: Vec2,
    natural_width: f64,
    width_rate: f64,
    spreading: bool,
}

impl CardMotion {
    /// Plans a motion of `sprite` from where it is now to `target`.
    ///
    /// # Panics
    ///
    /// Panics if `sprite` is stale.
    #[must_use]
    pub fn new(
        sprites: &SpriteStore,
        sprite: SpriteId,
        target: Point,
        timing: Timing,
        flip: Option<Face>,
    ) -> Self {
        let start = sprites.position(sprite);
        let natural_width = sprites.width(sprite);
        let distance = target - start;
        let duration = timing.duration(distance);
        let (velocity, width_rate) = if duration > 0.0 && duration.is_finite() {
            (distance / duration, natural_width / (duration / 2.0))
        } else {
            (Vec2::ZERO, 0.0)
        };
        Self {
            sprite,
            target,
            duration,
            flip,
            elapsed: 0.0,
            velocity,
            natural_width,
            width_rate,
            spreading: false,
        }
    }

    /// The sprite being moved.
    #[must_use]
    pub const fn sprite(&self) -> SpriteId {
        self.sprite
    }

    /// Where the sprite ends up.
    #[must_use]
    pub const fn target(&self) -> Point {
        self.target
    }

    /// Total duration in seconds.
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// The face still to be revealed, if the flip has not happened yet.
    #[must_use]
    pub const fn pending_flip(&self) -> Option<Face> {
        self.flip
    }

    /// Advances by `delta` seconds. Returns `true` once the motion ran its
    /// full duration.
    ///
    /// With `force_finish` the sprite is snapped to its end state at once,
    /// but the return value still reports only natural completion; the
    /// queue decides what a forced entry means.
    ///
    /// If the sprite was destroyed in the meantime, nothing is touched and
    /// the motion reports done.
    pub fn progress(&mut self, sprites: &mut SpriteStore, delta: f64, force_finish: bool) -> bool {
        if !sprites.is_alive(self.sprite) {
            return true;
        }

        self.elapsed += delta;
        let done = self.elapsed > self.duration;
        if done || force_finish {
            sprites.set_position(self.sprite, self.target);
            sprites.set_width(self.sprite, self.natural_width);
            if let Some(face) = self.flip {
                sprites.set_face(self.sprite, face);
            }
            return done;
        }

        let mut position = sprites.position(self.sprite);
        let width_step = self.width_rate * delta;
        if let Some(face) = self.flip {
            if self.elapsed > self.duration / 2.0 {
                sprites.set_face(self.sprite, face);
                self.flip = None;
                self.spreading = true;
            } else {
                let width = sprites.width(self.sprite);
                sprites.set_width(self.sprite, width - width_step);
                position.x += width_step / 2.0;
            }
        } else if self.spreading {
            let width = sprites.width(self.sprite);
            sprites.set_width(self.sprite, width + width_step);
            position.x -= width_step / 2.0;
        }

        sprites.set_position(self.sprite, position + self.velocity * delta);
        false
    }
}

/// A zero-duration queue entry with a one-shot effect on the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    /// Shift a sprite in the stacking order.
    Restack {
        /// Sprite to restack.
        sprite: SpriteId,
        /// Z-index change.
        delta: i32,
    },
    /// Shift a sprite in the stacking order, then slide it to `target`.
    RestackThenSlide {
        /// Sprite to restack and move.
        sprite: SpriteId,
        /// Z-index change.
        delta: i32,
        /// Where the slide ends.
        target: Point,
        /// How long the slide takes.
        timing: Timing,
    },
    /// Draw the dealer's next card from the deck as it is when this fires.
    DealDealerCard {
        /// The face revealed during the slide.
        face: Face,
    },
}

impl Action {
    /// Performs the effect. Returns the follow-up motion to append at the
    /// queue tail, if any.
    ///
    /// Restacking a sprite that no longer exists does nothing.
    pub fn fire(&self, scene: &mut Scene) -> Option<CardMotion> {
        match *self {
            Self::Restack { sprite, delta } => {
                if scene.sprites.is_alive(sprite) {
                    scene.sprites.shift_z_index(sprite, delta);
                }
                None
            }
            Self::RestackThenSlide {
                sprite,
                delta,
                target,
                timing,
            } => {
                if !scene.sprites.is_alive(sprite) {
                    return None;
                }
                scene.sprites.shift_z_index(sprite, delta);
                Some(CardMotion::new(
                    &scene.sprites,
                    sprite,
                    target,
                    timing,
                    None,
                ))
            }
            Self::DealDealerCard { face } => {
                let target = scene.layout.dealer_slot(scene.dealer.len());
                let (sprite, motion) = scene.draw_card(target, Some(face));
                scene.dealer.push(sprite);
                Some(motion)
            }
        }
    }
}

/// What kind of entry an [`Animation`] is, for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    /// A [`CardMotion`].
    Motion,
    /// [`Action::Restack`].
    Restack,
    /// [`Action::RestackThenSlide`].
    RestackThenSlide,
    /// [`Action::DealDealerCard`].
    DealDealerCard,
}

/// An entry in the [`AnimationQueue`].
#[derive(Clone, Debug, PartialEq)]
pub enum Animation {
    /// A sprite in motion.
    Motion(CardMotion),
    /// A deferred one-shot effect.
    Action(Action),
}

impl Animation {
    /// Returns the kind of this entry.
    #[must_use]
    pub const fn kind(&self) -> AnimationKind {
        match self {
            Self::Motion(_) => AnimationKind::Motion,
            Self::Action(Action::Restack { .. }) => AnimationKind::Restack,
            Self::Action(Action::RestackThenSlide { .. }) => AnimationKind::RestackThenSlide,
            Self::Action(Action::DealDealerCard { .. }) => AnimationKind::DealDealerCard,
        }
    }
}

impl From<CardMotion> for Animation {
    fn from(motion: CardMotion) -> Self {
        Self::Motion(motion)
    }
}

impl From<Action> for Animation {
    fn from(action: Action) -> Self {
        Self::Action(action)
    }
}

/// What a single [`AnimationQueue::advance`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    /// Entries that finished on their own (actions included).
    pub completed: u32,
    /// Whether an entry was fast-forwarded and dequeued.
    pub forced: bool,
}

/// FIFO of pending animations. Only the head is ever advanced.
#[derive(Clone, Debug, Default)]
pub struct AnimationQueue {
    entries: VecDeque<Animation>,
}

impl AnimationQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry at the tail.
    pub fn enqueue(&mut self, animation: impl Into<Animation>) {
        self.enqueue_traced(animation, &mut Tracer::none());
    }

    /// Like [`enqueue`](Self::enqueue), reporting the push to `tracer`.
    pub fn enqueue_traced(&mut self, animation: impl Into<Animation>, tracer: &mut Tracer<'_>) {
        let animation = animation.into();
        let kind = animation.kind();
        self.entries.push_back(animation);
        tracer.animation_enqueued(&AnimationEnqueuedEvent {
            kind,
            queue_len: self.entries.len(),
        });
    }

    /// Runs one logic step of `delta` seconds.
    ///
    /// The head is advanced; if it reports done it is dequeued and the new
    /// head is advanced in the same step, until an entry is still running or
    /// the queue is empty. With `force_finish`, that still-running entry is
    /// snapped to its end state and dequeued, and the step ends there.
    pub fn advance(&mut self, scene: &mut Scene, delta: f64, force_finish: bool) -> AdvanceReport {
        self.advance_traced(scene, delta, force_finish, &mut Tracer::none())
    }

    /// Like [`advance`](Self::advance), reporting each finished entry to
    /// `tracer`.
    pub fn advance_traced(
        &mut self,
        scene: &mut Scene,
        delta: f64,
        force_finish: bool,
        tracer: &mut Tracer<'_>,
    ) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        while let Some(head) = self.entries.front_mut() {
            let kind = head.kind();
            let (done, follow_up) = match head {
                Animation::Motion(motion) => {
                    (motion.progress(&mut scene.sprites, delta, force_finish), None)
                }
                Animation::Action(action) => (true, action.fire(scene)),
            };

            if !done && !force_finish {
                break;
            }

            self.entries.pop_front();
            if let Some(motion) = follow_up {
                self.enqueue_traced(motion, tracer);
            }
            tracer.animation_finished(&AnimationFinishedEvent {
                kind,
                forced: !done,
                queue_len: self.entries.len(),
            });

            if done {
                report.completed += 1;
            } else {
                report.forced = true;
                break;
            }
        }
        report
    }

    /// Number of pending entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry that the next step will advance.
    #[must_use]
    pub fn head(&self) -> Option<&Animation> {
        self.entries.front()
    }

    /// Drops every pending entry without running it.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, Rank, Suit};
    use crate::config::TableLayout;

    const STEP: f64 = 1.0 / 60.0;

    fn scene() -> Scene {
        Scene::new(TableLayout::STANDARD, Timing::BySpeed(800.0))
    }

    fn spawn(scene: &mut Scene, at: Point) -> SpriteId {
        scene
            .sprites
            .create_sprite(at, scene.layout.card_size, Face::BACK)
    }

    #[test]
    fn duration_by_speed_uses_straight_line_distance() {
        let mut scene = scene();
        let id = spawn(&mut scene, Point::ORIGIN);
        let motion = CardMotion::new(
            &scene.sprites,
            id,
            Point::new(300.0, 400.0),
            Timing::BySpeed(800.0),
            None,
        );
        assert!((motion.duration() - 0.625).abs() < 1e-12, "got {}", motion.duration());
    }

    #[test]
    fn zero_duration_finishes_on_first_progress() {
        let mut scene = scene();
        let id = spawn(&mut scene, Point::ORIGIN);
        let target = Point::new(50.0, 50.0);
        let mut motion = CardMotion::new(&scene.sprites, id, target, Timing::Fixed(0.0), None);
        assert!(motion.progress(&mut scene.sprites, STEP, false));
        assert_eq!(scene.sprites.position(id), target);
    }

    #[test]
    fn motion_moves_linearly_and_lands_on_target() {
        let mut scene = scene();
        let id = spawn(&mut scene, Point::ORIGIN);
        let target = Point::new(60.0, 0.0);
        let mut motion = CardMotion::new(&scene.sprites, id, target, Timing::Fixed(1.0), None);

        assert!(!motion.progress(&mut scene.sprites, 0.5, false));
        let halfway = scene.sprites.position(id);
        assert!((halfway.x - 30.0).abs() < 1e-9, "halfway at {halfway:?}");

        assert!(!motion.progress(&mut scene.sprites, 0.5, false), "not past the end yet");
        assert!(motion.progress(&mut scene.sprites, STEP, false));
        assert_eq!(scene.sprites.position(id), target);
    }

    #[test]
    fn flip_swaps_face_past_midpoint_and_restores_width() {
        let mut scene = scene();
        let id = spawn(&mut scene, Point::ORIGIN);
        let face = Face::Card(Card::new(Suit::Clubs, Rank::Ace));
        let mut motion = CardMotion::new(
            &scene.sprites,
            id,
            Point::ORIGIN,
            Timing::Fixed(0.4),
            Some(face),
        );

        motion.progress(&mut scene.sprites, 0.1, false);
        assert_eq!(scene.sprites.face(id), Face::BACK, "still face down");
        assert!((scene.sprites.width(id) - 36.0).abs() < 1e-9, "half squashed");
        assert!((scene.sprites.position(id).x - 18.0).abs() < 1e-9, "kept centered");

        motion.progress(&mut scene.sprites, 0.15, false);
        assert_eq!(scene.sprites.face(id), face, "the ace of clubs is revealed");
        assert_eq!(motion.pending_flip(), None);

        assert!(motion.progress(&mut scene.sprites, 0.2, false));
        assert_eq!(scene.sprites.width(id), 72.0);
        assert_eq!(scene.sprites.position(id), Point::ORIGIN);
    }

    #[test]
    fn forced_progress_snaps_but_reports_not_done() {
        let mut scene = scene();
        let id = spawn(&mut scene, Point::ORIGIN);
        let face = Face::Joker(0);
        let target = Point::new(100.0, 100.0);
        let mut motion =
            CardMotion::new(&scene.sprites, id, target, Timing::Fixed(1.0), Some(face));
        assert!(!motion.progress(&mut scene.sprites, STEP, true));
        assert_eq!(scene.sprites.position(id), target);
        assert_eq!(scene.sprites.face(id), face);
        assert_eq!(scene.sprites.width(id), 72.0);
    }

    #[test]
    fn stale_sprite_reports_done_without_mutation() {
        let mut scene = scene();
        let id = spawn(&mut scene, Point::ORIGIN);
        let mut motion = CardMotion::new(
            &scene.sprites,
            id,
            Point::new(10.0, 10.0),
            Timing::Fixed(1.0),
            None,
        );
        scene.sprites.destroy(id);
        let _ = scene.sprites.evaluate();
        // The slot is reused by an unrelated card.
        let other = spawn(&mut scene, Point::new(5.0, 5.0));
        assert_eq!(other.index(), id.index());

        assert!(motion.progress(&mut scene.sprites, STEP, false));
        assert_eq!(scene.sprites.position(other), Point::new(5.0, 5.0));
    }

    #[test]
    fn queue_is_fifo_without_force() {
        let mut scene = scene();
        let a = spawn(&mut scene, Point::ORIGIN);
        let b = spawn(&mut scene, Point::ORIGIN);
        let mut queue = AnimationQueue::new();
        queue.enqueue(CardMotion::new(
            &scene.sprites,
            a,
            Point::new(10.0, 0.0),
            Timing::Fixed(2.5 * STEP),
            None,
        ));
        queue.enqueue(CardMotion::new(
            &scene.sprites,
            b,
            Point::new(0.0, 10.0),
            Timing::Fixed(STEP / 2.0),
            None,
        ));

        for _ in 0..2 {
            let report = queue.advance(&mut scene, STEP, false);
            assert_eq!(report.completed, 0);
            assert_eq!(scene.sprites.position(b), Point::ORIGIN, "b waits for a");
        }
        let report = queue.advance(&mut scene, STEP, false);
        assert_eq!(report.completed, 2, "a finishes, then b finishes in the same step");
        assert!(queue.is_empty());
    }

    #[test]
    fn force_completes_one_running_entry_per_step() {
        let mut scene = scene();
        let mut queue = AnimationQueue::new();
        let ids: [SpriteId; 3] = core::array::from_fn(|_| spawn(&mut scene, Point::ORIGIN));
        for id in ids {
            queue.enqueue(CardMotion::new(
                &scene.sprites,
                id,
                Point::new(100.0, 0.0),
                Timing::Fixed(1.0),
                None,
            ));
        }

        for remaining in [2, 1, 0] {
            let report = queue.advance(&mut scene, STEP, true);
            assert!(report.forced);
            assert_eq!(report.completed, 0);
            assert_eq!(queue.len(), remaining);
        }
        for id in ids {
            assert_eq!(scene.sprites.position(id), Point::new(100.0, 0.0));
        }
    }

    #[test]
    fn force_drains_finished_entries_before_forcing() {
        let mut scene = scene();
        let a = spawn(&mut scene, Point::ORIGIN);
        let b = spawn(&mut scene, Point::ORIGIN);
        let mut queue = AnimationQueue::new();
        queue.enqueue(Action::Restack { sprite: a, delta: 1 });
        queue.enqueue(CardMotion::new(
            &scene.sprites,
            b,
            Point::new(1.0, 1.0),
            Timing::Fixed(1.0),
            None,
        ));
        queue.enqueue(Action::Restack { sprite: b, delta: 1 });

        let report = queue.advance(&mut scene, STEP, true);
        assert_eq!(report.completed, 1, "the restack ran");
        assert!(report.forced, "the motion was forced");
        assert_eq!(queue.len(), 1, "the trailing restack waits for the next step");
        assert_eq!(scene.sprites.z_index(b), 0);
    }

    #[test]
    fn restack_then_slide_appends_follow_up_at_tail() {
        let mut scene = scene();
        let card = spawn(&mut scene, Point::new(15.0, 130.0));
        let other = spawn(&mut scene, Point::ORIGIN);
        let mut queue = AnimationQueue::new();
        queue.enqueue(Action::RestackThenSlide {
            sprite: card,
            delta: -2,
            target: Point::new(15.0, 200.0),
            timing: Timing::Fixed(0.35),
        });
        queue.enqueue(CardMotion::new(
            &scene.sprites,
            other,
            Point::new(1.0, 0.0),
            Timing::Fixed(1.0),
            None,
        ));

        queue.advance(&mut scene, STEP, false);
        assert_eq!(scene.sprites.z_index(card), -2);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.head().map(Animation::kind), Some(AnimationKind::Motion));
        let Some(Animation::Motion(head)) = queue.head() else {
            panic!("head should be a motion");
        };
        assert_eq!(head.sprite(), other, "the slide queues behind the existing motion");
    }

    #[test]
    fn deal_dealer_card_draws_at_fire_time() {
        let mut scene = scene();
        let face = Face::Card(Card::new(Suit::Diamonds, Rank::Nine));
        let mut queue = AnimationQueue::new();
        queue.enqueue(Action::DealDealerCard { face });
        assert!(scene.dealer.is_empty(), "nothing drawn until the action fires");

        queue.advance(&mut scene, STEP, false);
        assert_eq!(scene.dealer.len(), 1);
        let Some(Animation::Motion(slide)) = queue.head() else {
            panic!("the slide should be queued");
        };
        assert_eq!(slide.target(), Point::new(15.0, 200.0));
        assert_eq!(slide.pending_flip(), Some(face));
    }
}
