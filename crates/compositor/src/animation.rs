//! Frame-driven tweens.
//!
//! A [`Tween`] interpolates a single number from `from` to `to` over a fixed
//! duration after an optional delay. Tweens live in an [`AnimationController`]
//! owned by a scene; the controller is advanced once per frame with the clock
//! delta and the scene state the callbacks mutate. Finished tweens remove
//! themselves.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle of a registered tween.
    pub struct TweenId;
}

/// Easing function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    /// Quadratic ease-in-out.
    QuadInOut,
    /// Cubic ease-out.
    CubicOut,
}

impl Easing {
    /// Apply the easing function to a progress value.
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

type UpdateFn<T> = Box<dyn FnMut(&mut T, f32) + Send>;
type CompleteFn<T> = Box<dyn FnOnce(&mut T) + Send>;

/// A time-bounded interpolation between two numbers.
pub struct Tween<T> {
    from: f32,
    to: f32,
    duration_ms: f32,
    delay_ms: f32,
    elapsed_ms: f32,
    easing: Easing,
    on_update: Option<UpdateFn<T>>,
    on_complete: Option<CompleteFn<T>>,
    done: bool,
}

impl<T> Tween<T> {
    pub fn new(from: f32, to: f32, duration_ms: f32) -> Self {
        Self {
            from,
            to,
            duration_ms,
            delay_ms: 0.0,
            elapsed_ms: 0.0,
            easing: Easing::Linear,
            on_update: None,
            on_complete: None,
            done: false,
        }
    }

    /// Wait this long before the first update.
    pub fn delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Called with the interpolated value on every post-delay frame.
    pub fn on_update(mut self, f: impl FnMut(&mut T, f32) + Send + 'static) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    /// Called once, right after the final update.
    pub fn on_complete(mut self, f: impl FnOnce(&mut T) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Progress in 0..=1, or `None` while still inside the delay.
    pub fn ratio(&self) -> Option<f32> {
        let local = self.elapsed_ms - self.delay_ms;
        if local < 0.0 {
            return None;
        }
        if self.duration_ms <= 0.0 {
            return Some(1.0);
        }
        Some((local / self.duration_ms).clamp(0.0, 1.0))
    }

    /// Interpolated value for the current elapsed time.
    pub fn value(&self) -> Option<f32> {
        self.ratio().map(|ratio| self.value_at(ratio))
    }

    /// Interpolated value at a given progress.
    pub fn value_at(&self, ratio: f32) -> f32 {
        if ratio >= 1.0 {
            // Exact end value, no floating point drift.
            return self.to;
        }
        self.from + (self.to - self.from) * self.easing.apply(ratio)
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Advance by one frame. Returns true once the tween has finished.
    pub fn advance(&mut self, delta_ms: f32, target: &mut T) -> bool {
        if self.done {
            return true;
        }

        self.elapsed_ms += delta_ms;
        let Some(ratio) = self.ratio() else {
            return false;
        };

        let value = self.value_at(ratio);
        if let Some(on_update) = self.on_update.as_mut() {
            on_update(target, value);
        }

        if ratio >= 1.0 {
            self.done = true;
            if let Some(on_complete) = self.on_complete.take() {
                on_complete(target);
            }
        }

        self.done
    }
}

impl<T> std::fmt::Debug for Tween<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tween")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("duration_ms", &self.duration_ms)
            .field("delay_ms", &self.delay_ms)
            .field("elapsed_ms", &self.elapsed_ms)
            .field("easing", &self.easing)
            .field("done", &self.done)
            .finish()
    }
}

/// Animation controller: the set of tweens driving one scene.
pub struct AnimationController<T> {
    /// Active tweens.
    tweens: SlotMap<TweenId, Tween<T>>,
}

impl<T> AnimationController<T> {
    pub fn new() -> Self {
        Self {
            tweens: SlotMap::with_key(),
        }
    }

    /// Register a tween.
    pub fn add(&mut self, tween: Tween<T>) -> TweenId {
        self.tweens.insert(tween)
    }

    /// Register a tween from its parts.
    pub fn animate(
        &mut self,
        from: f32,
        to: f32,
        duration_ms: f32,
        delay_ms: f32,
        easing: Easing,
        on_update: impl FnMut(&mut T, f32) + Send + 'static,
    ) -> TweenId {
        self.add(
            Tween::new(from, to, duration_ms)
                .delay(delay_ms)
                .easing(easing)
                .on_update(on_update),
        )
    }

    /// Whether a tween is still registered.
    pub fn is_active(&self, id: TweenId) -> bool {
        self.tweens.contains_key(id)
    }

    /// Advance every tween and drop the finished ones.
    pub fn update(&mut self, delta_ms: f32, target: &mut T) {
        self.tweens.retain(|_, tween| !tween.advance(delta_ms, target));
    }

    /// Check if any tweens are running.
    pub fn has_active_animations(&self) -> bool {
        !self.tweens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}

impl<T> Default for AnimationController<T> {
    fn default() -> Self {
        Self::new()
    }
}
