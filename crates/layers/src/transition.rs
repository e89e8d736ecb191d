//! Timed style transitions for country paths.

use crate::symbology::{Rgb, StrokeStyle};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ease {
    Linear,
    CubicOut,
    CubicInOut,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::CubicOut => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Ease::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

/// Visual attributes of one country path.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PathStyle {
    pub fill: Rgb,
    pub stroke: StrokeStyle,
}

impl PathStyle {
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            fill: self.fill.lerp(other.fill, t),
            stroke: StrokeStyle {
                color: self.stroke.color.lerp(other.stroke.color, t),
                width: self.stroke.width + (other.stroke.width - self.stroke.width) * t,
            },
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StyleTransition {
    pub from: PathStyle,
    pub to: PathStyle,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub ease: Ease,
}

impl StyleTransition {
    pub fn sample(&self, now_ms: f64) -> PathStyle {
        if self.duration_ms <= 0.0 || self.is_finished(now_ms) {
            return self.to;
        }
        let t = (now_ms - self.start_ms) / self.duration_ms;
        self.from.lerp(self.to, self.ease.apply(t))
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        now_ms - self.start_ms >= self.duration_ms
    }
}

/// Current style of a path plus at most one running transition.
///
/// Starting a transition interrupts the running one, continuing from the
/// style it had reached; nothing is queued.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedStyle {
    current: PathStyle,
    transition: Option<StyleTransition>,
}

impl AnimatedStyle {
    pub fn new(style: PathStyle) -> Self {
        Self {
            current: style,
            transition: None,
        }
    }

    pub fn current(&self) -> PathStyle {
        self.current
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Final style once any running transition completes.
    pub fn target(&self) -> PathStyle {
        self.transition.map(|t| t.to).unwrap_or(self.current)
    }

    /// Sets the style now, cancelling any transition.
    pub fn set(&mut self, style: PathStyle) {
        self.transition = None;
        self.current = style;
    }

    /// Animates from the current style to `to`. A zero duration applies
    /// immediately.
    pub fn transition_to(&mut self, to: PathStyle, now_ms: f64, duration_ms: f64, ease: Ease) {
        if duration_ms <= 0.0 {
            self.set(to);
            return;
        }
        self.transition = Some(StyleTransition {
            from: self.current,
            to,
            start_ms: now_ms,
            duration_ms,
            ease,
        });
    }

    /// Advances to `now_ms`. Returns true when the style changed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(transition) = self.transition else {
            return false;
        };
        let next = transition.sample(now_ms);
        if transition.is_finished(now_ms) {
            self.transition = None;
        }
        let changed = next != self.current;
        self.current = next;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::{AnimatedStyle, Ease, PathStyle};
    use crate::symbology::{Rgb, StrokeStyle};

    fn style(fill: u32, width: f64) -> PathStyle {
        PathStyle {
            fill: Rgb::from_u32(fill),
            stroke: StrokeStyle {
                color: Rgb::from_u32(0x1a1a1a),
                width,
            },
        }
    }

    #[test]
    fn eases_hit_endpoints() {
        for ease in [Ease::Linear, Ease::CubicOut, Ease::CubicInOut] {
            assert_eq!(ease.apply(0.0), 0.0);
            assert_eq!(ease.apply(1.0), 1.0);
            assert_eq!(ease.apply(2.0), 1.0);
        }
        assert_eq!(Ease::CubicInOut.apply(0.5), 0.5);
        assert!(Ease::CubicOut.apply(0.5) > 0.5);
    }

    #[test]
    fn transition_runs_to_completion() {
        let mut s = AnimatedStyle::new(style(0x000000, 0.6));
        s.transition_to(style(0xffffff, 2.2), 100.0, 200.0, Ease::CubicOut);
        assert!(s.is_animating());
        assert_eq!(s.target(), style(0xffffff, 2.2));

        assert!(s.tick(200.0));
        let mid = s.current();
        assert!(mid.fill.r > 0 && mid.fill.r < 255);

        s.tick(300.0);
        assert!(!s.is_animating());
        assert_eq!(s.current(), style(0xffffff, 2.2));
        assert!(!s.tick(400.0));
    }

    #[test]
    fn new_transition_interrupts_from_current_value() {
        let mut s = AnimatedStyle::new(style(0x000000, 0.6));
        s.transition_to(style(0xffffff, 0.6), 0.0, 200.0, Ease::Linear);
        s.tick(100.0);
        let reached = s.current();

        s.transition_to(style(0x000000, 0.6), 100.0, 200.0, Ease::Linear);
        assert_eq!(s.current(), reached);
        s.tick(300.0);
        assert_eq!(s.current(), style(0x000000, 0.6));
    }

    #[test]
    fn zero_duration_applies_immediately() {
        let mut s = AnimatedStyle::new(style(0x000000, 0.6));
        s.transition_to(style(0x123456, 1.0), 0.0, 0.0, Ease::CubicOut);
        assert!(!s.is_animating());
        assert_eq!(s.current(), style(0x123456, 1.0));
    }
}
