use std::time::Duration;

use tracing::trace;

use crate::grid::Position;

/// Default time between two bot steps
pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(200);

/// What the bot is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotState {
    /// No route exists; the bot waits on the start tile
    IdleAtStart,
    /// Walking the published route
    Advancing,
}

/// The marker that walks the current path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bot {
    pub position: Position,
    /// Index into the path the bot last stepped on
    pub path_index: usize,
}

/// Moves the bot one tile per step interval, looping over the route forever.
///
/// Steps are gated on wall-clock time, not on frames: [`BotAnimator::update`]
/// can be called every frame and only acts once the interval has elapsed.
#[derive(Debug, Clone)]
pub struct BotAnimator {
    bot: Bot,
    home: Position,
    state: BotState,
    step_interval: f64,
    last_step: f64,
}

impl BotAnimator {
    pub fn new(home: Position, step_interval: Duration) -> Self {
        BotAnimator {
            bot: Bot {
                position: home,
                path_index: 0,
            },
            home,
            state: BotState::IdleAtStart,
            step_interval: step_interval.as_secs_f64(),
            last_step: 0.0,
        }
    }

    /// Advance if more than one step interval has passed since the last step.
    /// `now` is in seconds on any monotonic clock. Returns true if a step was
    /// taken.
    pub fn update(&mut self, now: f64, path: Option<&[Position]>) -> bool {
        if now - self.last_step <= self.step_interval {
            return false;
        }
        self.tick(path);
        self.last_step = now;
        true
    }

    /// Take one step along `path`.
    ///
    /// The index is re-clamped against the path given here, so a path that
    /// was swapped for a shorter one since the last step is never read past
    /// its end: stepping beyond the last tile wraps back to index 0.
    pub fn tick(&mut self, path: Option<&[Position]>) {
        match path {
            Some(path) if !path.is_empty() => {
                let next = self.bot.path_index + 1;
                self.bot.path_index = if next >= path.len() { 0 } else { next };
                self.bot.position = path[self.bot.path_index];
                self.state = BotState::Advancing;
            }
            _ => self.reset(),
        }
        trace!(
            x = self.bot.position.x,
            y = self.bot.position.y,
            index = self.bot.path_index,
            "bot step"
        );
    }

    /// Put the bot back on the start tile
    pub fn reset(&mut self) {
        self.bot.position = self.home;
        self.bot.path_index = 0;
        self.state = BotState::IdleAtStart;
    }

    pub fn position(&self) -> Position {
        self.bot.position
    }

    pub fn path_index(&self) -> usize {
        self.bot.path_index
    }

    pub fn state(&self) -> BotState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(len: i32) -> Vec<Position> {
        (1..=len).map(|x| Position::new(x, 1)).collect()
    }

    #[test]
    fn test_bot_idles_at_start_without_path() {
        let home = Position::new(1, 1);
        let mut animator = BotAnimator::new(home, DEFAULT_STEP_INTERVAL);
        let path = line(4);
        animator.tick(Some(path.as_slice()));
        animator.tick(Some(path.as_slice()));
        assert_eq!(animator.position(), Position::new(3, 1));

        animator.tick(None);
        assert_eq!(animator.position(), home);
        assert_eq!(animator.path_index(), 0);
        assert_eq!(animator.state(), BotState::IdleAtStart);

        animator.tick(Some(&[][..]));
        assert_eq!(animator.state(), BotState::IdleAtStart);
    }

    #[test]
    fn test_bot_loops_route() {
        let path = line(5);
        let mut animator = BotAnimator::new(path[0], DEFAULT_STEP_INTERVAL);
        for lap in 0..3 {
            for step in 1..=path.len() {
                animator.tick(Some(path.as_slice()));
                assert_eq!(animator.path_index(), step % path.len(), "lap {} step {}", lap, step);
            }
            assert_eq!(animator.path_index(), 0);
            assert_eq!(animator.position(), path[0]);
        }
    }

    #[test]
    fn test_bot_survives_path_shrinking() {
        let long = line(8);
        let mut animator = BotAnimator::new(long[0], DEFAULT_STEP_INTERVAL);
        for _ in 0..6 {
            animator.tick(Some(long.as_slice()));
        }
        assert_eq!(animator.path_index(), 6);

        let short = line(3);
        animator.tick(Some(short.as_slice()));
        assert_eq!(animator.path_index(), 0);
        assert_eq!(animator.position(), short[0]);
        animator.tick(Some(short.as_slice()));
        assert_eq!(animator.position(), short[1]);
    }

    #[test]
    fn test_update_is_time_gated() {
        let path = line(4);
        let mut animator = BotAnimator::new(path[0], Duration::from_millis(200));

        assert!(!animator.update(0.1, Some(path.as_slice())));
        assert!(!animator.update(0.2, Some(path.as_slice())));
        assert!(animator.update(0.25, Some(path.as_slice())));
        assert_eq!(animator.path_index(), 1);

        // Many frames inside one interval only move once
        for frame in 1..10 {
            animator.update(0.25 + frame as f64 * 0.016, Some(path.as_slice()));
        }
        assert_eq!(animator.path_index(), 1);

        assert!(animator.update(0.5, Some(path.as_slice())));
        assert_eq!(animator.path_index(), 2);
    }
}
