use std::fmt::Display;

use rand::{rngs::StdRng, Rng, SeedableRng};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{Ledger, LotteryError, MatchCount, Number, RewardSchedule, TicketSource};

/// Matching fewer numbers than this is not worth announcing.
const MIN_ANNOUNCED_MATCHES: MatchCount = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawSettings {
    /// Balls are numbered `1..=pool_size`.
    pub pool_size: Number,
    pub draw_count: usize,
    pub reward_schedule: RewardSchedule,
}

impl DrawSettings {
    pub fn validate(&self) -> Result<(), LotteryError> {
        if self.reward_schedule.len() != self.draw_count + 1 {
            return Err(LotteryError::configuration(format!(
                "length of reward schedule ({}) should equal the draw count ({}) plus 1 \
                 (for the 0 balls matched case)",
                self.reward_schedule.len(),
                self.draw_count
            )));
        }
        if self.draw_count > self.pool_size as usize {
            return Err(LotteryError::configuration(format!(
                "cannot draw {} distinct balls from a pool of {}",
                self.draw_count, self.pool_size
            )));
        }
        Ok(())
    }
}

/// A lottery that draws winning numbers, scores tickets against them and pays out.
///
/// The last draw and the last check results are kept until they are replaced,
/// so the same draw can score several ticket sets and the same results can be
/// paid out more than once.
pub struct Draw<R = StdRng> {
    settings: DrawSettings,
    rng: R,
    drawn_numbers: Option<Vec<Number>>,
    results: Option<Vec<MatchCount>>,
}

impl Draw<StdRng> {
    /// A draw seeded from OS entropy.
    pub fn new(settings: DrawSettings) -> Result<Self, LotteryError> {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    pub fn with_seed(settings: DrawSettings, seed: u64) -> Result<Self, LotteryError> {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Draw<R> {
    pub fn with_rng(settings: DrawSettings, rng: R) -> Result<Self, LotteryError> {
        settings.validate()?;
        Ok(Self {
            settings,
            rng,
            drawn_numbers: None,
            results: None,
        })
    }

    /// Draws a fresh set of winning numbers, replacing the previous ones.
    pub fn draw(&mut self) -> &[Number] {
        let mut numbers: Vec<Number> = rand::seq::index::sample(
            &mut self.rng,
            self.settings.pool_size as usize,
            self.settings.draw_count,
        )
        .into_iter()
        .map(|i| i as Number + 1)
        .collect();
        numbers.sort_unstable();
        tracing::debug!("Drawn numbers: {:?}", numbers);
        self.drawn_numbers.insert(numbers).as_slice()
    }

    /// Counts, for every ticket, how many of its numbers were drawn.
    /// The counts are cached for [`Draw::payout`].
    pub fn check<'a>(
        &mut self,
        tickets: impl Into<TicketSource<'a>>,
    ) -> Result<&[MatchCount], LotteryError> {
        let drawn: FxHashSet<Number> = self
            .drawn_numbers
            .as_deref()
            .ok_or(LotteryError::NoDrawYet)?
            .iter()
            .copied()
            .collect();

        let tickets: TicketSource<'a> = tickets.into();
        let results: Vec<MatchCount> = tickets
            .tickets()
            .iter()
            .map(|ticket| count_matches(ticket, &drawn))
            .collect();
        tracing::debug!("Match counts: {:?}", results);
        Ok(self.results.insert(results).as_slice())
    }
}

impl<R> Draw<R> {
    /// Credits the ledger with the reward of every match count, in order, and
    /// returns the new balance. Without explicit counts, the ones cached by the
    /// last [`Draw::check`] are used.
    ///
    /// Every count is looked up before anything is credited, so an out of range
    /// count leaves the ledger untouched.
    pub fn payout(
        &self,
        ledger: &mut Ledger,
        match_counts: Option<&[MatchCount]>,
        verbose: bool,
    ) -> Result<f64, LotteryError> {
        let match_counts = match match_counts {
            Some(match_counts) => match_counts,
            None => self.results.as_deref().ok_or(LotteryError::NoResultsYet)?,
        };
        let rewards = match_counts
            .iter()
            .map(|&matched| {
                self.settings
                    .reward_schedule
                    .reward(matched)
                    .map(|reward| (matched, reward))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (matched, reward) in rewards {
            if verbose && matched >= MIN_ANNOUNCED_MATCHES {
                tracing::info!("Matched {matched} numbers, you win {reward} pounds.");
            }
            ledger.credit(reward);
        }
        Ok(ledger.amount())
    }

    pub fn drawn_numbers(&self) -> Option<&[Number]> {
        self.drawn_numbers.as_deref()
    }

    /// Match counts of the last check.
    pub fn results(&self) -> Option<&[MatchCount]> {
        self.results.as_deref()
    }

    pub fn settings(&self) -> &DrawSettings {
        &self.settings
    }

    pub fn pool_size(&self) -> Number {
        self.settings.pool_size
    }

    pub fn draw_count(&self) -> usize {
        self.settings.draw_count
    }

    pub fn reward_schedule(&self) -> &RewardSchedule {
        &self.settings.reward_schedule
    }
}

impl<R> Display for Draw<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.drawn_numbers {
            Some(numbers) => f.write_fmt(format_args!("Draw({:?})", numbers)),
            None => f.write_str("Draw(None)"),
        }
    }
}

/// Size of the intersection of two sets of numbers. Repeated numbers count once.
pub fn match_count(ticket: &[Number], drawn: &[Number]) -> MatchCount {
    let drawn: FxHashSet<Number> = drawn.iter().copied().collect();
    count_matches(ticket, &drawn)
}

fn count_matches(ticket: &[Number], drawn: &FxHashSet<Number>) -> MatchCount {
    let ticket: FxHashSet<Number> = ticket.iter().copied().collect();
    ticket.intersection(drawn).count()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::{DipSettings, Ticket, TicketSet};

    use super::*;

    // Ball numbers that are never drawn from a pool of 42
    const NEVER_DRAWN: [Number; 5] = [100, 101, 102, 103, 104];

    fn settings() -> DrawSettings {
        DrawSettings {
            pool_size: 42,
            draw_count: 5,
            reward_schedule: vec![0.0, 0.0, 0.0, 3.5, 200.0, 80000.0].into(),
        }
    }

    /// A ticket sharing exactly `k` numbers with `drawn`
    fn ticket_matching(drawn: &[Number], k: usize) -> Ticket {
        drawn[..k]
            .iter()
            .chain(NEVER_DRAWN[k..].iter())
            .copied()
            .collect()
    }

    #[test]
    fn test_draw() {
        for seed in 0..200 {
            let mut lotto = Draw::with_seed(settings(), seed).unwrap();
            let drawn = lotto.draw().to_vec();

            assert_eq!(drawn.len(), lotto.draw_count());
            assert!(drawn.windows(2).all(|w| w[0] < w[1]), "{drawn:?}");
            assert!(drawn.iter().all(|&n| (1..=lotto.pool_size()).contains(&n)));
            assert_eq!(lotto.drawn_numbers(), Some(drawn.as_slice()));
        }
    }

    #[test]
    fn test_draw_whole_pool() {
        let mut lotto = Draw::with_seed(
            DrawSettings {
                pool_size: 5,
                draw_count: 5,
                reward_schedule: vec![0.0; 6].into(),
            },
            3,
        )
        .unwrap();
        assert_eq!(lotto.draw(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_draw_covers_pool() {
        let mut lotto = Draw::with_seed(settings(), 11).unwrap();
        let mut seen: HashSet<Number> = HashSet::new();
        for _ in 0..500 {
            seen.extend(lotto.draw().iter().copied());
        }
        assert_eq!(seen, (1..=42).collect());
    }

    #[test]
    fn test_draw_is_reproducible() {
        let mut lotto1 = Draw::with_seed(settings(), 2).unwrap();
        let mut lotto2 = Draw::with_seed(settings(), 2).unwrap();
        for _ in 0..10 {
            assert_eq!(lotto1.draw(), lotto2.draw());
        }
    }

    #[test]
    fn test_invalid_reward_schedule() {
        // The 0-match tier is missing
        let res = Draw::new(DrawSettings {
            pool_size: 42,
            draw_count: 5,
            reward_schedule: vec![0.0, 0.0, 3.5, 200.0, 80000.0].into(),
        });
        assert!(matches!(res, Err(LotteryError::Configuration(_))));
    }

    #[test]
    fn test_draw_count_exceeds_pool() {
        let res = Draw::new(DrawSettings {
            pool_size: 4,
            draw_count: 5,
            reward_schedule: vec![0.0; 6].into(),
        });
        assert!(matches!(res, Err(LotteryError::Configuration(_))));
    }

    #[test]
    fn test_check_before_draw() {
        let mut lotto = Draw::with_seed(settings(), 0).unwrap();
        let numbers: Vec<Ticket> = vec![vec![1, 2, 3, 4, 5]];
        assert_eq!(lotto.check(&numbers), Err(LotteryError::NoDrawYet));
        assert_eq!(lotto.results(), None);
    }

    #[test]
    fn test_check() {
        let mut lotto = Draw::with_seed(settings(), 2).unwrap();
        let drawn = lotto.draw().to_vec();

        let numbers: Vec<Ticket> = (0..=5).rev().map(|k| ticket_matching(&drawn, k)).collect();
        let mut ledger = Ledger::new(20.0);
        let dip = DipSettings {
            balls_per_ticket: 5,
            max_number: 42,
            cost_per_ticket: 0.35,
        };
        let lucky_dip = TicketSet::supplied(&mut ledger, &dip, &numbers).unwrap();

        let expected: Vec<MatchCount> = vec![5, 4, 3, 2, 1, 0];
        assert_eq!(lotto.check(&lucky_dip).unwrap(), expected.as_slice());
        // A raw matrix is scored the same way
        assert_eq!(lotto.check(&numbers).unwrap(), expected.as_slice());
        assert_eq!(lotto.results(), Some(expected.as_slice()));
    }

    #[test]
    fn test_check_is_idempotent() {
        let mut lotto = Draw::with_seed(settings(), 9).unwrap();
        lotto.draw();
        let numbers: Vec<Ticket> = (1..=40).map(|n| (n..n + 3).collect()).collect();

        let first = lotto.check(&numbers).unwrap().to_vec();
        let second = lotto.check(&numbers).unwrap().to_vec();
        assert_eq!(first, second);
        assert_eq!(first.len(), numbers.len());
    }

    #[test]
    fn test_check_collapses_duplicates() {
        let mut lotto = Draw::with_seed(settings(), 4).unwrap();
        let drawn = lotto.draw().to_vec();

        let numbers: Vec<Ticket> = vec![vec![drawn[0], drawn[0], drawn[0], drawn[1], 100]];
        assert_eq!(lotto.check(&numbers).unwrap(), &[2]);
    }

    #[test]
    fn test_match_count() {
        assert_eq!(match_count(&[1, 2, 3, 4, 5], &[4, 5, 6, 7, 8]), 2);
        assert_eq!(match_count(&[4, 5, 6, 7, 8], &[1, 2, 3, 4, 5]), 2);
        assert_eq!(match_count(&[3, 25, 27, 27, 41], &[25, 27, 30]), 2);
        assert_eq!(match_count(&[25, 27, 30], &[3, 25, 27, 27, 41]), 2);
        assert_eq!(match_count(&[], &[1, 2, 3]), 0);
    }

    #[test]
    fn test_payout_every_tier() {
        let schedule = settings().reward_schedule;
        for k in 0..=5 {
            let mut lotto = Draw::with_seed(settings(), 2).unwrap();
            let drawn = lotto.draw().to_vec();
            let numbers = vec![ticket_matching(&drawn, k)];
            assert_eq!(lotto.check(&numbers).unwrap(), &[k]);

            let mut ledger = Ledger::new(20.0);
            let balance = lotto.payout(&mut ledger, None, true).unwrap();
            assert_eq!(balance, 20.0 + schedule.reward(k).unwrap());
        }
    }

    #[test]
    fn test_payout_with_explicit_counts() {
        let lotto = Draw::with_seed(settings(), 0).unwrap();
        let mut ledger = Ledger::new(0.0);

        // No draw nor check is needed when the counts are given
        let balance = lotto
            .payout(&mut ledger, Some(&[5, 4, 4, 3, 0]), false)
            .unwrap();
        assert_eq!(balance, 80000.0 + 200.0 + 200.0 + 3.5);
    }

    #[test]
    fn test_payout_can_repeat() {
        let mut lotto = Draw::with_seed(settings(), 1).unwrap();
        let drawn = lotto.draw().to_vec();
        lotto.check(&vec![ticket_matching(&drawn, 4)]).unwrap();

        let mut ledger = Ledger::new(0.0);
        lotto.payout(&mut ledger, None, false).unwrap();
        assert_eq!(lotto.payout(&mut ledger, None, false), Ok(400.0));
    }

    #[test]
    fn test_payout_out_of_range() {
        let lotto = Draw::with_seed(settings(), 0).unwrap();
        let mut ledger = Ledger::new(20.0);

        let res = lotto.payout(&mut ledger, Some(&[5, 6]), false);
        assert_eq!(res, Err(LotteryError::IndexOutOfRange { index: 6, len: 6 }));
        // The valid 5-match was not credited either
        assert_eq!(ledger.amount(), 20.0);
    }

    #[test]
    fn test_payout_before_check() {
        let mut lotto = Draw::with_seed(settings(), 0).unwrap();
        lotto.draw();
        let mut ledger = Ledger::new(20.0);
        assert_eq!(
            lotto.payout(&mut ledger, None, false),
            Err(LotteryError::NoResultsYet)
        );
    }

    #[test]
    fn test_display() {
        let mut lotto = Draw::with_seed(settings(), 0).unwrap();
        assert_eq!(lotto.to_string(), "Draw(None)");

        let drawn = lotto.draw().to_vec();
        assert_eq!(lotto.to_string(), format!("Draw({:?})", drawn));
    }
}
