use std::{fs::File, path::Path, time::SystemTime};

use lottery::{DipSettings, Draw, Ledger, LotteryError, MatchCount, TicketSet};
use rand::{rngs::StdRng, RngCore, SeedableRng};

use crate::{
    format_duration,
    paramset::{ExperimentId, ParamSet},
    settings::GameSettings,
};

pub struct Iteration {
    pub paramset: ParamSet,
    pub game: GameSettings,
    pub iteration_idx: usize,
    pub paramset_dir: String,
}

impl Iteration {
    pub fn start(&mut self) -> anyhow::Result<()> {
        let path = format!(
            "{}/iteration_{}__WIP__.csv",
            self.paramset_dir, self.iteration_idx
        );
        anyhow::ensure!(!Path::new(&path).exists(), "File already exists: {path}");
        let mut writer = csv::Writer::from_path(&path)?;

        let start_time = SystemTime::now();

        let summary = match self.paramset.exp_id {
            ExperimentId::JackpotHunt => {
                match self.run_jackpot_hunt(self.iteration_idx as u64, &mut writer)? {
                    Some(draws) => format!("jackpot after {draws} draws"),
                    None => format!("no jackpot in {} draws", self.paramset.num_rounds),
                }
            }
            ExperimentId::DailyPlay => {
                let (days, balance) =
                    self.run_daily_play(self.iteration_idx as u64, &mut writer)?;
                format!("bankroll {balance} after {days} days")
            }
        };
        writer.flush()?;
        std::fs::rename(&path, path.replace("__WIP__", ""))?;

        let duration = format_duration(SystemTime::now().duration_since(start_time)?);
        tracing::info!(
            "ParamSet:{}, Iteration:{} completed. Duration:{}, {}",
            self.paramset.id,
            self.iteration_idx,
            duration,
            summary
        );
        Ok(())
    }

    /// Buys one set of lucky dips and draws until one of them matches every ball.
    /// Returns how many draws it took, or `None` if the draw budget ran out first.
    /// Draws that come within one ball of the jackpot are recorded.
    fn run_jackpot_hunt(
        &self,
        seed: u64,
        writer: &mut csv::Writer<File>,
    ) -> anyhow::Result<Option<u32>> {
        writer.write_record(["draw", "max_matched", "drawn_numbers"])?;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut ledger = Ledger::new(self.paramset.initial_bankroll);
        let tickets =
            TicketSet::generate(&mut ledger, &self.game.dip, self.paramset.num_tickets, &mut rng)?;
        tracing::debug!("Lucky dips:\n{tickets}");

        let mut lotto = Draw::with_seed(self.game.draw.clone(), rng.next_u64())?;
        let jackpot: MatchCount = lotto.draw_count();
        for draw_idx in 1..=self.paramset.num_rounds {
            lotto.draw();
            let max_matched = lotto.check(&tickets)?.iter().copied().max().unwrap_or(0);
            if max_matched + 1 >= jackpot {
                writer.write_record(&[
                    draw_idx.to_string(),
                    max_matched.to_string(),
                    format!("{:?}", lotto.drawn_numbers().unwrap_or_default()),
                ])?;
            }
            if max_matched == jackpot {
                return Ok(Some(draw_idx));
            }
        }
        Ok(None)
    }

    /// Picks a set of numbers once, then pays for and plays them in a fresh
    /// lottery every day. Returns the number of days played and the final bankroll.
    fn run_daily_play(
        &self,
        seed: u64,
        writer: &mut csv::Writer<File>,
    ) -> anyhow::Result<(u32, f64)> {
        writer.write_record(["day", "winnings", "bankroll"])?;

        let mut rng = StdRng::seed_from_u64(seed);
        // Picking the numbers is free, playing them is not.
        let my_numbers = TicketSet::generate(
            &mut Ledger::default(),
            &DipSettings {
                cost_per_ticket: 0.0,
                ..self.game.dip
            },
            self.paramset.num_tickets,
            &mut rng,
        )?;

        let mut ledger = Ledger::new(self.paramset.initial_bankroll);
        let mut days_played: u32 = 0;
        for day in 0..self.paramset.num_rounds {
            let todays_tickets = match TicketSet::supplied(&mut ledger, &self.game.dip, &my_numbers)
            {
                Ok(tickets) => tickets,
                Err(e @ LotteryError::InsufficientFunds { .. }) => {
                    tracing::warn!(
                        "ParamSet:{}, Iteration:{} stopped on day {day}: {e}",
                        self.paramset.id,
                        self.iteration_idx
                    );
                    break;
                }
                Err(e) => return Err(e.into()),
            };
            let before_payout = ledger.amount();

            let mut lotto = Draw::with_seed(self.game.draw.clone(), rng.next_u64())?;
            lotto.draw();
            lotto.check(&todays_tickets)?;
            let balance = lotto.payout(&mut ledger, None, true)?;
            tracing::debug!("Day {day}: {lotto}, {ledger}");

            writer.write_record(&[
                day.to_string(),
                (balance - before_payout).to_string(),
                balance.to_string(),
            ])?;
            days_played += 1;
        }
        Ok((days_played, ledger.amount()))
    }
}
