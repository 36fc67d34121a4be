use strum_macros::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
#[repr(u8)]
pub enum ExperimentId {
    /// How many draws until one of a fixed set of lucky dips hits the jackpot
    JackpotHunt = 1,
    /// How the bankroll evolves when playing the same numbers every day
    DailyPlay = 2,
}

impl std::str::FromStr for ExperimentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" | "JackpotHunt" => Ok(ExperimentId::JackpotHunt),
            "2" | "DailyPlay" => Ok(ExperimentId::DailyPlay),
            _ => Err(format!("Invalid experiment ID: {}", s)),
        }
    }
}

pub const PARAMSET_CSV_COLUMNS: &[&str] = &[
    "paramset",
    "exp_id",
    "num_tickets",
    "initial_bankroll",
    "num_rounds",
    "num_iterations",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ParamSet {
    pub id: u16,
    pub exp_id: ExperimentId,
    /// Tickets bought per round (JackpotHunt buys them only once)
    pub num_tickets: usize,
    pub initial_bankroll: f64,
    /// Max number of draws (JackpotHunt) or number of days (DailyPlay)
    pub num_rounds: u32,
    pub num_iterations: usize,
}

impl ParamSet {
    pub fn new_all_paramsets(exp_id: ExperimentId) -> Vec<Self> {
        match exp_id {
            ExperimentId::JackpotHunt => Self::new_jackpot_hunt_paramsets(),
            ExperimentId::DailyPlay => Self::new_daily_play_paramsets(),
        }
    }

    fn new_jackpot_hunt_paramsets() -> Vec<ParamSet> {
        let nums_tickets: &[usize] = &[1, 6, 12, 24, 48];
        let initial_bankroll: f64 = 20.0;
        // A little under 6 times the number of 5-ball combinations of 42
        let num_rounds: u32 = 5_000_000;
        let num_iterations: usize = 20;

        nums_tickets
            .iter()
            .enumerate()
            .map(|(i, &num_tickets)| ParamSet {
                id: (i + 1) as u16,
                exp_id: ExperimentId::JackpotHunt,
                num_tickets,
                initial_bankroll,
                num_rounds,
                num_iterations,
            })
            .collect()
    }

    fn new_daily_play_paramsets() -> Vec<ParamSet> {
        let nums_tickets: &[usize] = &[12, 24];
        let initial_bankrolls: &[f64] = &[70.0, 140.0];
        let nums_days: &[u32] = &[30, 365];
        let num_iterations: usize = 100;

        let mut id: u16 = 1;
        let mut paramsets: Vec<ParamSet> = Vec::new();
        for &num_tickets in nums_tickets {
            for &initial_bankroll in initial_bankrolls {
                for &num_rounds in nums_days {
                    paramsets.push(ParamSet {
                        id,
                        exp_id: ExperimentId::DailyPlay,
                        num_tickets,
                        initial_bankroll,
                        num_rounds,
                        num_iterations,
                    });
                    id += 1;
                }
            }
        }
        paramsets
    }

    pub fn as_csv_record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            (self.exp_id as u8).to_string(),
            self.num_tickets.to_string(),
            self.initial_bankroll.to_string(),
            self.num_rounds.to_string(),
            self.num_iterations.to_string(),
        ]
    }
}
