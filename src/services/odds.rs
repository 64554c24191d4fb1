use std::collections::HashMap;

use crate::models::fixture::AverageOdds;
use crate::models::football_api::ApiFixtureOdds;

pub const MATCH_WINNER_LABEL: &str = "Match Winner";

#[derive(Debug, Default, Clone, Copy)]
struct RunningMean {
    sum: f64,
    count: u32,
}

impl RunningMean {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Average the "Match Winner" quotes of every bookmaker, per outcome and per
/// fixture. Non-numeric quotes are ignored; outcomes nobody quoted stay `None`
/// and fixtures without any usable quote are left out.
pub fn average_match_winner_odds(entries: &[ApiFixtureOdds]) -> HashMap<i64, AverageOdds> {
    let mut totals: HashMap<i64, [RunningMean; 3]> = HashMap::new();

    for entry in entries {
        let slots = totals.entry(entry.fixture.fixture_id).or_default();
        let quotes = entry
            .bookmakers
            .iter()
            .flat_map(|bookmaker| bookmaker.bets.iter())
            .filter(|bet| bet.label_name == MATCH_WINNER_LABEL)
            .flat_map(|bet| bet.values.iter());

        for quote in quotes {
            let slot = match quote.value.as_str() {
                "Home" => 0,
                "Draw" => 1,
                "Away" => 2,
                _ => continue,
            };
            match quote.odd_value() {
                Some(odd) => slots[slot].push(odd),
                None => tracing::debug!(
                    "Discarding non-numeric {} quote {:?} for fixture {}",
                    quote.value, quote.odd, entry.fixture.fixture_id
                ),
            }
        }
    }

    totals
        .into_iter()
        .map(|(fixture_id, [home, draw, away])| {
            (fixture_id, AverageOdds {
                home: home.mean(),
                draw: draw.mean(),
                away: away.mean(),
            })
        })
        .filter(|(_, odds)| !odds.is_empty())
        .collect()
}
