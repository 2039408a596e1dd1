use std::fmt::{Display, Formatter};

use rand::prelude::*;
use rand_distr::{Normal, NormalError};

const SYMBOLS: [&str; 4] = ["ACME", "GLOBX", "INITECH", "UMBRL"];
const MID_PRICE: f64 = 100.0;
const STD_DEV: f64 = 2.5;
const MAX_QUANTITY: u32 = 500;

/// A single fictional trade, sent as one line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub symbol: &'static str,
    pub price: f64,
    pub quantity: u32,
}

impl Display for Tick {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:.2} x{}", self.symbol, self.price, self.quantity)
    }
}

/// For demonstration purposes, generates a random stream of [Tick]s.
pub struct Ticker {
    prices: Normal<f64>,
}

impl Ticker {
    pub fn new() -> Result<Self, NormalError> {
        Ok(Self {
            // our fictional instruments all trade somewhere around this price.
            prices: Normal::new(MID_PRICE, STD_DEV)?,
        })
    }

    pub fn next_tick(&self) -> Tick {
        let mut rng = thread_rng();
        Tick {
            symbol: SYMBOLS.choose(&mut rng).copied().unwrap_or(SYMBOLS[0]),
            price: self.prices.sample(&mut rng).max(0.01),
            quantity: rng.gen_range(1..=MAX_QUANTITY),
        }
    }
}
