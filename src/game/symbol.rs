//! Reel symbols and the paytable.

use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;

/// A fruit printed on the reels.
///
/// The discriminant is the symbol's index on the reel strip and in the
/// paytable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Symbol {
    /// Orange, the most common win.
    #[default]
    Orange = 0,
    /// Lucky seven.
    Seven = 1,
    /// Single bar.
    Bar = 2,
    /// Pear.
    Pear = 3,
    /// Banana.
    Banana = 4,
    /// Cherry, the jackpot.
    Cherry = 5,
}

impl Symbol {
    /// Every symbol in index order.
    pub const ALL: [Self; 6] = [
        Self::Orange,
        Self::Seven,
        Self::Bar,
        Self::Pear,
        Self::Banana,
        Self::Cherry,
    ];

    /// Number of distinct symbols.
    pub const COUNT: usize = Self::ALL.len();

    /// Look up a symbol by index.
    #[must_use]
    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Index of this symbol on the strip.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Orange => "orange",
            Self::Seven => "seven",
            Self::Bar => "bar",
            Self::Pear => "pear",
            Self::Banana => "banana",
            Self::Cherry => "cherry",
        }
    }

    /// Cash paid for a line of five of this symbol.
    #[must_use]
    pub const fn prize(self) -> u32 {
        match self {
            Self::Orange => 15,
            Self::Seven => 20,
            Self::Bar => 30,
            Self::Pear => 50,
            Self::Banana => 100,
            Self::Cherry => 250,
        }
    }

    /// Draw a uniformly random symbol.
    pub fn draw<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let max = (Self::COUNT - 1) as i32;
        Self::from_index(rng.uniform_int(0, max)).unwrap_or_default()
    }

    /// The paytable: every symbol with its prize, cheapest first.
    pub fn paytable() -> impl Iterator<Item = (Self, u32)> {
        Self::ALL.into_iter().map(|s| (s, s.prize()))
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
