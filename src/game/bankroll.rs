//! The player's pot.

/// Money in the machine for the current session.
///
/// The balance is signed: spends are validated before they happen, but the
/// net pot reported at the end of a session is often negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bankroll {
    /// Current balance.
    balance: i64,
    /// Balance the session started with.
    starting: i64,
}

impl Bankroll {
    /// Open a bankroll with a starting balance.
    #[must_use]
    pub const fn new(starting: i64) -> Self {
        Self {
            balance: starting,
            starting,
        }
    }

    /// Current balance.
    #[must_use]
    pub const fn balance(&self) -> i64 {
        self.balance
    }

    /// Balance the session started with.
    #[must_use]
    pub const fn starting(&self) -> i64 {
        self.starting
    }

    /// Winnings (or losses) since the session started.
    #[must_use]
    pub const fn net_pot(&self) -> i64 {
        self.balance - self.starting
    }

    /// Whether the balance covers `cost`.
    #[must_use]
    pub const fn can_afford(&self, cost: i64) -> bool {
        self.balance >= cost
    }

    /// Deduct `cost` if the balance covers it.
    ///
    /// Returns `false` and leaves the balance alone otherwise.
    pub fn try_spend(&mut self, cost: i64) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.balance -= cost;
        true
    }

    /// Add winnings to the balance.
    pub fn credit(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(i64::from(amount));
    }

    /// Start over with the original balance.
    pub fn reset(&mut self) {
        self.balance = self.starting;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spend_and_credit() {
        let mut bank = Bankroll::new(200);
        assert!(bank.try_spend(5));
        bank.credit(250);
        assert_eq!(bank.balance(), 445);
        assert_eq!(bank.net_pot(), 245);
    }

    #[test]
    fn test_insufficient_funds_leaves_balance() {
        let mut bank = Bankroll::new(4);
        assert!(!bank.try_spend(5));
        assert_eq!(bank.balance(), 4);
        assert!(bank.try_spend(4));
        assert_eq!(bank.balance(), 0);
    }

    #[test]
    fn test_net_pot_negative_and_reset() {
        let mut bank = Bankroll::new(200);
        assert!(bank.try_spend(11));
        assert_eq!(bank.net_pot(), -11);
        bank.reset();
        assert_eq!(bank.balance(), 200);
        assert_eq!(bank.starting(), 200);
    }
}
