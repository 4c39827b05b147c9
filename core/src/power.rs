use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUp {
    /// Passive: absorbs the next mine hit.
    Firewall,
    /// Reveals a 3×3 block without ever exposing a mine.
    Scanner,
    /// Opens a random safe cell and its cascade.
    Network,
    /// Restores the board to before the last action.
    Undo,
}

impl PowerUp {
    pub const ALL: [PowerUp; 4] = [Self::Firewall, Self::Scanner, Self::Network, Self::Undo];

    pub const fn key(self) -> &'static str {
        use PowerUp::*;
        match self {
            Firewall => "firewall",
            Scanner => "scanner",
            Network => "network",
            Undo => "undo",
        }
    }

    pub const fn label(self) -> &'static str {
        use PowerUp::*;
        match self {
            Firewall => "Firewall",
            Scanner => "Port Scanner",
            Network => "Network Map",
            Undo => "Undo",
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PowerUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PowerUp {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|power| power.key().eq_ignore_ascii_case(s.trim()))
            .ok_or(GameError::UnknownPowerUp)
    }
}

/// Charges per power-up, indexed by [`PowerUp`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerLoadout([u8; 4]);

impl PowerLoadout {
    pub const fn new(firewall: u8, scanner: u8, network: u8, undo: u8) -> Self {
        Self([firewall, scanner, network, undo])
    }

    pub const fn get(&self, power: PowerUp) -> u8 {
        self.0[power.slot()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PowerUp, u8)> + '_ {
        PowerUp::ALL.into_iter().map(move |power| (power, self.get(power)))
    }
}

impl Default for PowerLoadout {
    fn default() -> Self {
        Self::new(1, 2, 2, 3)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerState {
    initial: PowerLoadout,
    remaining: PowerLoadout,
}

impl PowerState {
    pub fn new(initial: PowerLoadout) -> Self {
        Self {
            initial,
            remaining: initial,
        }
    }

    pub fn charges(&self, power: PowerUp) -> u8 {
        self.remaining.get(power)
    }

    pub fn has_charge(&self, power: PowerUp) -> bool {
        self.charges(power) > 0
    }

    pub fn remaining(&self) -> PowerLoadout {
        self.remaining
    }

    pub fn check(&self, power: PowerUp) -> Result<()> {
        if self.has_charge(power) {
            Ok(())
        } else {
            Err(GameError::NoCharges(power))
        }
    }

    /// Takes one charge, failing without change when none are left.
    pub fn consume(&mut self, power: PowerUp) -> Result<()> {
        self.check(power)?;
        self.remaining.0[power.slot()] -= 1;
        log::debug!("{} used, {} left", power, self.charges(power));
        Ok(())
    }

    /// Charges spent across all power-ups this game.
    pub fn used_count(&self) -> u16 {
        PowerUp::ALL
            .into_iter()
            .map(|power| u16::from(self.initial.get(power) - self.remaining.get(power)))
            .sum()
    }
}

impl Default for PowerState {
    fn default() -> Self {
        Self::new(Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_loadout_charges() {
        let powers = PowerState::default();

        assert_eq!(powers.charges(PowerUp::Firewall), 1);
        assert_eq!(powers.charges(PowerUp::Scanner), 2);
        assert_eq!(powers.charges(PowerUp::Network), 2);
        assert_eq!(powers.charges(PowerUp::Undo), 3);
        assert_eq!(powers.used_count(), 0);
    }

    #[test]
    fn consume_stops_at_zero() {
        let mut powers = PowerState::new(PowerLoadout::new(1, 0, 0, 0));

        assert_eq!(powers.consume(PowerUp::Firewall), Ok(()));
        assert_eq!(
            powers.consume(PowerUp::Firewall),
            Err(GameError::NoCharges(PowerUp::Firewall))
        );
        assert_eq!(powers.charges(PowerUp::Firewall), 0);
        assert_eq!(powers.used_count(), 1);
    }

    #[test]
    fn used_count_sums_all_power_ups() {
        let mut powers = PowerState::default();

        powers.consume(PowerUp::Scanner).unwrap();
        powers.consume(PowerUp::Scanner).unwrap();
        powers.consume(PowerUp::Undo).unwrap();

        assert_eq!(powers.used_count(), 3);
    }

    #[test]
    fn parses_keys() {
        assert_eq!("network".parse::<PowerUp>(), Ok(PowerUp::Network));
        assert_eq!("jackhammer".parse::<PowerUp>(), Err(GameError::UnknownPowerUp));
    }
}
