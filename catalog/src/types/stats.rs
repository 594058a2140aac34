//! Base stats and stat labels

use pokedex_protocol::pokeapi::StatEntry;

/// The six base stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stat {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::Hp,
        Stat::Attack,
        Stat::Defense,
        Stat::SpecialAttack,
        Stat::SpecialDefense,
        Stat::Speed,
    ];

    /// Parse a PokeAPI stat name (`"special-attack"`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "hp" => Some(Stat::Hp),
            "attack" => Some(Stat::Attack),
            "defense" => Some(Stat::Defense),
            "special-attack" => Some(Stat::SpecialAttack),
            "special-defense" => Some(Stat::SpecialDefense),
            "speed" => Some(Stat::Speed),
            _ => None,
        }
    }

    /// Short display label
    pub fn label(&self) -> &'static str {
        match self {
            Stat::Hp => "HP",
            Stat::Attack => "Attack",
            Stat::Defense => "Defense",
            Stat::SpecialAttack => "Sp. Atk",
            Stat::SpecialDefense => "Sp. Def",
            Stat::Speed => "Speed",
        }
    }
}

/// Display label for a raw stat name; unknown names are returned unchanged
pub fn stat_label(name: &str) -> String {
    Stat::from_name(name)
        .map(|s| s.label().to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Optional numeric stats attached to a catalog entry
///
/// PokeAPI fills the six base stats; the REST and GraphQL backends only
/// report max CP and max HP.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStats {
    pub hp: Option<u32>,
    pub attack: Option<u32>,
    pub defense: Option<u32>,
    pub special_attack: Option<u32>,
    pub special_defense: Option<u32>,
    pub speed: Option<u32>,
    pub max_cp: Option<u32>,
    pub max_hp: Option<u32>,
}

impl BaseStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a base stat
    pub fn get(&self, stat: Stat) -> Option<u32> {
        match stat {
            Stat::Hp => self.hp,
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::SpecialAttack => self.special_attack,
            Stat::SpecialDefense => self.special_defense,
            Stat::Speed => self.speed,
        }
    }

    /// Set a base stat
    pub fn set(&mut self, stat: Stat, value: u32) {
        match stat {
            Stat::Hp => self.hp = Some(value),
            Stat::Attack => self.attack = Some(value),
            Stat::Defense => self.defense = Some(value),
            Stat::SpecialAttack => self.special_attack = Some(value),
            Stat::SpecialDefense => self.special_defense = Some(value),
            Stat::Speed => self.speed = Some(value),
        }
    }

    /// Sum of the known base stats, None if none are known
    pub fn total(&self) -> Option<u32> {
        let known: Vec<u32> = Stat::ALL.iter().filter_map(|s| self.get(*s)).collect();
        if known.is_empty() {
            None
        } else {
            Some(known.iter().sum())
        }
    }

    /// True if nothing at all is known
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Build from PokeAPI stat entries, ignoring unknown stat names
    pub fn from_pokeapi(entries: &[StatEntry]) -> Self {
        let mut stats = Self::new();
        for entry in entries {
            if let Some(stat) = Stat::from_name(&entry.stat.name) {
                stats.set(stat, entry.base_stat);
            }
        }
        stats
    }
}
