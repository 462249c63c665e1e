//! Role and alignment types.

use serde::{Deserialize, Serialize};

/// Faction membership. Always derived from [`Role`], never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Good,
    Evil,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Merlin,
    Percival,
    #[serde(rename = "Loyal_Servant")]
    LoyalServant,
    Morgana,
    Assassin,
    Mordred,
    Minion,
    Oberon,
}

impl Role {
    pub const fn alignment(self) -> Alignment {
        match self {
            Role::Morgana | Role::Assassin | Role::Mordred | Role::Minion | Role::Oberon => {
                Alignment::Evil
            }
            Role::Merlin | Role::Percival | Role::LoyalServant => Alignment::Good,
        }
    }

    pub const fn is_evil(self) -> bool {
        matches!(self.alignment(), Alignment::Evil)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Role::Merlin => "Merlin",
            Role::Percival => "Percival",
            Role::LoyalServant => "Loyal Servant",
            Role::Morgana => "Morgana",
            Role::Assassin => "Assassin",
            Role::Mordred => "Mordred",
            Role::Minion => "Minion",
            Role::Oberon => "Oberon",
        }
    }
}
