use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tournament phase ("fase"). Serialized with the label used in the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "Grupo")]
    GroupStage,
    #[serde(rename = "16 avos")]
    RoundOf32,
    #[serde(rename = "Oitavas de final")]
    RoundOf16,
    #[serde(rename = "Quartas de final")]
    QuarterFinal,
    #[serde(rename = "Semifinais")]
    SemiFinal,
    #[serde(rename = "Terceiro e Quarto")]
    ThirdPlace,
    #[serde(rename = "Final")]
    Final,
}

impl Phase {
    /// Display order.
    pub const ALL: [Phase; 7] = [
        Phase::GroupStage,
        Phase::RoundOf32,
        Phase::RoundOf16,
        Phase::QuarterFinal,
        Phase::SemiFinal,
        Phase::ThirdPlace,
        Phase::Final,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Phase::GroupStage => "Grupo",
            Phase::RoundOf32 => "16 avos",
            Phase::RoundOf16 => "Oitavas de final",
            Phase::QuarterFinal => "Quartas de final",
            Phase::SemiFinal => "Semifinais",
            Phase::ThirdPlace => "Terceiro e Quarto",
            Phase::Final => "Final",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Phase::ALL
            .iter()
            .copied()
            .find(|phase| phase.label() == s)
            .ok_or_else(|| format!("unknown phase '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_back() {
        for phase in Phase::ALL {
            assert_eq!(phase.label().parse::<Phase>().unwrap(), phase);
        }
        assert_eq!(" Final ".parse::<Phase>().unwrap(), Phase::Final);
        assert!("final".parse::<Phase>().is_err());
    }

    #[test]
    fn test_serde_uses_sheet_label() {
        let json = serde_json::to_string(&Phase::RoundOf16).unwrap();
        assert_eq!(json, "\"Oitavas de final\"");
        let phase: Phase = serde_json::from_str("\"Terceiro e Quarto\"").unwrap();
        assert_eq!(phase, Phase::ThirdPlace);
    }
}
