use serde::{Deserialize, Serialize};

use super::ConfigurationError;

/// Social-security contribution group, as listed in the minimum-base table.
///
/// The first four groups have monthly floors; the last two are defined per
/// day and are limited against the daily maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionGroup {
    Engineers,
    TechnicalEngineers,
    AdministrativeHeads,
    Other,
    DailyAdult,
    Minor,
}

impl ContributionGroup {
    pub const ALL: [ContributionGroup; 6] = [
        Self::Engineers,
        Self::TechnicalEngineers,
        Self::AdministrativeHeads,
        Self::Other,
        Self::DailyAdult,
        Self::Minor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Engineers => "enginyeres",
            Self::TechnicalEngineers => "tecniques",
            Self::AdministrativeHeads => "caps",
            Self::Other => "altres",
            Self::DailyAdult => "diaria",
            Self::Minor => "menor",
        }
    }

    /// Label used by the official minimum-base table.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Engineers => "Sou mensual; Adulta; Enginyeres i llicenciades universitàries",
            Self::TechnicalEngineers => {
                "Sou mensual; Adulta; Enginyeres tècniques, perites i ajudants titulades"
            }
            Self::AdministrativeHeads => "Sou mensual; Adulta; Caps administratives i de taller",
            Self::Other => "Sou mensual; Adulta; altres",
            Self::DailyAdult => "Base diaria; Adulta",
            Self::Minor => "Menor d'edat",
        }
    }

    /// Whether the regulatory floor and ceiling are expressed per day.
    pub fn is_daily(&self) -> bool {
        matches!(self, Self::DailyAdult | Self::Minor)
    }

    /// Accepts either the short code or the official label.
    pub fn parse(key: &str) -> Result<Self, ConfigurationError> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(key) || group.label() == key)
            .ok_or_else(|| ConfigurationError::UnknownContributionGroup(key.to_string()))
    }
}

/// Contract permanence; selects the unemployment contribution rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    #[default]
    Indefinite,
    Temporary,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indefinite => "indefinite",
            Self::Temporary => "temporary",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigurationError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "indefinite" => Ok(Self::Indefinite),
            "temporary" => Ok(Self::Temporary),
            _ => Err(ConfigurationError::UnknownContractType(s.to_string())),
        }
    }
}

/// Autonomous community whose regional scale applies.
///
/// Only the Catalan scale is modelled; every other name is rejected instead
/// of silently falling back to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    #[default]
    Catalunya,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Catalunya => "catalunya",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigurationError> {
        match s.trim().to_lowercase().as_str() {
            "catalunya" | "cataluña" | "catalonia" => Ok(Self::Catalunya),
            _ => Err(ConfigurationError::UnsupportedRegion(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_short_codes() {
        for group in ContributionGroup::ALL {
            assert_eq!(ContributionGroup::parse(group.as_str()), Ok(group));
        }
    }

    #[test]
    fn parse_accepts_official_labels() {
        assert_eq!(
            ContributionGroup::parse("Sou mensual; Adulta; altres"),
            Ok(ContributionGroup::Other)
        );
        assert_eq!(
            ContributionGroup::parse("Menor d'edat"),
            Ok(ContributionGroup::Minor)
        );
    }

    #[test]
    fn parse_rejects_unknown_group() {
        assert_eq!(
            ContributionGroup::parse("directius"),
            Err(ConfigurationError::UnknownContributionGroup(
                "directius".to_string()
            ))
        );
    }

    #[test]
    fn only_daily_groups_are_daily() {
        let daily: Vec<_> = ContributionGroup::ALL
            .into_iter()
            .filter(ContributionGroup::is_daily)
            .collect();

        assert_eq!(
            daily,
            vec![ContributionGroup::DailyAdult, ContributionGroup::Minor]
        );
    }

    #[test]
    fn contract_type_parse_is_case_insensitive() {
        assert_eq!(ContractType::parse("Temporary"), Ok(ContractType::Temporary));
        assert!(ContractType::parse("freelance").is_err());
    }

    #[test]
    fn region_rejects_other_communities() {
        assert_eq!(Region::parse("Catalunya"), Ok(Region::Catalunya));
        assert_eq!(
            Region::parse("Madrid"),
            Err(ConfigurationError::UnsupportedRegion("Madrid".to_string()))
        );
    }
}
