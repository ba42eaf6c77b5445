use serde::{Deserialize, Serialize};

/// A dependent child, in birth order within [`FamilyProfile::children`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    pub age: u32,
    #[serde(default)]
    pub disability_percent: u32,
}

impl Child {
    pub fn new(age: u32) -> Self {
        Self {
            age,
            disability_percent: 0,
        }
    }

    pub fn with_disability(
        age: u32,
        disability_percent: u32,
    ) -> Self {
        Self {
            age,
            disability_percent,
        }
    }
}

/// A dependent relative other than a child whose disability is declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentRelative {
    pub disability_percent: u32,
    #[serde(default)]
    pub needs_help: bool,
}

/// Demographic and disability data driving the personal/family minimum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyProfile {
    pub age: u32,
    #[serde(default)]
    pub children: Vec<Child>,
    #[serde(default)]
    pub ascendant_ages: Vec<u32>,
    #[serde(default)]
    pub disability_percent: u32,
    #[serde(default)]
    pub needs_help: bool,
    #[serde(default)]
    pub relatives: Vec<DependentRelative>,
}

impl Default for FamilyProfile {
    fn default() -> Self {
        Self::single(30)
    }
}

impl FamilyProfile {
    /// A taxpayer of the given age with no dependents and no disability.
    pub fn single(age: u32) -> Self {
        Self {
            age,
            children: Vec::new(),
            ascendant_ages: Vec::new(),
            disability_percent: 0,
            needs_help: false,
            relatives: Vec::new(),
        }
    }
}
