use crate::db::core::InstanceSpec;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizePreset {
    Small,
    Medium,
    Large,
    XLarge,
    XxLarge,
}

impl SizePreset {
    pub const ALL: [SizePreset; 5] = [
        SizePreset::Small,
        SizePreset::Medium,
        SizePreset::Large,
        SizePreset::XLarge,
        SizePreset::XxLarge,
    ];

    // xxlarge is opt-in
    pub const STANDARD: [SizePreset; 4] = [
        SizePreset::Small,
        SizePreset::Medium,
        SizePreset::Large,
        SizePreset::XLarge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SizePreset::Small => "small",
            SizePreset::Medium => "medium",
            SizePreset::Large => "large",
            SizePreset::XLarge => "xlarge",
            SizePreset::XxLarge => "xxlarge",
        }
    }

    pub fn spec(self) -> InstanceSpec {
        match self {
            SizePreset::Small => InstanceSpec::new(1_000, 50, 800),
            SizePreset::Medium => InstanceSpec::new(10_000, 500, 8_000),
            SizePreset::Large => InstanceSpec::new(50_000, 2_500, 40_000),
            SizePreset::XLarge => InstanceSpec::new(100_000, 5_000, 80_000),
            SizePreset::XxLarge => InstanceSpec::new(250_000, 12_500, 200_000),
        }
    }

    pub fn default_basename(self) -> String {
        format!("example_{}", self.name())
    }

    /// Lenient lookup: unknown names fall back to `medium` with a warning.
    pub fn resolve(name: &str) -> SizePreset {
        name.parse().unwrap_or_else(|_| {
            log::warn!("Invalid size '{}'. Using 'medium' instead.", name);
            SizePreset::Medium
        })
    }
}

impl fmt::Display for SizePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPreset(pub String);

impl fmt::Display for UnknownPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown size preset '{}'", self.0)
    }
}

impl std::error::Error for UnknownPreset {}

impl FromStr for SizePreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        SizePreset::ALL
            .into_iter()
            .find(|p| p.name() == lower)
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}
