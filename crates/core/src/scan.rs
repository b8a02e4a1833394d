//! Scan types and the challenge copy shown for each.

use serde::{Deserialize, Serialize};

/// Heading shown above every practice challenge.
pub const CHALLENGE_TITLE: &str = "Stay Still Challenge";

/// Kind of medical imaging scan the child is preparing for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScanType {
    /// Magnetic resonance imaging
    #[default]
    Mri,
    /// Computed tomography
    Ct,
    /// X-ray
    Xray,
    /// Ultrasound
    Ultrasound,
}

impl ScanType {
    /// Every scan type, in menu order.
    pub const ALL: [ScanType; 4] = [
        ScanType::Mri,
        ScanType::Ct,
        ScanType::Xray,
        ScanType::Ultrasound,
    ];

    /// Display name.
    pub fn label(&self) -> &'static str {
        match self {
            ScanType::Mri => "MRI",
            ScanType::Ct => "CT",
            ScanType::Xray => "X-ray",
            ScanType::Ultrasound => "Ultrasound",
        }
    }

    /// Encouragement shown during the stillness challenge.
    pub fn challenge_hint(&self) -> &'static str {
        match self {
            ScanType::Mri => "Be still like a statue in the tunnel!",
            ScanType::Ct => "Ride the donut like a statue!",
            ScanType::Xray => "Freeze for a quick photo!",
            ScanType::Ultrasound => "Relax and watch the wavy movie!",
        }
    }

    /// Parse a scan name, falling back to MRI for anything unrecognised.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for ScanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ScanType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "").as_str() {
            "mri" => Ok(ScanType::Mri),
            "ct" => Ok(ScanType::Ct),
            "xray" => Ok(ScanType::Xray),
            "ultrasound" => Ok(ScanType::Ultrasound),
            other => Err(format!("unknown scan type: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("MRI".parse::<ScanType>().unwrap(), ScanType::Mri);
        assert_eq!("x-ray".parse::<ScanType>().unwrap(), ScanType::Xray);
        assert_eq!("Ultrasound".parse::<ScanType>().unwrap(), ScanType::Ultrasound);
    }

    #[test]
    fn test_unknown_falls_back_to_mri() {
        assert!("pet".parse::<ScanType>().is_err());
        assert_eq!(ScanType::parse_or_default("pet"), ScanType::Mri);
    }

    #[test]
    fn test_every_type_has_a_hint() {
        for scan in ScanType::ALL {
            assert!(!scan.challenge_hint().is_empty());
            assert_eq!(scan.label().parse::<ScanType>().unwrap(), scan);
        }
    }
}
