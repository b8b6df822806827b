use std::fmt;
use std::str::FromStr;

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Resampling kernel used when fitting images to a shared dimension
///
/// Each variant maps one-to-one onto an [`image::imageops::FilterType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    Nearest,
    Linear,
    #[default]
    Cubic,
    Gaussian,
    Lanczos,
}

impl Interpolation {
    pub const ALL: [Interpolation; 5] = [
        Interpolation::Nearest,
        Interpolation::Linear,
        Interpolation::Cubic,
        Interpolation::Gaussian,
        Interpolation::Lanczos,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Linear => "linear",
            Self::Cubic => "cubic",
            Self::Gaussian => "gaussian",
            Self::Lanczos => "lanczos",
        }
    }

    pub fn filter(&self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Linear => FilterType::Triangle,
            Self::Cubic => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos => FilterType::Lanczos3,
        }
    }
}

impl From<Interpolation> for FilterType {
    fn from(interpolation: Interpolation) -> Self {
        interpolation.filter()
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Interpolation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|i| i.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(Interpolation::name).collect();
                format!("unknown interpolation '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_cubic() {
        assert_eq!(Interpolation::default(), Interpolation::Cubic);
        assert_eq!(FilterType::from(Interpolation::default()), FilterType::CatmullRom);
    }

    #[test]
    fn test_parse_names() {
        for interpolation in Interpolation::ALL {
            assert_eq!(interpolation.name().parse::<Interpolation>().unwrap(), interpolation);
        }
        assert_eq!("LANCZOS".parse::<Interpolation>().unwrap(), Interpolation::Lanczos);
        assert!("area".parse::<Interpolation>().is_err());
    }
}
