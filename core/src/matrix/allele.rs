use std::{fmt, str::FromStr};

/// An allele at a single locus.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Allele {
    /// A known, alphanumeric allele.
    Known(String),
    /// Missing data marked as unknown.
    Unknown,
    /// Missing data marked as a gap.
    Gap,
}

impl Allele {
    /// Symbol marking a gap.
    pub const GAP: &'static str = "-";

    /// Symbol marking an unknown allele.
    pub const UNKNOWN: &'static str = "?";

    /// Returns the allele as written in data.
    pub fn as_str(&self) -> &str {
        match self {
            Allele::Known(s) => s,
            Allele::Unknown => Self::UNKNOWN,
            Allele::Gap => Self::GAP,
        }
    }

    /// Returns `true` if the allele is missing, i.e. either unknown or a gap.
    pub fn is_missing(&self) -> bool {
        !matches!(self, Allele::Known(_))
    }

    /// Returns `true` if the allele is missing or can be read as a rank.
    pub fn is_rankable(&self) -> bool {
        self.rank().is_some()
    }

    /// Returns the allele read as a rank.
    ///
    /// Known alleles consisting only of decimal digits are read as integers, and missing alleles
    /// have rank zero. Other alleles have no rank.
    pub fn rank(&self) -> Option<u64> {
        match self {
            Allele::Known(s) if s.bytes().all(|b| b.is_ascii_digit()) => s.parse().ok(),
            Allele::Known(_) => None,
            Allele::Unknown | Allele::Gap => Some(0),
        }
    }
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Allele {
    type Err = IllegalAllele;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::UNKNOWN => Ok(Allele::Unknown),
            Self::GAP => Ok(Allele::Gap),
            s if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()) => {
                Ok(Allele::Known(s.to_string()))
            }
            s => Err(IllegalAllele(s.to_string())),
        }
    }
}

/// An unordered pair of alleles at a single, diploid locus.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct AllelePair([Allele; 2]);

impl AllelePair {
    /// Creates a new allele pair.
    pub fn new(first: Allele, second: Allele) -> Self {
        Self([first, second])
    }

    /// Returns the first allele as written in data.
    pub fn first(&self) -> &Allele {
        &self.0[0]
    }

    /// Returns both alleles.
    pub fn as_array(&self) -> &[Allele; 2] {
        &self.0
    }

    /// Returns `true` if both alleles are identical.
    pub fn is_homozygous(&self) -> bool {
        self.0[0] == self.0[1]
    }

    /// Returns the second allele as written in data.
    pub fn second(&self) -> &Allele {
        &self.0[1]
    }
}

impl fmt::Display for AllelePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{}/{}", self.first(), self.second()))
    }
}

/// An error when reading an allele that is neither alphanumeric nor a missing marker.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IllegalAllele(pub String);

impl fmt::Display for IllegalAllele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "illegal allele '{}'", self.0)
    }
}

impl std::error::Error for IllegalAllele {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allele() {
        assert_eq!("Ab1".parse(), Ok(Allele::Known("Ab1".into())));
        assert_eq!("?".parse(), Ok(Allele::Unknown));
        assert_eq!("-".parse(), Ok(Allele::Gap));

        assert!("".parse::<Allele>().is_err());
        assert!("a b".parse::<Allele>().is_err());
        assert!("a-b".parse::<Allele>().is_err());
        assert!("??".parse::<Allele>().is_err());
    }

    #[test]
    fn test_rank() {
        assert_eq!(Allele::Known("12".into()).rank(), Some(12));
        assert_eq!(Allele::Known("1a".into()).rank(), None);
        assert_eq!(Allele::Unknown.rank(), Some(0));
        assert!(Allele::Gap.is_rankable());
    }

    #[test]
    fn test_display_pads() {
        let pair = AllelePair::new(Allele::Known("a".into()), Allele::Unknown);

        assert_eq!(format!("{pair:>5}"), "  a/?");
        assert_eq!(format!("{:>3}", Allele::Gap), "  -");
    }
}
