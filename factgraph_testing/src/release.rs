//! Red Hat release strings for fixtures

/// Default release placed on wrapped content
pub const DEFAULT_RELEASE: &str = "Red Hat Enterprise Linux Server release 7.2 (Maipo)";
pub const DEFAULT_HOSTNAME: &str = "hostname.example.com";

// One release per supported major when the minor does not matter
pub const RHEL4: &str = "Red Hat Enterprise Linux AS release 4 (Nahant Update 9)";
pub const RHEL5: &str = "Red Hat Enterprise Linux Server release 5.11 (Tikanga)";
pub const RHEL6: &str = "Red Hat Enterprise Linux Server release 6.5 (Santiago)";
pub const RHEL7: &str = "Red Hat Enterprise Linux Server release 7.0 (Maipo)";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReleaseError {
    #[error("invalid major version: {0}")]
    InvalidMajor(String),

    #[error("malformed version string: {0}")]
    Malformed(String),
}

/// The accepted ways of naming a release
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseVersion {
    /// `"6.6"` or `"5"`
    Combined(String),
    /// `6.6`; the minor is read from the float's shortest rendering, so
    /// `7.10` reads as minor `1`
    Float(f64),
    /// `5`
    Major(i64),
    /// `(7, 1)`
    Pair(i64, i64),
    /// `("7", "1")`
    StrPair(String, String),
}

impl From<&str> for ReleaseVersion {
    fn from(value: &str) -> Self {
        Self::Combined(value.to_string())
    }
}

impl From<String> for ReleaseVersion {
    fn from(value: String) -> Self {
        Self::Combined(value)
    }
}

impl From<f64> for ReleaseVersion {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i32> for ReleaseVersion {
    fn from(value: i32) -> Self {
        Self::Major(value.into())
    }
}

impl From<i64> for ReleaseVersion {
    fn from(value: i64) -> Self {
        Self::Major(value)
    }
}

impl From<(i32, i32)> for ReleaseVersion {
    fn from((major, minor): (i32, i32)) -> Self {
        Self::Pair(major.into(), minor.into())
    }
}

impl From<(&str, &str)> for ReleaseVersion {
    fn from((major, minor): (&str, &str)) -> Self {
        Self::StrPair(major.to_string(), minor.to_string())
    }
}

impl ReleaseVersion {
    /// Major and minor as strings; an unspecified minor is empty
    fn parts(&self) -> Result<(String, String), ReleaseError> {
        match self {
            Self::Combined(text) => split_dotted(text),
            Self::Float(value) => {
                let text = value.to_string();
                if text.contains('.') {
                    split_dotted(&text)
                } else {
                    // Whole floats render without a fraction
                    Ok((text, "0".to_string()))
                }
            }
            Self::Major(major) => Ok((major.to_string(), String::new())),
            Self::Pair(major, minor) => Ok((major.to_string(), minor.to_string())),
            Self::StrPair(major, minor) => Ok((major.clone(), minor.clone())),
        }
    }
}

fn split_dotted(text: &str) -> Result<(String, String), ReleaseError> {
    let parts: Vec<&str> = text.split('.').collect();
    match parts.as_slice() {
        [major] => Ok((major.to_string(), String::new())),
        [major, minor] => Ok((major.to_string(), minor.to_string())),
        _ => Err(ReleaseError::Malformed(text.to_string())),
    }
}

/// Build the `/etc/redhat-release` line for a RHEL 4, 5, 6 or 7 release
pub fn redhat_release(version: impl Into<ReleaseVersion>) -> Result<String, ReleaseError> {
    let (major, minor) = version.into().parts()?;

    match major.as_str() {
        "4" => {
            let update = if minor.is_empty() || minor == "0" {
                String::new()
            } else {
                format!(" Update {}", minor)
            };
            Ok(format!(
                "Red Hat Enterprise Linux AS release {} (Nahant{})",
                major, update
            ))
        }
        "5" => {
            let suffix = if minor.is_empty() || minor == "0" {
                String::new()
            } else {
                format!(".{}", minor)
            };
            Ok(format!(
                "Red Hat Enterprise Linux Server release {}{} (Tikanga)",
                major, suffix
            ))
        }
        "6" | "7" => {
            let minor = if minor.is_empty() { "0" } else { minor.as_str() };
            let name = if major == "6" { "Santiago" } else { "Maipo" };
            Ok(format!(
                "Red Hat Enterprise Linux Server release {}.{} ({})",
                major, minor, name
            ))
        }
        _ => Err(ReleaseError::InvalidMajor(major)),
    }
}
