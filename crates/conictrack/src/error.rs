//! Error type shared by the fitter and the tracker.

/// Errors surfaced by conic fitting and per-frame tracking.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackError {
    /// Too few valid points for the requested fit.
    InsufficientPoints {
        /// Required minimum number of points.
        needed: usize,
        /// Number of valid points available.
        got: usize,
    },
    /// Conic coefficients do not describe a real, finite ellipse.
    DegenerateConic {
        /// Which check failed.
        reason: String,
    },
    /// `track` was called before a successful initialization.
    NotInitialized,
    /// `track` was called after the tracker lost the contour.
    Lost,
    /// Tracker configuration is unusable.
    InvalidConfig {
        /// Which parameter is out of range.
        reason: String,
    },
}

impl TrackError {
    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateConic {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for TrackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientPoints { needed, got } => {
                write!(f, "not enough points: need {}, got {}", needed, got)
            }
            Self::DegenerateConic { reason } => write!(f, "degenerate conic: {}", reason),
            Self::NotInitialized => write!(f, "tracker is not initialized"),
            Self::Lost => write!(f, "contour was lost; re-initialize the tracker"),
            Self::InvalidConfig { reason } => write!(f, "invalid tracker config: {}", reason),
        }
    }
}

impl std::error::Error for TrackError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_counts() {
        let e = TrackError::InsufficientPoints { needed: 3, got: 1 };
        assert_eq!(e.to_string(), "not enough points: need 3, got 1");
    }

    #[test]
    fn degenerate_keeps_reason() {
        let e = TrackError::degenerate("negative squared semi-axis");
        assert!(e.to_string().contains("negative squared semi-axis"));
    }
}
