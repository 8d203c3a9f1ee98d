use std::{collections::HashMap, fmt, str::FromStr};

use thiserror::Error;

pub const DEFAULT_ROOT_MARGIN: &str = "0px 0px -12% 0px";
pub const DEFAULT_THRESHOLD: f64 = 0.12;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RevealConfigError {
    #[error("threshold needs at least one value")]
    EmptyThreshold,
    #[error("threshold value {0} is outside [0, 1]")]
    ThresholdOutOfRange(f64),
    #[error("threshold values must be in ascending order")]
    UnorderedThreshold,
    #[error("invalid root margin: {0}")]
    InvalidRootMargin(String),
}

/// Visible-ratio threshold(s) for a region. A single value or a
/// non-decreasing sequence, every value within `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Threshold(Vec<f64>);

impl Threshold {
    pub fn single(value: f64) -> Result<Self, RevealConfigError> {
        Self::steps(vec![value])
    }

    pub fn steps(values: Vec<f64>) -> Result<Self, RevealConfigError> {
        if values.is_empty() {
            return Err(RevealConfigError::EmptyThreshold);
        }
        if let Some(v) = values.iter().find(|v| !(0.0..=1.0).contains(*v)) {
            return Err(RevealConfigError::ThresholdOutOfRange(*v));
        }
        if values.windows(2).any(|w| w[0] > w[1]) {
            return Err(RevealConfigError::UnorderedThreshold);
        }
        Ok(Self(values))
    }

    /// The ratio at which a region first counts as visible.
    pub fn trigger_ratio(&self) -> f64 {
        self.0[0]
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(vec![DEFAULT_THRESHOLD])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginLength {
    Px(f64),
    Percent(f64),
}

impl FromStr for MarginLength {
    type Err = RevealConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RevealConfigError::InvalidRootMargin(s.to_string());
        let px = s.len().checked_sub(2).filter(|&i| {
            s.is_char_boundary(i) && s[i..].eq_ignore_ascii_case("px")
        });
        let (num, ctor): (&str, fn(f64) -> Self) = if let Some(i) = px {
            (&s[..i], Self::Px)
        } else if let Some(n) = s.strip_suffix('%') {
            (n, Self::Percent)
        } else if s == "0" {
            return Ok(Self::Px(0.0));
        } else {
            return Err(invalid());
        };
        let value = num.parse::<f64>().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }
        Ok(ctor(value))
    }
}

impl fmt::Display for MarginLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Percent(v) => write!(f, "{v}%"),
        }
    }
}

/// CSS-margin-like box adjustment applied to the viewport before
/// intersection is computed. Accepts the 1-4 value shorthand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: MarginLength,
    pub right: MarginLength,
    pub bottom: MarginLength,
    pub left: MarginLength,
}

impl FromStr for RootMargin {
    type Err = RevealConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split_whitespace()
            .map(MarginLength::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        let (top, right, bottom, left) = match parts.as_slice() {
            [a] => (*a, *a, *a, *a),
            [v, h] => (*v, *h, *v, *h),
            [t, h, b] => (*t, *h, *b, *h),
            [t, r, b, l] => (*t, *r, *b, *l),
            _ => return Err(RevealConfigError::InvalidRootMargin(s.to_string())),
        };
        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self {
            top: MarginLength::Px(0.0),
            right: MarginLength::Px(0.0),
            bottom: MarginLength::Percent(-12.0),
            left: MarginLength::Px(0.0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevealOptions {
    pub root_margin: RootMargin,
    pub threshold: Threshold,
    pub stagger: bool,
}

/// One observation delivered by the host's viewport observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionSample {
    pub is_intersecting: bool,
    pub ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Pending,
    Revealed,
}

impl RevealPhase {
    pub fn from_revealed(revealed: bool) -> Self {
        if revealed {
            Self::Revealed
        } else {
            Self::Pending
        }
    }

    /// Stylesheet hook for the region's presentation state.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Pending => "reveal",
            Self::Revealed => "reveal-revealed",
        }
    }
}

/// Emitted exactly once per region, when it turns visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealTransition {
    /// Ordinal per direct child, in document order, when staggered.
    pub stagger_indices: Option<Vec<usize>>,
}

#[derive(Debug, Clone)]
pub struct RevealRegion {
    phase: RevealPhase,
    options: RevealOptions,
}

impl RevealRegion {
    pub fn new(options: RevealOptions) -> Self {
        Self {
            phase: RevealPhase::Pending,
            options,
        }
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn options(&self) -> &RevealOptions {
        &self.options
    }

    pub fn is_revealed(&self) -> bool {
        self.phase == RevealPhase::Revealed
    }

    pub fn observe(
        &mut self,
        sample: IntersectionSample,
        child_count: usize,
    ) -> Option<RevealTransition> {
        if self.is_revealed()
            || !sample.is_intersecting
            || sample.ratio < self.options.threshold.trigger_ratio()
        {
            return None;
        }
        Some(self.reveal(child_count))
    }

    fn reveal(&mut self, child_count: usize) -> RevealTransition {
        self.phase = RevealPhase::Revealed;
        RevealTransition {
            stagger_indices: self.stagger_indices(child_count),
        }
    }

    pub fn stagger_indices(&self, child_count: usize) -> Option<Vec<usize>> {
        self.options.stagger.then(|| (0..child_count).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionId(u64);

/// Registry of revealable regions for one page.
///
/// Regions move `Pending -> Revealed` at most once. Once a region is
/// revealed (or detached) it is no longer observing, and the host should
/// disconnect its observer.
#[derive(Debug)]
pub struct RevealController {
    next_id: u64,
    regions: HashMap<RegionId, RevealRegion>,
    observer_supported: bool,
}

impl RevealController {
    pub fn new(observer_supported: bool) -> Self {
        Self {
            next_id: 0,
            regions: HashMap::new(),
            observer_supported,
        }
    }

    pub fn observer_supported(&self) -> bool {
        self.observer_supported
    }

    pub fn attach(&mut self, options: RevealOptions) -> RegionId {
        let id = RegionId(self.next_id);
        self.next_id += 1;
        let mut region = RevealRegion::new(options);
        if !self.observer_supported {
            // content must stay reachable without an observer
            region.phase = RevealPhase::Revealed;
        }
        self.regions.insert(id, region);
        id
    }

    pub fn observe(
        &mut self,
        id: RegionId,
        sample: IntersectionSample,
        child_count: usize,
    ) -> Option<RevealTransition> {
        self.regions.get_mut(&id)?.observe(sample, child_count)
    }

    pub fn detach(&mut self, id: RegionId) {
        self.regions.remove(&id);
    }

    pub fn is_revealed(&self, id: RegionId) -> bool {
        self.regions.get(&id).is_some_and(RevealRegion::is_revealed)
    }

    pub fn is_observing(&self, id: RegionId) -> bool {
        self.regions.get(&id).is_some_and(|r| !r.is_revealed())
    }

    pub fn stagger_indices(&self, id: RegionId, child_count: usize) -> Option<Vec<usize>> {
        self.regions.get(&id)?.stagger_indices(child_count)
    }
}
