#![forbid(unsafe_code)]

//! Named container-width tiers and per-tier values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Responsive breakpoint tiers for container widths.
///
/// Ordered from smallest to largest, so `Breakpoint::Lg > Breakpoint::Xs`.
///
/// | Breakpoint | Default Min Width | Default Columns |
/// |------------|-------------------|-----------------|
/// | `Xs`       | < 768 px          | 4               |
/// | `Sm`       | 768–995 px        | 6               |
/// | `Md`       | 996–1199 px       | 10              |
/// | `Lg`       | 1200+ px          | 12              |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Xs,
    Sm,
    Md,
    Lg,
}

impl Breakpoint {
    /// All breakpoints in ascending order.
    pub const ALL: [Breakpoint; 4] = [
        Breakpoint::Xs,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
    ];

    #[inline]
    const fn index(self) -> usize {
        match self {
            Breakpoint::Xs => 0,
            Breakpoint::Sm => 1,
            Breakpoint::Md => 2,
            Breakpoint::Lg => 3,
        }
    }

    /// Short label, identical to the serialized key.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Breakpoint::Xs => "xs",
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
        }
    }

    /// Lookup order for a widget rectangle at this breakpoint.
    ///
    /// Starts with `self`, then the larger tiers nearest-first, then the
    /// smaller tiers nearest-first. For `Lg` this is `lg → md → sm → xs`.
    #[must_use]
    pub fn fallback_chain(self) -> Vec<Breakpoint> {
        let idx = self.index();
        let mut chain = Vec::with_capacity(Self::ALL.len());
        chain.push(self);
        chain.extend(Self::ALL[idx + 1..].iter().copied());
        chain.extend(Self::ALL[..idx].iter().rev().copied());
        chain
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per breakpoint.
///
/// Tiers missing from a serialized map take their value from the type's
/// [`Default`], so `{"lg": 1400}` keeps the stock `md`/`sm`/`xs` thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de>, BreakpointValues<T>: Default"))]
pub struct BreakpointValues<T> {
    pub lg: T,
    pub md: T,
    pub sm: T,
    pub xs: T,
}

impl<T: Copy> BreakpointValues<T> {
    #[must_use]
    pub const fn new(lg: T, md: T, sm: T, xs: T) -> Self {
        Self { lg, md, sm, xs }
    }

    /// Value for `bp`.
    #[inline]
    #[must_use]
    pub const fn get(&self, bp: Breakpoint) -> T {
        match bp {
            Breakpoint::Xs => self.xs,
            Breakpoint::Sm => self.sm,
            Breakpoint::Md => self.md,
            Breakpoint::Lg => self.lg,
        }
    }

    /// All values as `(Breakpoint, value)` pairs, ascending.
    #[must_use]
    pub const fn pairs(&self) -> [(Breakpoint, T); 4] {
        [
            (Breakpoint::Xs, self.xs),
            (Breakpoint::Sm, self.sm),
            (Breakpoint::Md, self.md),
            (Breakpoint::Lg, self.lg),
        ]
    }
}

impl BreakpointValues<u32> {
    /// Default pixel thresholds: 1200 / 996 / 768 / 480.
    pub const DEFAULT_THRESHOLDS: Self = Self::new(1200, 996, 768, 480);

    /// Thresholds forced to be monotonically non-decreasing from `xs` up.
    #[must_use]
    pub const fn monotonic(self) -> Self {
        let xs = self.xs;
        let sm = if self.sm < xs { xs } else { self.sm };
        let md = if self.md < sm { sm } else { self.md };
        let lg = if self.lg < md { md } else { self.lg };
        Self { lg, md, sm, xs }
    }

    /// Largest breakpoint whose threshold is `<= width`; `Xs` otherwise.
    #[must_use]
    pub fn classify_width(self, width: f64) -> Breakpoint {
        let thresholds = self.monotonic();
        Breakpoint::ALL
            .iter()
            .rev()
            .copied()
            .find(|bp| width >= f64::from(thresholds.get(*bp)))
            .unwrap_or(Breakpoint::Xs)
    }
}

impl Default for BreakpointValues<u32> {
    fn default() -> Self {
        Self::DEFAULT_THRESHOLDS
    }
}

impl BreakpointValues<u16> {
    /// Default column counts: 12 / 10 / 6 / 4.
    pub const DEFAULT_COLUMNS: Self = Self::new(12, 10, 6, 4);
}

impl Default for BreakpointValues<u16> {
    fn default() -> Self {
        Self::DEFAULT_COLUMNS
    }
}
