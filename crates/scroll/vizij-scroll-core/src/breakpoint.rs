//! Desktop-only gate for pin behavior.

use crate::error::ScrollError;

/// Default minimum width, in logical px, at which pinning applies.
pub const PIN_BREAKPOINT: f64 = 960.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BreakpointGate {
    pub min_width: f64,
}

impl Default for BreakpointGate {
    fn default() -> Self {
        Self {
            min_width: PIN_BREAKPOINT,
        }
    }
}

impl BreakpointGate {
    pub fn new(min_width: f64) -> Self {
        Self { min_width }
    }

    #[inline]
    pub fn is_pin_eligible(&self, width: f64) -> bool {
        width >= self.min_width
    }

    /// `Err(NarrowViewport)` below the breakpoint.
    pub fn check(&self, width: f64) -> Result<(), ScrollError> {
        if self.is_pin_eligible(width) {
            Ok(())
        } else {
            Err(ScrollError::NarrowViewport {
                width,
                breakpoint: self.min_width,
            })
        }
    }
}

/// Gate with the default breakpoint.
#[inline]
pub fn is_pin_eligible(width: f64) -> bool {
    BreakpointGate::default().is_pin_eligible(width)
}
