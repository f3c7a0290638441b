use core::fmt;

/// Decides whether a constructor parameter binds to a field.
///
/// Conventions are tried in order; the first field any convention accepts
/// is bound.
pub trait NamingConvention: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn matches(&self, parameter: &str, field: &str) -> bool;
}

impl fmt::Debug for dyn NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `x` binds to `x`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactName;

impl NamingConvention for ExactName {
    fn name(&self) -> &'static str {
        "exact"
    }

    #[inline]
    fn matches(&self, parameter: &str, field: &str) -> bool {
        parameter == field
    }
}

/// `x` binds to the private backing field `_x`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnderscorePrefix;

impl NamingConvention for UnderscorePrefix {
    fn name(&self) -> &'static str {
        "underscore-prefix"
    }

    #[inline]
    fn matches(&self, parameter: &str, field: &str) -> bool {
        field.strip_prefix('_') == Some(parameter)
    }
}

/// `value` binds to `Value` and back.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseFlip;

impl NamingConvention for CaseFlip {
    fn name(&self) -> &'static str {
        "case-flip"
    }

    fn matches(&self, parameter: &str, field: &str) -> bool {
        let mut p = parameter.chars();
        let mut f = field.chars();
        let (Some(a), Some(b)) = (p.next(), f.next()) else {
            return false;
        };
        let flipped = if a.is_uppercase() {
            a.to_lowercase().eq(core::iter::once(b))
        } else {
            a.to_uppercase().eq(core::iter::once(b))
        };
        a != b && flipped && p.as_str() == f.as_str()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{CaseFlip, ExactName, NamingConvention, UnderscorePrefix};

    #[test]
    fn builtin_conventions() {
        assert!(ExactName.matches("x", "x"));
        assert!(!ExactName.matches("x", "_x"));

        assert!(UnderscorePrefix.matches("x", "_x"));
        assert!(!UnderscorePrefix.matches("x", "__x"));
        assert!(!UnderscorePrefix.matches("x", "x"));

        assert!(CaseFlip.matches("value", "Value"));
        assert!(CaseFlip.matches("Value", "value"));
        assert!(!CaseFlip.matches("value", "value"));
        assert!(!CaseFlip.matches("value", "Valve"));
        assert!(!CaseFlip.matches("_x", "_x"));
    }
}
