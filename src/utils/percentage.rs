use std::{fmt::Display, ops::Deref};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percentage(f64);

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl Percentage {
    pub fn new_opt(value: f64) -> Option<Percentage> {
        if value < 0. {
            None
        } else {
            Some(Percentage(value))
        }
    }
}

impl Deref for Percentage {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Share of the whole in percent. A zero whole counts as 0% so empty
/// summaries render without special casing.
pub fn hours_percentage(value: f64, whole: f64) -> Percentage {
    if whole <= 0. {
        return Percentage(0.);
    }
    Percentage::new_opt(value / whole * 100.).expect("Percentage should always be at least 0")
}

#[cfg(test)]
mod tests {
    use super::hours_percentage;

    #[test]
    fn test_hours_percentage() {
        assert_eq!(*hours_percentage(1., 4.), 25.);
        assert_eq!(*hours_percentage(0., 4.), 0.);
        assert_eq!(*hours_percentage(0., 0.), 0.);
    }
}
