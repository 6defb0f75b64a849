use std::{fmt::Display, ops::Deref};

/// Whole-number percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percentage(u8);

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl Percentage {
    pub fn new_opt(value: u8) -> Option<Percentage> {
        if value > 100 {
            None
        } else {
            Some(Percentage(value))
        }
    }

    pub fn is_complete(&self) -> bool {
        self.0 == 100
    }
}

impl Deref for Percentage {
    type Target = u8;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rounded share of `part` in `whole`. An empty whole is 0%.
pub fn ratio_percentage(part: usize, whole: usize) -> Percentage {
    if whole == 0 {
        return Percentage(0);
    }
    let value = (part.min(whole) as f64 / whole as f64 * 100.).round() as u8;
    Percentage::new_opt(value).expect("Ratio of part to whole should never exceed 100")
}

#[cfg(test)]
mod tests {
    use super::ratio_percentage;

    #[test]
    fn test_ratio_rounds_to_nearest() {
        assert_eq!(*ratio_percentage(1, 3), 33);
        assert_eq!(*ratio_percentage(2, 3), 67);
        assert_eq!(*ratio_percentage(1, 2), 50);
    }

    #[test]
    fn test_ratio_of_empty_whole() {
        assert_eq!(*ratio_percentage(0, 0), 0);
    }

    #[test]
    fn test_ratio_complete() {
        assert!(ratio_percentage(4, 4).is_complete());
        assert_eq!(ratio_percentage(4, 4).to_string(), "100%");
    }
}
