use std::fmt;

/// The verdict for one constraint
///
/// The value and dimension tracks are independent: a constraint can hold
/// numerically while its dimensions do not match, and both are reported.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintReport {
    /// True if the comparison holds for the bound values
    pub satisfies_value_constraint: bool,
    /// True if both sides have equivalent dimensions
    pub satisfies_dimension_constraint: bool,
    /// Why the value track failed
    pub value_error_message: Option<String>,
    /// Why the dimension track failed
    pub dimension_error_message: Option<String>,
}

impl ConstraintReport {
    /// Checks if both tracks are satisfied
    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        self.satisfies_value_constraint && self.satisfies_dimension_constraint
    }
}

impl fmt::Display for ConstraintReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = [&self.value_error_message, &self.dimension_error_message]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();

        if messages.is_empty() {
            write!(f, "satisfied")
        } else {
            write!(f, "{}", messages.join("; "))
        }
    }
}

/// The verdicts for every constraint of an invariant, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Report {
    /// The name of the checked invariant
    pub invariant: String,
    /// One report per constraint
    pub constraint_reports: Vec<ConstraintReport>,
}

impl Report {
    /// Checks if every constraint holds numerically
    #[must_use]
    pub fn satisfies_value_constraints(&self) -> bool {
        self.constraint_reports
            .iter()
            .all(|report| report.satisfies_value_constraint)
    }

    /// Checks if every constraint has matching dimensions
    #[must_use]
    pub fn satisfies_dimension_constraints(&self) -> bool {
        self.constraint_reports
            .iter()
            .all(|report| report.satisfies_dimension_constraint)
    }

    /// Checks if every constraint satisfies both tracks
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.constraint_reports
            .iter()
            .all(ConstraintReport::is_satisfied)
    }

    /// Returns the failed constraints with their position in the list
    pub fn failures(&self) -> impl Iterator<Item = (usize, &ConstraintReport)> {
        self.constraint_reports
            .iter()
            .enumerate()
            .filter(|(_, report)| !report.is_satisfied())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invariant `{}`", self.invariant)?;

        if self.is_satisfied() {
            return write!(f, " is satisfied");
        }

        for (index, report) in self.failures() {
            write!(f, "\n  constraint {index}: {report}")?;
        }

        Ok(())
    }
}
