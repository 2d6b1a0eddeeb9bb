//! WHERE-clause compiler for `FindObjsWithCriteriaFilter`.
//!
//! A [`SearchFilter`] names the fields a search term is matched against and
//! how the per-field and per-term clauses are combined:
//!
//! ```rust,ignore
//! use acslib_ccure_api::{FuzzMatch, SearchFilter};
//!
//! let filter = SearchFilter::new([("FirstName", FuzzMatch::Full), ("LastName", FuzzMatch::Full)]);
//! assert_eq!(
//!     filter.filter(&["ada", "lovelace"])?,
//!     "(FirstName LIKE '%ada%' OR LastName LIKE '%ada%') AND \
//!      (FirstName LIKE '%lovelace%' OR LastName LIKE '%lovelace%')",
//! );
//! ```
//!
//! Term text is inserted as is. Quotes or wildcards inside a term are not
//! escaped; callers passing untrusted input must sanitize it first.

use std::fmt::{self, Display};

use acslib_ccure_client::{Error, Result};

use crate::types::ObjectType;

/// How a term is wrapped in `%` wildcards before it is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FuzzMatch {
    /// The term as is.
    None,
    /// `%term`: matches values ending with the term.
    Left,
    /// `term%`: matches values starting with the term.
    Right,
    /// `%term%`: matches values containing the term.
    #[default]
    Full,
}

impl FuzzMatch {
    pub fn apply(self, term: &str) -> String {
        match self {
            FuzzMatch::None => term.to_string(),
            FuzzMatch::Left => format!("%{term}"),
            FuzzMatch::Right => format!("{term}%"),
            FuzzMatch::Full => format!("%{term}%"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOperator {
    And,
    Or,
}

impl BooleanOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            BooleanOperator::And => "AND",
            BooleanOperator::Or => "OR",
        }
    }
}

impl Display for BooleanOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison between a field and a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermOperator {
    /// `LIKE`, honoring `%` wildcards.
    Fuzzy,
    /// `=`
    Exact,
}

impl TermOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            TermOperator::Fuzzy => "LIKE",
            TermOperator::Exact => "=",
        }
    }
}

impl Display for TermOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search criteria for one object type.
///
/// Each term produces one parenthesized clause holding a comparison per
/// lookup field, joined by the inner operator. Term clauses are joined by the
/// outer operator. The defaults are `AND` between terms, `OR` between fields
/// and `LIKE` comparisons.
///
/// The filter also carries the display properties the server should return
/// for each matching object. Filters are plain values: build one and reuse it
/// for as many searches as needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    lookups: Vec<(String, FuzzMatch)>,
    outer: BooleanOperator,
    inner: BooleanOperator,
    term_operator: TermOperator,
    display_properties: Vec<String>,
}

impl SearchFilter {
    /// Create a filter over the given `(field, fuzz)` lookups with default
    /// operators and no display properties.
    pub fn new<I, S>(lookups: I) -> Self
    where
        I: IntoIterator<Item = (S, FuzzMatch)>,
        S: Into<String>,
    {
        Self {
            lookups: lookups
                .into_iter()
                .map(|(field, fuzz)| (field.into(), fuzz))
                .collect(),
            outer: BooleanOperator::And,
            inner: BooleanOperator::Or,
            term_operator: TermOperator::Fuzzy,
            display_properties: Vec::new(),
        }
    }

    /// Personnel: first or last name contains the term.
    pub fn personnel() -> Self {
        Self::new([("FirstName", FuzzMatch::Full), ("LastName", FuzzMatch::Full)])
            .with_display_properties(["FirstName", "MiddleName", "LastName"])
    }

    /// Clearances: name contains the term.
    pub fn clearance() -> Self {
        Self::new([("Name", FuzzMatch::Full)]).with_display_properties(["Name"])
    }

    /// Credentials: name contains the term.
    pub fn credential() -> Self {
        Self::new([("Name", FuzzMatch::Full)]).with_display_properties([
            "Name",
            "FacilityCode",
            "CardNumber",
            "Disabled",
            "Lost",
            "Stolen",
            "PersonnelId",
        ])
    }

    /// Doors and elevators: name contains the term.
    pub fn clearance_item() -> Self {
        Self::new([("Name", FuzzMatch::Full)]).with_display_properties(["Name", "Description"])
    }

    /// Matches objects whose `field` equals the term exactly, returning only
    /// `display_properties`.
    pub fn exact<S: Into<String>>(field: &str, display_properties: impl IntoIterator<Item = S>) -> Self {
        Self::new([(field, FuzzMatch::None)]).with_display_properties(display_properties)
    }

    /// The default filter for an object type.
    ///
    /// Types without a dedicated filter match on `Name`.
    pub fn for_type(object_type: ObjectType) -> Self {
        match object_type {
            ObjectType::Personnel => Self::personnel(),
            ObjectType::Clearance => Self::clearance(),
            ObjectType::Credential => Self::credential(),
            ObjectType::ClearanceItem | ObjectType::Door | ObjectType::Elevator => {
                Self::clearance_item()
            }
            ObjectType::ClearanceAssignment => {
                Self::exact("PersonnelID", ["PersonnelID", "ClearanceID"])
            }
            _ => Self::new([("Name", FuzzMatch::Full)]).with_display_properties(["Name"]),
        }
    }

    /// Set the operator joining term clauses.
    pub fn with_outer(mut self, operator: BooleanOperator) -> Self {
        self.outer = operator;
        self
    }

    /// Set the operator joining field comparisons within a term.
    pub fn with_inner(mut self, operator: BooleanOperator) -> Self {
        self.inner = operator;
        self
    }

    pub fn with_term_operator(mut self, operator: TermOperator) -> Self {
        self.term_operator = operator;
        self
    }

    /// Replace the display properties.
    pub fn with_display_properties<S: Into<String>>(
        mut self,
        properties: impl IntoIterator<Item = S>,
    ) -> Self {
        self.display_properties = properties.into_iter().map(Into::into).collect();
        self
    }

    /// Append display properties to those already requested.
    pub fn update_display_properties<S: Into<String>>(
        mut self,
        properties: impl IntoIterator<Item = S>,
    ) -> Self {
        self.display_properties
            .extend(properties.into_iter().map(Into::into));
        self
    }

    pub fn lookups(&self) -> &[(String, FuzzMatch)] {
        &self.lookups
    }

    pub fn outer(&self) -> BooleanOperator {
        self.outer
    }

    pub fn inner(&self) -> BooleanOperator {
        self.inner
    }

    pub fn term_operator(&self) -> TermOperator {
        self.term_operator
    }

    pub fn display_properties(&self) -> &[String] {
        &self.display_properties
    }

    /// Compile search terms into a WHERE clause.
    ///
    /// An empty term list compiles to an empty string, which the server
    /// treats as "match everything". Terms given to a filter with no lookup
    /// fields are a usage error.
    pub fn filter<T: Display>(&self, terms: &[T]) -> Result<String> {
        if terms.is_empty() {
            return Ok(String::new());
        }
        if self.lookups.is_empty() {
            return Err(Error::usage(
                "search filter has no lookup fields to match terms against",
            ));
        }

        let separator = format!(" {} ", self.outer);
        let clauses: Vec<String> = terms
            .iter()
            .map(|term| self.compile_term(&term.to_string()))
            .collect();
        Ok(clauses.join(&separator))
    }

    fn compile_term(&self, term: &str) -> String {
        let separator = format!(" {} ", self.inner);
        let comparisons: Vec<String> = self
            .lookups
            .iter()
            .map(|(field, fuzz)| format!("{field} {} '{}'", self.term_operator, fuzz.apply(term)))
            .collect();
        format!("({})", comparisons.join(&separator))
    }
}

impl Default for SearchFilter {
    /// Matches on `Name`, like the filters for types without a dedicated one.
    fn default() -> Self {
        Self::new([("Name", FuzzMatch::Full)]).with_display_properties(["Name"])
    }
}
