//! Composable search predicates over encrypted, joined columns.
//!
//! A [`Specification`] is a list of contains-filters. Each filter targets one
//! encrypted column reachable through two parallel joins and matches when
//! either side contains the needle, case-insensitively. Filters are combined
//! with AND. An empty specification restricts nothing.

use crate::functions::fold;
use crate::mapping::{COURSE_NAME, EncryptedColumn, USER_FIRSTNAME, USER_LASTNAME};

// Table aliases used by the search queries in `queries.rs`.
pub const SENDER: &str = "fu";
pub const RECIPIENT: &str = "tu";
pub const LIKED: &str = "lc";
pub const HATED: &str = "hc";

/// One encrypted column seen through two joins of the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinedField {
    pub column: EncryptedColumn,
    pub sides: [&'static str; 2],
}

pub const PARTY_FIRSTNAME: JoinedField = JoinedField {
    column: USER_FIRSTNAME,
    sides: [SENDER, RECIPIENT],
};
pub const PARTY_LASTNAME: JoinedField = JoinedField {
    column: USER_LASTNAME,
    sides: [SENDER, RECIPIENT],
};
pub const COURSE: JoinedField = JoinedField {
    column: COURSE_NAME,
    sides: [LIKED, HATED],
};

/// Case-insensitive substring match of `needle` on either side of `field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainsFilter {
    pub field: JoinedField,
    /// Already case-folded with [`fold`].
    pub needle: String,
}

#[derive(Debug, Clone, Default)]
pub struct Specification {
    filters: Vec<ContainsFilter>,
}

impl Specification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter unless `value` is absent or empty.
    pub fn contains(mut self, field: JoinedField, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.filters.push(ContainsFilter {
                field,
                needle: fold(value),
            });
        }
        self
    }

    pub fn filters(&self) -> &[ContainsFilter] {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Translate into a parameterized SQL fragment.
    ///
    /// Filter `n` binds its needle once as `?n` and uses it for both sides.
    pub fn to_restriction(&self) -> Restriction {
        let mut params = Vec::with_capacity(self.filters.len());
        let mut groups = Vec::with_capacity(self.filters.len());

        for filter in &self.filters {
            params.push(filter.needle.clone());
            let placeholder = format!("?{}", params.len());

            let sides: Vec<String> = filter
                .field
                .sides
                .iter()
                .map(|alias| format!("instr({}, {}) > 0", filter.field.column.folded(alias), placeholder))
                .collect();
            groups.push(format!("({})", sides.join(" OR ")));
        }

        Restriction {
            clause: groups.join(" AND "),
            params,
        }
    }
}

/// A translated [`Specification`]: SQL condition plus its bound values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Restriction {
    pub clause: String,
    pub params: Vec<String>,
}

impl Restriction {
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }

    pub fn where_clause(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clause)
        }
    }
}

/// Message search: sender or recipient matches on first and/or last name.
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl MessageFilter {
    pub fn specification(&self) -> Specification {
        Specification::new()
            .contains(PARTY_FIRSTNAME, self.firstname.as_deref())
            .contains(PARTY_LASTNAME, self.lastname.as_deref())
    }
}

/// Student search: a liked or hated course matches on name.
#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    pub name: Option<String>,
}

impl StudentFilter {
    pub fn specification(&self) -> Specification {
        Specification::new().contains(COURSE, self.name.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_filters_means_no_restriction() {
        let spec = MessageFilter::default().specification();
        assert!(spec.is_empty());

        let restriction = spec.to_restriction();
        assert!(restriction.is_empty());
        assert!(restriction.params.is_empty());
        assert_eq!(restriction.where_clause(), "");
    }

    #[test]
    fn empty_strings_are_absent() {
        let filter = MessageFilter {
            firstname: Some(String::new()),
            lastname: Some(String::new()),
        };
        assert!(filter.specification().is_empty());
        assert!(StudentFilter { name: Some(String::new()) }.specification().is_empty());
    }

    #[test]
    fn single_filter_ors_both_sides() {
        let restriction = StudentFilter { name: Some("Course2".into()) }
            .specification()
            .to_restriction();

        assert_eq!(
            restriction.clause,
            "(instr(fold_case(sym_decrypt(lc.name)), ?1) > 0 \
             OR instr(fold_case(sym_decrypt(hc.name)), ?1) > 0)"
        );
        assert_eq!(restriction.params, vec!["course2".to_string()]);
    }

    #[test]
    fn filters_are_anded_in_order() {
        let restriction = MessageFilter {
            firstname: Some("ANıL".into()),
            lastname: Some("Senocak2".into()),
        }
        .specification()
        .to_restriction();

        assert_eq!(
            restriction.where_clause(),
            " WHERE (instr(fold_case(sym_decrypt(fu.firstname)), ?1) > 0 \
             OR instr(fold_case(sym_decrypt(tu.firstname)), ?1) > 0) \
             AND (instr(fold_case(sym_decrypt(fu.lastname)), ?2) > 0 \
             OR instr(fold_case(sym_decrypt(tu.lastname)), ?2) > 0)"
        );
        assert_eq!(restriction.params, vec!["anil".to_string(), "senocak2".to_string()]);
    }

    #[test]
    fn only_present_filters_are_kept() {
        let spec = MessageFilter {
            firstname: None,
            lastname: Some("x".into()),
        }
        .specification();

        assert_eq!(spec.len(), 1);
        assert_eq!(spec.filters()[0].field, PARTY_LASTNAME);
        assert_eq!(spec.to_restriction().params, vec!["x".to_string()]);
    }
}
