//! Conversions between proto messages and SDK models.

use crate::models::{NewTerm, OperationOutcome, Term, TermList};
use crate::proto;

/// Saturating `usize` -> `int32` for proto counters.
#[must_use]
pub fn count_to_i32(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// Non-positive proto integers mean "unset".
#[must_use]
pub fn non_negative(value: i32) -> usize {
    usize::try_from(value).unwrap_or(0)
}

/// Empty proto strings mean "no category".
#[must_use]
pub fn optional_category(category: String) -> Option<String> {
    if category.is_empty() {
        None
    } else {
        Some(category)
    }
}

impl From<Term> for proto::Term {
    fn from(t: Term) -> Self {
        Self {
            id: t.id,
            name: t.name,
            definition: t.definition,
            category: t.category,
            examples: t.examples,
            synonyms: t.synonyms,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

impl From<proto::Term> for Term {
    fn from(t: proto::Term) -> Self {
        Self {
            id: t.id,
            name: t.name,
            definition: t.definition,
            category: t.category,
            examples: t.examples,
            synonyms: t.synonyms,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

impl From<TermList> for proto::TermList {
    fn from(list: TermList) -> Self {
        Self {
            total_count: count_to_i32(list.total_count),
            terms: list.terms.into_iter().map(proto::Term::from).collect(),
        }
    }
}

impl From<proto::TermList> for TermList {
    fn from(list: proto::TermList) -> Self {
        Self {
            total_count: usize::try_from(list.total_count).unwrap_or(0),
            terms: list.terms.into_iter().map(Term::from).collect(),
        }
    }
}

impl From<NewTerm> for proto::AddTermRequest {
    fn from(n: NewTerm) -> Self {
        Self {
            name: n.name,
            definition: n.definition,
            category: n.category,
            examples: n.examples,
            synonyms: n.synonyms,
        }
    }
}

impl From<proto::AddTermRequest> for NewTerm {
    fn from(r: proto::AddTermRequest) -> Self {
        Self {
            name: r.name,
            definition: r.definition,
            category: r.category,
            examples: r.examples,
            synonyms: r.synonyms,
        }
    }
}

impl From<OperationOutcome> for proto::OperationResponse {
    fn from(o: OperationOutcome) -> Self {
        Self {
            success: o.success,
            message: o.message,
            term_id: o.term_id,
        }
    }
}

impl From<proto::OperationResponse> for OperationOutcome {
    fn from(r: proto::OperationResponse) -> Self {
        Self {
            success: r.success,
            message: r.message,
            term_id: r.term_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proto_integers_are_clamped() {
        assert_eq!(non_negative(-3), 0);
        assert_eq!(non_negative(4), 4);
        assert_eq!(count_to_i32(usize::MAX), i32::MAX);
    }

    #[test]
    fn empty_category_is_none() {
        assert_eq!(optional_category(String::new()), None);
        assert_eq!(
            optional_category("API Design".to_owned()),
            Some("API Design".to_owned())
        );
    }

    #[test]
    fn term_list_count_survives_the_wire() {
        let list = TermList::from(vec![Term {
            id: "1".to_owned(),
            ..Default::default()
        }]);
        let wire = proto::TermList::from(list.clone());
        assert_eq!(wire.total_count, 1);
        assert_eq!(TermList::from(wire), list);
    }
}
