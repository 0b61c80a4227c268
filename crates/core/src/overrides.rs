//! Argument override collection.
//!
//! Walks a tree and folds every `#arg(index,'value')` directive into one
//! map. Children are visited in declaration order and a later directive for
//! the same index replaces an earlier one.

use std::collections::BTreeMap;

use crate::ast::Variable;

/// Positional argument index -> replacement text.
pub type Overrides = BTreeMap<u32, String>;

pub fn overrides(node: &Variable) -> Overrides {
    match node {
        Variable::Alter { index, value } => BTreeMap::from([(*index, value.clone())]),
        Variable::Composite { children, .. } => fold(children),
        Variable::RefForeign { overrides, .. } => fold(overrides),
        Variable::Constant { .. } | Variable::Text { .. } | Variable::Meta { .. } => Overrides::new(),
    }
}

fn fold(children: &[Variable]) -> Overrides {
    children.iter().fold(Overrides::new(), |mut acc, child| {
        acc.extend(overrides(child));
        acc
    })
}

/// Directives a unit declares for its own root: like [`overrides`], but
/// nested references keep their directives to themselves.
pub fn embedded_overrides(node: &Variable) -> Overrides {
    match node {
        Variable::Alter { index, value } => BTreeMap::from([(*index, value.clone())]),
        Variable::Composite { children, .. } => {
            children.iter().fold(Overrides::new(), |mut acc, child| {
                acc.extend(embedded_overrides(child));
                acc
            })
        }
        _ => Overrides::new(),
    }
}

/// Layer `closer` on top of `base`; entries in `closer` win.
pub fn merge(base: Overrides, closer: &Overrides) -> Overrides {
    let mut merged = base;
    merged.extend(closer.iter().map(|(k, v)| (*k, v.clone())));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_declaration_wins() {
        let v = Variable::composite(
            "java.lang.Long",
            vec![
                Variable::alter(0, "test"),
                Variable::alter(0, "another test"),
            ],
        );
        assert_eq!(overrides(&v), BTreeMap::from([(0, "another test".to_owned())]));
    }

    #[test]
    fn collects_through_nested_children() {
        let v = Variable::composite(
            "a.Outer",
            vec![
                Variable::composite("a.Inner", vec![Variable::alter(1, "inner")]),
                Variable::long(4),
                Variable::alter(2, "outer"),
                Variable::composite("a.Late", vec![Variable::alter(1, "late")]),
            ],
        );
        assert_eq!(
            overrides(&v),
            BTreeMap::from([(1, "late".to_owned()), (2, "outer".to_owned())])
        );
    }

    #[test]
    fn embedded_skips_nested_references() {
        let me: crate::urn::Urn = "urn:github:1".parse().unwrap();
        let v = Variable::composite(
            "a.Pair",
            vec![
                Variable::long(7),
                Variable::foreign(me.clone(), me, "num", vec![Variable::alter(0, "5")]),
                Variable::composite("a.Inner", vec![Variable::alter(1, "kept")]),
            ],
        );
        assert_eq!(embedded_overrides(&v), BTreeMap::from([(1, "kept".to_owned())]));
        assert_eq!(
            overrides(&v),
            BTreeMap::from([(0, "5".to_owned()), (1, "kept".to_owned())])
        );
    }

    #[test]
    fn leaves_contribute_nothing() {
        assert!(overrides(&Variable::long(1)).is_empty());
        assert!(overrides(&Variable::text("#arg(0,'x')")).is_empty());
    }

    #[test]
    fn merge_prefers_closer_layer() {
        let base = BTreeMap::from([(0, "a".to_owned()), (1, "b".to_owned())]);
        let closer = BTreeMap::from([(1, "c".to_owned())]);
        assert_eq!(
            merge(base, &closer),
            BTreeMap::from([(0, "a".to_owned()), (1, "c".to_owned())])
        );
    }
}
