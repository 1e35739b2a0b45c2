//! Bottom-up error roll-up over the coverage tree.
//!
//! Every node counts its own missing summary plus one per immediate child
//! that has errors. A child contributes at most one, however many of its
//! own descendants fail. The root sums namespace counts, so the total is a
//! count of failing nodes one level down, not a tally of every missing
//! summary; it is not comparable with tools that sum per-type counts.

use crate::models::{CheckResult, NamespaceNode, Rollup, TypeNode};

/// Shared roll-up for any node given its own state and its children's.
pub fn roll_up<I>(own_present: bool, children_with_errors: I) -> Rollup
where
    I: IntoIterator<Item = bool>,
{
    let failing = children_with_errors.into_iter().filter(|e| *e).count();
    let own = usize::from(!own_present);
    Rollup {
        has_errors: own > 0 || failing > 0,
        error_count: own + failing,
    }
}

pub fn aggregate_type(node: &mut TypeNode) {
    for m in node.members_mut() {
        m.rollup = roll_up(m.summary.is_satisfied(), std::iter::empty());
    }
    let children: Vec<bool> = node.members().map(|m| m.rollup.has_errors).collect();
    node.rollup = roll_up(node.summary.is_satisfied(), children);
}

pub fn aggregate_namespace(node: &mut NamespaceNode) {
    for t in node.types.iter_mut() {
        aggregate_type(t);
    }
    let children: Vec<bool> = node.types.iter().map(|t| t.rollup.has_errors).collect();
    node.rollup = roll_up(node.summary.is_satisfied(), children);
}

/// Fill every `Rollup` in the result, leaves first.
pub fn aggregate(result: &mut CheckResult) {
    for ns in result.namespaces.iter_mut() {
        aggregate_namespace(ns);
    }
    result.rollup = Rollup {
        has_errors: result.namespaces.iter().any(|n| n.rollup.has_errors),
        error_count: result.namespaces.iter().map(|n| n.rollup.error_count).sum(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::ElementKind;
    use crate::models::{MemberNode, Summary};

    fn doc(text: &str) -> Summary {
        Summary::Present(text.to_string())
    }

    #[test]
    fn test_roll_up_counts_own_and_failing_children() {
        assert_eq!(roll_up(true, std::iter::empty()), Rollup::default());
        assert_eq!(
            roll_up(false, std::iter::empty()),
            Rollup {
                has_errors: true,
                error_count: 1
            }
        );
        assert_eq!(
            roll_up(false, [true, false, true]),
            Rollup {
                has_errors: true,
                error_count: 3
            }
        );
    }

    #[test]
    fn test_exempt_member_is_not_an_error() {
        let mut t = TypeNode::new("Widget", doc("W"));
        t.constructors
            .push(MemberNode::new(ElementKind::Constructor, ".ctor()", Summary::Exempt));
        aggregate_type(&mut t);
        assert!(!t.constructors[0].rollup.has_errors);
        assert_eq!(t.rollup, Rollup::default());
    }

    #[test]
    fn test_namespace_counts_failing_types_not_their_members() {
        let mut t = TypeNode::new("Widget", Summary::Missing);
        for name in ["A()", "B()", "C()"] {
            t.methods
                .push(MemberNode::new(ElementKind::Method, name, Summary::Missing));
        }
        let mut ns = NamespaceNode::new("Acme", doc("Acme"));
        ns.types.push(t);
        ns.types.push(TypeNode::new("Clean", doc("C")));

        let mut result = CheckResult::new("Acme");
        result.namespaces.push(ns);
        aggregate(&mut result);

        let ns = &result.namespaces[0];
        assert_eq!(ns.types[0].rollup.error_count, 4);
        assert_eq!(ns.rollup.error_count, 1);
        assert!(ns.rollup.has_errors);
        assert_eq!(result.error_count(), 1);
        assert!(result.has_errors());
    }

    #[test]
    fn test_empty_result_has_no_errors() {
        let mut result = CheckResult::new("Empty");
        aggregate(&mut result);
        assert!(!result.has_errors());
        assert_eq!(result.error_count(), 0);
    }
}
