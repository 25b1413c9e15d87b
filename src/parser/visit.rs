use crate::parser::syn::{AndExpr, AndItem, FieldTerm, Operand, Query};

/// Query tree walker. Negation lives on the `AndItem`, so `visit_and`
/// implementations read `item.negated` themselves.
pub trait Visit {
    type Result;

    fn visit_or(&mut self, node: &Query) -> Self::Result;
    fn visit_and(&mut self, node: &AndExpr<FieldTerm>) -> Self::Result;
    fn visit_paren(&mut self, node: &Query) -> Self::Result;
    fn visit_field_term(&mut self, node: &FieldTerm) -> Self::Result;
}

pub fn visit<V: Visit>(node: &Query, visit: &mut V) -> V::Result {
    visit.visit_or(node)
}

pub fn visit_item<V: Visit>(node: &AndItem<FieldTerm>, visit: &mut V) -> V::Result {
    match &node.operand {
        Operand::Paren(v) => visit.visit_paren(v),
        Operand::Leaf(v) => visit.visit_field_term(v),
    }
}
