use crate::ast::{Function, LogicOp, Node};

/// Handlers invoked by [`Node::visit`] in post-order.
///
/// Every handler may fail; the first error aborts the traversal.
pub trait Visitor {
    type Error;

    fn visit_function(&mut self, function: &Function) -> Result<(), Self::Error>;

    fn visit_group(&mut self, expr: &Node) -> Result<(), Self::Error>;

    fn visit_logic_and(&mut self, left: &Node, right: &Node) -> Result<(), Self::Error>;

    fn visit_logic_or(&mut self, left: &Node, right: &Node) -> Result<(), Self::Error>;

    fn visit_logic_not(&mut self, expr: &Node) -> Result<(), Self::Error>;

    /// Called after the left operand of `op` has been visited.
    ///
    /// Returning `true` skips the right operand and the connective's handler.
    fn short_circuit(&mut self, _op: LogicOp) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    /// Records the order in which handlers fire.
    #[derive(Default)]
    struct Trace(Vec<String>);

    impl Visitor for Trace {
        type Error = Infallible;

        fn visit_function(&mut self, function: &Function) -> Result<(), Self::Error> {
            self.0.push(function.name.clone());
            Ok(())
        }
        fn visit_group(&mut self, _: &Node) -> Result<(), Self::Error> {
            self.0.push("group".into());
            Ok(())
        }
        fn visit_logic_and(&mut self, _: &Node, _: &Node) -> Result<(), Self::Error> {
            self.0.push("and".into());
            Ok(())
        }
        fn visit_logic_or(&mut self, _: &Node, _: &Node) -> Result<(), Self::Error> {
            self.0.push("or".into());
            Ok(())
        }
        fn visit_logic_not(&mut self, _: &Node) -> Result<(), Self::Error> {
            self.0.push("not".into());
            Ok(())
        }
    }

    #[test]
    fn test_post_order() {
        // a() && !(b() || c())
        let node = Node::and(
            Node::function("a", vec![]),
            Node::not(Node::group(Node::or(
                Node::function("b", vec![]),
                Node::function("c", vec![]),
            ))),
        );
        let mut trace = Trace::default();
        node.visit(&mut trace).unwrap();
        assert_eq!(trace.0, vec!["a", "b", "c", "or", "group", "not", "and"]);
    }
}
