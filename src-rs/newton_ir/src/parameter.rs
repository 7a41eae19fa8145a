//! Parameter numbering and binding lookup

use crate::{kind::NodeKind, node::IrNode};

/// Numbers every parameter under `root` from zero in reading order
///
/// The number is stored on the parameter node itself. Returns the number of
/// parameters found. Every node gets its own number, so two bindings for the
/// components of one multi-axis parameter end up with different numbers. Use
/// [`number_parameters_by_name`] for such binding lists.
pub fn number_parameters_zero_to_n(root: &mut IrNode) -> usize {
    let mut count = 0;

    root.walk_mut(&mut |node| {
        if node.kind() == NodeKind::Parameter {
            node.set_parameter_number(count);
            count += 1;
        }
    });

    count
}

/// Numbers the parameters under `root` by name, in order of first appearance
///
/// Parameters that share a name share a number, so the components `x@0` and
/// `x@1` of one binding are both found under the number of `x`. Unnamed
/// parameters get a number each. Returns the number of distinct parameters.
pub fn number_parameters_by_name(root: &mut IrNode) -> usize {
    let mut names: Vec<Option<String>> = Vec::new();

    root.walk_mut(&mut |node| {
        if node.kind() != NodeKind::Parameter {
            return;
        }

        let name = node.token().map(str::to_string);
        let number = match names.iter().position(|seen| name.is_some() && *seen == name) {
            Some(number) => number,
            None => {
                names.push(name);
                names.len() - 1
            }
        };
        node.set_parameter_number(number);
    });

    names.len()
}

/// Finds the parameter with the given number and subindex
///
/// A parameter without physics is treated as subindex 0.
#[must_use]
pub fn find_parameter_by_number_and_subindex(
    root: &IrNode,
    number: usize,
    subindex: usize,
) -> Option<&IrNode> {
    parameters(root).find(|parameter| {
        parameter.parameter_number() == Some(number)
            && parameter.physics().map_or(0, |physics| physics.subindex) == subindex
    })
}

/// Finds the first parameter named `name`
#[must_use]
pub fn find_parameter_by_name<'a>(root: &'a IrNode, name: &str) -> Option<&'a IrNode> {
    parameters(root).find(|parameter| parameter.token() == Some(name))
}

fn parameters(root: &IrNode) -> impl Iterator<Item = &IrNode> {
    root.walk().filter(|node| node.kind() == NodeKind::Parameter)
}
