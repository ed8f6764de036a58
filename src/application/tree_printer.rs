use std::fmt::Write as _;

use colored::Colorize;
use fstruct::StructureNode;
use supports_color::Stream;

pub fn stdout_supports_color() -> bool {
    supports_color::on(Stream::Stdout).is_some()
}

/// Renders `tree` as an indented listing headed by `label`. Directories carry
/// a trailing slash.
pub fn render_tree(label: &str, tree: &StructureNode, colorize: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", paint_directory(label, colorize));
    render_children(tree, "", colorize, &mut out);
    out
}

fn render_children(node: &StructureNode, prefix: &str, colorize: bool, out: &mut String) {
    let Some(children) = node.children() else {
        return;
    };
    let count = children.len();
    for (index, (name, child)) in children.iter().enumerate() {
        let last = index + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        let label = if child.is_directory() {
            paint_directory(&format!("{name}/"), colorize)
        } else {
            name.clone()
        };
        let _ = writeln!(out, "{prefix}{branch}{label}");

        let next_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
        render_children(child, &next_prefix, colorize, out);
    }
}

fn paint_directory(name: &str, colorize: bool) -> String {
    if colorize {
        name.blue().bold().to_string()
    } else {
        name.to_string()
    }
}
