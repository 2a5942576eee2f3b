//! Box-drawing text rendering of an induced tree.
use super::node::{TreeNode, TreeVisitor, VisitContext};
use crate::data::dataset::Schema;
use std::fmt::Write;

/// Renders each visited node as one line, e.g. `rain ~> humidity (5)` or `high >> no (2)`.
pub struct TreeRenderer<'a> {
    schema: &'a Schema,
    last_flags: Vec<bool>,
    output: String,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            last_flags: Vec::new(),
            output: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.output
    }

    fn write_line(&mut self, context: &VisitContext, body: &str) {
        self.last_flags.truncate(context.depth);

        let mut line = String::new();
        if context.depth > 0 {
            for &last in self.last_flags.iter().skip(1) {
                line.push_str(if last { "    " } else { "│   " });
            }
            line.push_str(if context.is_last { "└── " } else { "├── " });
        }
        if let Some(branch) = context.branch {
            let label = self
                .schema
                .feature(branch.attribute)
                .label(branch.value)
                .unwrap_or("?");
            line.push_str(label);
            line.push(' ');
        }
        line.push_str(body);

        // writing into a String cannot fail
        let _ = writeln!(self.output, "{}", line);
        self.last_flags.push(context.is_last);
    }
}

impl TreeVisitor for TreeRenderer<'_> {
    fn visit_internal(&mut self, context: &VisitContext, attribute: usize, records: usize) {
        let name = self.schema.feature(attribute).name();
        let body = match context.branch {
            Some(_) => format!("~> {} ({})", name, records),
            None => format!("{} ({})", name, records),
        };
        self.write_line(context, &body);
    }

    fn visit_leaf(&mut self, context: &VisitContext, class: usize, records: usize) {
        let label = self.schema.class().label(class).unwrap_or("?");
        self.write_line(context, &format!(">> {} ({})", label, records));
    }
}

/// Renders `tree` with the attribute and value labels of `schema`.
pub fn render_tree(tree: &TreeNode, schema: &Schema) -> String {
    let mut renderer = TreeRenderer::new(schema);
    tree.walk(&mut renderer);
    renderer.finish()
}
