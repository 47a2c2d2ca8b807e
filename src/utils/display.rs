use std::fmt::{self, Display, Formatter};

use itertools::Itertools;

use crate::{utils::FeatureTree, FeatureId, FeatureModel};

#[derive(Copy, Clone, PartialEq, Eq)]
enum ChildOrder {
    HasRemainingSiblings,
    Last,
}

/// Keeps track of the box drawing prefix of the line that is currently
/// rendered.
#[derive(Clone, Default)]
struct Indenter {
    levels: Vec<ChildOrder>,
}

impl Indenter {
    fn push_level(&self, order: ChildOrder) -> Self {
        let mut levels = self.levels.clone();
        levels.push(order);
        Self { levels }
    }

    fn get_indent(&self) -> String {
        let mut s = String::new();
        let Some(deepest_level) = self.levels.len().checked_sub(1) else {
            return s;
        };

        for (level, &order) in self.levels.iter().enumerate() {
            let tree_prefix = match (level == deepest_level, order) {
                (true, ChildOrder::HasRemainingSiblings) => "├─ ",
                (true, ChildOrder::Last) => "└─ ",
                (false, ChildOrder::HasRemainingSiblings) => "│  ",
                (false, ChildOrder::Last) => "   ",
            };
            s.push_str(tree_prefix);
        }

        s
    }
}

/// Renders a [`FeatureTree`] as an indented tree, followed by its
/// constraints. Created by [`FeatureTree::display`].
///
/// ```text
/// Root [and]
/// ├─ A
/// └─ top [and, mandatory, abstract]
///    └─ A_0 [abstract]
///
/// A_0 => A
/// ```
pub struct DisplayTree<'t> {
    tree: &'t FeatureTree,
}

impl<'t> DisplayTree<'t> {
    pub(crate) fn new(tree: &'t FeatureTree) -> Self {
        Self { tree }
    }

    fn fmt_feature(
        &self,
        f: &mut Formatter<'_>,
        id: FeatureId,
        indenter: &Indenter,
    ) -> fmt::Result {
        let feature = self.tree.feature(id);

        let mut flags = Vec::new();
        if !feature.children().is_empty() {
            flags.push(feature.group().to_string());
        }
        if feature.is_mandatory() {
            flags.push(String::from("mandatory"));
        }
        if feature.is_abstract() {
            flags.push(String::from("abstract"));
        }

        write!(f, "{}{}", indenter.get_indent(), feature.name())?;
        if !flags.is_empty() {
            write!(f, " [{}]", flags.iter().format(", "))?;
        }

        let children = feature.children();
        for (index, &child) in children.iter().enumerate() {
            let order = if index + 1 == children.len() {
                ChildOrder::Last
            } else {
                ChildOrder::HasRemainingSiblings
            };
            writeln!(f)?;
            self.fmt_feature(f, child, &indenter.push_level(order))?;
        }

        Ok(())
    }
}

impl Display for DisplayTree<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.fmt_feature(f, self.tree.root(), &Indenter::default())?;

        let mut constraints = self.tree.constraints().peekable();
        if constraints.peek().is_some() {
            writeln!(f)?;
        }
        for (_, constraint) in constraints {
            write!(f, "\n{constraint}")?;
        }

        Ok(())
    }
}
