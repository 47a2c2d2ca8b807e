use std::collections::HashMap;

use crate::{
    internal::arena::Arena, utils::DisplayTree, Constraint, ConstraintId, FeatureId,
    FeatureModel, GroupType,
};

/// A single feature of a [`FeatureTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    name: String,
    parent: Option<FeatureId>,
    children: Vec<FeatureId>,
    group: GroupType,
    mandatory: bool,
    is_abstract: bool,
}

impl Feature {
    fn new(name: String) -> Self {
        Self {
            name,
            parent: None,
            children: Vec::new(),
            group: GroupType::And,
            mandatory: false,
            is_abstract: false,
        }
    }

    /// The name of the feature.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parent of the feature, `None` for the root and for features that
    /// have not been attached yet.
    pub fn parent(&self) -> Option<FeatureId> {
        self.parent
    }

    /// The children of the feature in insertion order.
    pub fn children(&self) -> &[FeatureId] {
        &self.children
    }

    /// How the children of the feature are grouped.
    pub fn group(&self) -> GroupType {
        self.group
    }

    /// Whether the feature is mandatory.
    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    /// Whether the feature is abstract.
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }
}

/// An in-memory feature model: a tree of features plus a list of cross-tree
/// constraints.
///
/// Features are never removed, so a [`FeatureId`] stays valid for the
/// lifetime of the tree and of all of its clones. Cloning a tree produces a
/// deep copy.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "document::ModelDocument", into = "document::ModelDocument")
)]
pub struct FeatureTree {
    /// All features, including detached ones
    features: Arena<FeatureId, Feature>,

    /// Map from names to features. When a name is used twice the first
    /// feature keeps it.
    names_to_ids: HashMap<String, FeatureId, ahash::RandomState>,

    /// Removed constraints leave a `None` behind so ids stay stable
    constraints: Arena<ConstraintId, Option<Constraint>>,

    root: FeatureId,
}

impl FeatureTree {
    /// Constructs a model that only consists of an and-grouped root feature.
    pub fn new(root_name: impl Into<String>) -> Self {
        let mut tree = Self {
            features: Arena::new(),
            names_to_ids: HashMap::default(),
            constraints: Arena::new(),
            root: FeatureId(0),
        };
        tree.root = tree.create_feature(root_name.into());
        tree
    }

    /// Adds an optional, concrete feature below `parent`.
    pub fn add_feature(&mut self, parent: FeatureId, name: impl Into<String>) -> FeatureId {
        let feature = self.create_feature(name.into());
        self.add_child(parent, feature);
        feature
    }

    /// Adds a mandatory, concrete feature below `parent`.
    pub fn add_mandatory(&mut self, parent: FeatureId, name: impl Into<String>) -> FeatureId {
        let feature = self.add_feature(parent, name);
        self.set_mandatory(feature, true);
        feature
    }

    /// Returns the feature with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not handed out by this tree or one of the trees it
    /// was cloned from.
    pub fn feature(&self, id: FeatureId) -> &Feature {
        &self.features[id]
    }

    /// Returns the id of the feature with the given name.
    pub fn lookup(&self, name: &str) -> Option<FeatureId> {
        self.names_to_ids.get(name).copied()
    }

    /// Returns the feature with the given name.
    pub fn by_name(&self, name: &str) -> Option<&Feature> {
        self.lookup(name).map(|id| self.feature(id))
    }

    /// Iterates over all features, including those that are not attached to
    /// the tree.
    pub fn features(&self) -> impl Iterator<Item = (FeatureId, &Feature)> + '_ {
        self.features.iter()
    }

    /// Returns the constraint with the given id, unless it has been removed.
    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.get(id).and_then(Option::as_ref)
    }

    /// Iterates over the features that are reachable from the root, parents
    /// before children.
    pub fn reachable(&self) -> impl Iterator<Item = FeatureId> + '_ {
        let mut stack = vec![self.root];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(self.features[next].children.iter().rev().copied());
            Some(next)
        })
    }

    /// Returns a value that renders this model as an indented tree followed
    /// by its constraints.
    pub fn display(&self) -> DisplayTree<'_> {
        DisplayTree::new(self)
    }
}

impl FeatureModel for FeatureTree {
    fn root(&self) -> FeatureId {
        self.root
    }

    fn set_root(&mut self, feature: FeatureId) {
        self.root = feature;
    }

    fn create_feature(&mut self, name: String) -> FeatureId {
        let id = self.features.alloc(Feature::new(name.clone()));
        self.names_to_ids.entry(name).or_insert(id);
        id
    }

    fn add_child(&mut self, parent: FeatureId, child: FeatureId) {
        if let Some(previous) = self.features[child].parent.take() {
            self.features[previous].children.retain(|&id| id != child);
        }
        self.features[parent].children.push(child);
        self.features[child].parent = Some(parent);
    }

    fn set_mandatory(&mut self, feature: FeatureId, mandatory: bool) {
        self.features[feature].mandatory = mandatory;
    }

    fn set_abstract(&mut self, feature: FeatureId, is_abstract: bool) {
        self.features[feature].is_abstract = is_abstract;
    }

    fn group_type(&self, feature: FeatureId) -> GroupType {
        self.features[feature].group
    }

    fn set_group_type(&mut self, feature: FeatureId, group: GroupType) {
        self.features[feature].group = group;
    }

    fn lookup_feature(&self, name: &str) -> Option<FeatureId> {
        self.lookup(name)
    }

    fn feature_count(&self) -> usize {
        self.features.len()
    }

    fn constraints(&self) -> impl Iterator<Item = (ConstraintId, &Constraint)> + '_ {
        self.constraints
            .iter()
            .filter_map(|(id, constraint)| constraint.as_ref().map(|c| (id, c)))
    }

    fn add_constraint(&mut self, constraint: Constraint) -> ConstraintId {
        self.constraints.alloc(Some(constraint))
    }

    fn remove_constraint(&mut self, constraint: ConstraintId) -> Option<Constraint> {
        self.constraints.get_mut(constraint)?.take()
    }
}

#[cfg(feature = "serde")]
mod document {
    use super::FeatureTree;
    use crate::{Constraint, FeatureId, FeatureModel, GroupType};

    /// The nested on-disk representation of a [`FeatureTree`]. Features that
    /// are not reachable from the root are not part of it.
    #[derive(serde::Serialize, serde::Deserialize)]
    pub struct ModelDocument {
        root: FeatureDocument,
        #[serde(default)]
        constraints: Vec<Constraint>,
    }

    #[derive(serde::Serialize, serde::Deserialize)]
    struct FeatureDocument {
        name: String,
        #[serde(default)]
        group: GroupType,
        #[serde(default)]
        mandatory: bool,
        #[serde(default, rename = "abstract")]
        is_abstract: bool,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<FeatureDocument>,
    }

    impl FeatureDocument {
        fn from_tree(tree: &FeatureTree, id: FeatureId) -> Self {
            let feature = tree.feature(id);
            Self {
                name: feature.name.clone(),
                group: feature.group,
                mandatory: feature.mandatory,
                is_abstract: feature.is_abstract,
                children: feature
                    .children
                    .iter()
                    .map(|&child| Self::from_tree(tree, child))
                    .collect(),
            }
        }

        fn apply(self, tree: &mut FeatureTree, id: FeatureId) {
            tree.set_group_type(id, self.group);
            tree.set_mandatory(id, self.mandatory);
            tree.set_abstract(id, self.is_abstract);
            for child in self.children {
                let child_id = tree.add_feature(id, child.name.clone());
                child.apply(tree, child_id);
            }
        }
    }

    impl From<FeatureTree> for ModelDocument {
        fn from(tree: FeatureTree) -> Self {
            Self {
                root: FeatureDocument::from_tree(&tree, tree.root()),
                constraints: tree.constraints().map(|(_, c)| c.clone()).collect(),
            }
        }
    }

    impl From<ModelDocument> for FeatureTree {
        fn from(document: ModelDocument) -> Self {
            let mut tree = FeatureTree::new(document.root.name.clone());
            let root = tree.root();
            document.root.apply(&mut tree, root);
            for constraint in document.constraints {
                tree.add_constraint(constraint);
            }
            tree
        }
    }
}
