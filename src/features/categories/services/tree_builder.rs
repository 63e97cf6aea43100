//! Parent/child grouping of the flat category list.
//!
//! `children_of` is the plain grouping query. `CategoryForest` is the same
//! grouping precomputed into an index arena, validated so that rendering can
//! never loop: duplicate ids, self-parents and parent cycles are rejected.

use std::collections::{HashMap, HashSet};

use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;

/// Direct children of `parent_id` (`None` selects roots), ascending by sort order.
///
/// Ties keep their order from the input slice.
pub fn children_of<'a>(categories: &'a [Category], parent_id: Option<&str>) -> Vec<&'a Category> {
    let mut children: Vec<&Category> = categories
        .iter()
        .filter(|c| c.parent_id.as_deref() == parent_id)
        .collect();
    children.sort_by_key(|c| c.sort_order);
    children
}

/// True if moving `id` under `new_parent` would make it its own ancestor
pub fn would_create_cycle(categories: &[Category], id: &str, new_parent: Option<&str>) -> bool {
    let parents: HashMap<&str, Option<&str>> = categories
        .iter()
        .map(|c| (c.id.as_str(), c.parent_id.as_deref()))
        .collect();

    let mut seen = HashSet::new();
    let mut current = new_parent;
    while let Some(ancestor) = current {
        if ancestor == id {
            return true;
        }
        if !seen.insert(ancestor) {
            // pre-existing loop above the new parent, not through `id`
            return false;
        }
        current = parents.get(ancestor).copied().flatten();
    }
    false
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    InChain,
    Done,
}

/// Arena view of a category list: every category is addressed by its index
/// in the original slice.
#[derive(Debug)]
pub struct CategoryForest<'a> {
    categories: &'a [Category],
    index: HashMap<&'a str, usize>,
    roots: Vec<usize>,
    children: Vec<Vec<usize>>,
    orphans: Vec<usize>,
}

impl<'a> CategoryForest<'a> {
    pub fn build(categories: &'a [Category]) -> Result<Self> {
        let mut index = HashMap::with_capacity(categories.len());
        for (i, category) in categories.iter().enumerate() {
            if index.insert(category.id.as_str(), i).is_some() {
                return Err(AppError::DataIntegrity(format!(
                    "Duplicate category id '{}'",
                    category.id
                )));
            }
            if category.parent_id.as_deref() == Some(category.id.as_str()) {
                return Err(AppError::DataIntegrity(format!(
                    "Category '{}' is its own parent",
                    category.id
                )));
            }
        }

        let mut roots = Vec::new();
        let mut children = vec![Vec::new(); categories.len()];
        let mut orphans = Vec::new();

        for (i, category) in categories.iter().enumerate() {
            match category.parent_id.as_deref() {
                None => roots.push(i),
                Some(parent) => match index.get(parent) {
                    Some(&p) => children[p].push(i),
                    None => orphans.push(i),
                },
            }
        }

        roots.sort_by_key(|&i| categories[i].sort_order);
        for siblings in &mut children {
            siblings.sort_by_key(|&i| categories[i].sort_order);
        }

        let forest = Self {
            categories,
            index,
            roots,
            children,
            orphans,
        };
        forest.check_acyclic()?;

        if !forest.orphans.is_empty() {
            let ids: Vec<&str> = forest.orphans().map(|c| c.id.as_str()).collect();
            tracing::warn!(
                "{} categories reference a missing parent and will not appear in the tree: {}",
                ids.len(),
                ids.join(", ")
            );
        }

        Ok(forest)
    }

    /// Walk every parent chain once; meeting a node already on the current
    /// chain means a cycle.
    fn check_acyclic(&self) -> Result<()> {
        let mut state = vec![Visit::New; self.categories.len()];

        for start in 0..self.categories.len() {
            let mut chain: Vec<usize> = Vec::new();
            let mut current = Some(start);

            while let Some(i) = current {
                match state[i] {
                    Visit::Done => break,
                    Visit::InChain => {
                        let from = chain.iter().position(|&c| c == i).unwrap_or(0);
                        let mut ids: Vec<&str> = chain[from..]
                            .iter()
                            .map(|&c| self.categories[c].id.as_str())
                            .collect();
                        ids.push(self.categories[i].id.as_str());
                        return Err(AppError::DataIntegrity(format!(
                            "Category parent cycle: {}",
                            ids.join(" -> ")
                        )));
                    }
                    Visit::New => {
                        state[i] = Visit::InChain;
                        chain.push(i);
                        current = self.parent_index(i);
                    }
                }
            }

            for i in chain {
                state[i] = Visit::Done;
            }
        }

        Ok(())
    }

    fn parent_index(&self, i: usize) -> Option<usize> {
        self.categories[i]
            .parent_id
            .as_deref()
            .and_then(|p| self.index.get(p))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, i: usize) -> &'a Category {
        let categories = self.categories;
        &categories[i]
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn children(&self, i: usize) -> &[usize] {
        &self.children[i]
    }

    pub fn has_children(&self, i: usize) -> bool {
        !self.children[i].is_empty()
    }

    /// Categories whose parent id matches nothing in the list
    pub fn orphans(&self) -> impl Iterator<Item = &'a Category> + '_ {
        let categories = self.categories;
        self.orphans.iter().map(move |&i| &categories[i])
    }

    /// Ancestors from the root down to, but excluding, `i`
    pub fn ancestors(&self, i: usize) -> Vec<&'a Category> {
        let categories = self.categories;
        let mut path = Vec::new();
        let mut current = self.parent_index(i);
        while let Some(p) = current {
            path.push(&categories[p]);
            current = self.parent_index(p);
        }
        path.reverse();
        path
    }
}
