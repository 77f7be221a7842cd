//! Canonical filter tree

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// How a group combines its children
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Join {
    #[default]
    And,
    Or,
}

/// Predicate family of a leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafKind {
    Categorical,
    Numeric,
}

/// A numeric interval with per-end inclusivity; unbounded ends are ±∞
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericInterval {
    pub min: f64,
    pub max: f64,
    pub include_min: bool,
    pub include_max: bool,
}

impl NumericInterval {
    /// Inclusive `[min, max]`
    pub fn closed(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            include_min: true,
            include_max: true,
        }
    }

    /// Exclusive `(min, max)`
    pub fn open(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            include_min: false,
            include_max: false,
        }
    }

    /// `x < max` (or `x <= max` when `inclusive`)
    pub fn below(max: f64, inclusive: bool) -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max,
            include_min: true,
            include_max: inclusive,
        }
    }

    /// `x > min` (or `x >= min` when `inclusive`)
    pub fn above(min: f64, inclusive: bool) -> Self {
        Self {
            min,
            max: f64::INFINITY,
            include_min: inclusive,
            include_max: true,
        }
    }

    pub fn contains(&self, x: f64) -> bool {
        let above_min = if self.include_min {
            x >= self.min
        } else {
            x > self.min
        };
        let below_max = if self.include_max {
            x <= self.max
        } else {
            x < self.max
        };
        above_min && below_max
    }
}

/// What a leaf accepts
#[derive(Debug, Clone, PartialEq)]
pub enum Criteria {
    /// Acceptable categorical values
    Values(BTreeSet<String>),
    /// A row matches when its value falls in any of the intervals
    Ranges(Vec<NumericInterval>),
}

impl Criteria {
    pub fn kind(&self) -> LeafKind {
        match self {
            Criteria::Values(_) => LeafKind::Categorical,
            Criteria::Ranges(_) => LeafKind::Numeric,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Criteria::Values(values) => values.is_empty(),
            Criteria::Ranges(ranges) => ranges.is_empty(),
        }
    }
}

/// A single predicate on one term
#[derive(Debug, Clone, PartialEq)]
pub struct LeafFilter {
    pub term_id: String,
    pub criteria: Criteria,
    pub negate: bool,
}

impl LeafFilter {
    pub fn categorical<I, S>(term_id: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            term_id: term_id.into(),
            criteria: Criteria::Values(values.into_iter().map(Into::into).collect()),
            negate: false,
        }
    }

    pub fn numeric(term_id: impl Into<String>, ranges: Vec<NumericInterval>) -> Self {
        Self {
            term_id: term_id.into(),
            criteria: Criteria::Ranges(ranges),
            negate: false,
        }
    }

    /// A leaf that can never match, used for unrecognizable input
    pub fn always_empty() -> Self {
        Self {
            term_id: String::new(),
            criteria: Criteria::Values(BTreeSet::new()),
            negate: false,
        }
    }

    pub fn kind(&self) -> LeafKind {
        self.criteria.kind()
    }

    pub fn negated(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// Structural identity used to memoize leaf results
    pub fn cache_key(&self) -> LeafKey {
        let criteria = match &self.criteria {
            Criteria::Values(values) => CriteriaKey::Values(values.iter().cloned().collect()),
            Criteria::Ranges(ranges) => CriteriaKey::Ranges(
                ranges
                    .iter()
                    .map(|r| {
                        (
                            r.min.to_bits(),
                            r.max.to_bits(),
                            r.include_min,
                            r.include_max,
                        )
                    })
                    .collect(),
            ),
        };
        LeafKey {
            term_id: self.term_id.clone(),
            kind: self.kind(),
            negate: self.negate,
            criteria,
        }
    }
}

/// Hashable form of a leaf's criteria
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CriteriaKey {
    Values(Vec<String>),
    Ranges(Vec<(u64, u64, bool, bool)>),
}

/// Cache key of one leaf evaluation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeafKey {
    pub term_id: String,
    pub kind: LeafKind,
    pub negate: bool,
    pub criteria: CriteriaKey,
}

/// Normalized filter tree
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    Group {
        join: Join,
        negate: bool,
        children: Vec<FilterNode>,
    },
    Leaf(LeafFilter),
}

impl FilterNode {
    pub fn and(children: Vec<FilterNode>) -> Self {
        FilterNode::Group {
            join: Join::And,
            negate: false,
            children,
        }
    }

    pub fn or(children: Vec<FilterNode>) -> Self {
        FilterNode::Group {
            join: Join::Or,
            negate: false,
            children,
        }
    }

    /// Flip the negation flag of this node
    pub fn negated(self) -> Self {
        match self {
            FilterNode::Group {
                join,
                negate,
                children,
            } => FilterNode::Group {
                join,
                negate: !negate,
                children,
            },
            FilterNode::Leaf(leaf) => FilterNode::Leaf(leaf.negated()),
        }
    }

    /// Number of leaves in the tree
    pub fn leaf_count(&self) -> usize {
        match self {
            FilterNode::Group { children, .. } => children.iter().map(|c| c.leaf_count()).sum(),
            FilterNode::Leaf(_) => 1,
        }
    }
}

impl From<LeafFilter> for FilterNode {
    fn from(leaf: LeafFilter) -> Self {
        FilterNode::Leaf(leaf)
    }
}
