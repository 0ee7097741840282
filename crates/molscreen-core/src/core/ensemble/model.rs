use super::EnsembleError;
use super::vote::{Label, TiePolicy, majority_vote};
use serde::Deserialize;
use std::fmt::Debug;

/// A trained binary classifier over a fixed-width feature row.
pub trait Classifier: Debug + Send + Sync {
    fn n_features(&self) -> usize;

    /// Declared class names as `[negative, positive]`.
    fn classes(&self) -> [&str; 2];

    fn predict(&self, row: &[f64]) -> Result<Label, EnsembleError>;
}

/// Serialized classifier, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ModelArtifact {
    Logistic(LogisticModel),
    DecisionTree(DecisionTree),
    Forest(Forest),
}

impl ModelArtifact {
    /// Checks internal consistency and returns the model as a trait object.
    pub fn into_classifier(self) -> Result<Box<dyn Classifier>, EnsembleError> {
        match self {
            Self::Logistic(m) => Ok(Box::new(m)),
            Self::DecisionTree(t) => {
                t.validate()?;
                Ok(Box::new(t))
            }
            Self::Forest(f) => {
                if f.trees.is_empty() {
                    return Err(EnsembleError::InvalidArtifact(
                        "forest has no trees".to_string(),
                    ));
                }
                for tree in &f.trees {
                    validate_nodes(&tree.nodes, f.n_features, &f.classes)?;
                }
                Ok(Box::new(f))
            }
        }
    }
}

fn check_row(expected: usize, row: &[f64]) -> Result<(), EnsembleError> {
    if row.len() != expected {
        return Err(EnsembleError::FeatureCount {
            component: "model",
            expected,
            actual: row.len(),
        });
    }
    Ok(())
}

/// Linear decision function `coef · x + intercept`; positive iff the decision is above zero.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LogisticModel {
    pub coef: Vec<f64>,
    pub intercept: f64,
    pub classes: [String; 2],
}

impl LogisticModel {
    pub fn decision(&self, row: &[f64]) -> f64 {
        self.coef.iter().zip(row).map(|(c, x)| c * x).sum::<f64>() + self.intercept
    }
}

impl Classifier for LogisticModel {
    fn n_features(&self) -> usize {
        self.coef.len()
    }

    fn classes(&self) -> [&str; 2] {
        [self.classes[0].as_str(), self.classes[1].as_str()]
    }

    fn predict(&self, row: &[f64]) -> Result<Label, EnsembleError> {
        check_row(self.n_features(), row)?;
        Ok(if self.decision(row) > 0.0 {
            Label::Positive
        } else {
            Label::Negative
        })
    }
}

/// A node of a binary decision tree stored as a flat array. Children always have a larger
/// index than their parent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        label: String,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DecisionTree {
    pub n_features: usize,
    pub classes: [String; 2],
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn validate(&self) -> Result<(), EnsembleError> {
        validate_nodes(&self.nodes, self.n_features, &self.classes)
    }
}

impl Classifier for DecisionTree {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> [&str; 2] {
        [self.classes[0].as_str(), self.classes[1].as_str()]
    }

    fn predict(&self, row: &[f64]) -> Result<Label, EnsembleError> {
        check_row(self.n_features, row)?;
        walk(&self.nodes, &self.classes, row)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ForestTree {
    pub nodes: Vec<TreeNode>,
}

/// Majority of its trees' votes; an exact tie is negative.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Forest {
    pub n_features: usize,
    pub classes: [String; 2],
    pub trees: Vec<ForestTree>,
}

impl Classifier for Forest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> [&str; 2] {
        [self.classes[0].as_str(), self.classes[1].as_str()]
    }

    fn predict(&self, row: &[f64]) -> Result<Label, EnsembleError> {
        check_row(self.n_features, row)?;
        let votes = self
            .trees
            .iter()
            .map(|tree| walk(&tree.nodes, &self.classes, row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(majority_vote(&votes, TiePolicy::Negative))
    }
}

fn validate_nodes(
    nodes: &[TreeNode],
    n_features: usize,
    classes: &[String; 2],
) -> Result<(), EnsembleError> {
    if nodes.is_empty() {
        return Err(EnsembleError::InvalidArtifact("tree has no nodes".to_string()));
    }
    for (idx, node) in nodes.iter().enumerate() {
        match node {
            TreeNode::Split {
                feature,
                left,
                right,
                ..
            } => {
                if *feature >= n_features {
                    return Err(EnsembleError::InvalidArtifact(format!(
                        "node {} splits on feature {} but the tree has {} features",
                        idx, feature, n_features
                    )));
                }
                for child in [*left, *right] {
                    if child <= idx || child >= nodes.len() {
                        return Err(EnsembleError::InvalidArtifact(format!(
                            "node {} has invalid child index {}",
                            idx, child
                        )));
                    }
                }
            }
            TreeNode::Leaf { label } => {
                if !classes.contains(label) {
                    return Err(EnsembleError::InvalidArtifact(format!(
                        "leaf {} has undeclared label '{}'",
                        idx, label
                    )));
                }
            }
        }
    }
    Ok(())
}

fn walk(nodes: &[TreeNode], classes: &[String; 2], row: &[f64]) -> Result<Label, EnsembleError> {
    let mut idx = 0;
    for _ in 0..=nodes.len() {
        match nodes.get(idx) {
            Some(TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            }) => {
                let value = row.get(*feature).ok_or(EnsembleError::FeatureCount {
                    component: "model",
                    expected: *feature + 1,
                    actual: row.len(),
                })?;
                idx = if *value <= *threshold {
                    *left
                } else {
                    *right
                };
            }
            Some(TreeNode::Leaf { label }) => {
                return Ok(if *label == classes[1] {
                    Label::Positive
                } else {
                    Label::Negative
                });
            }
            None => {
                return Err(EnsembleError::InvalidArtifact(format!(
                    "tree references missing node {}",
                    idx
                )));
            }
        }
    }
    Err(EnsembleError::InvalidArtifact(
        "tree traversal does not reach a leaf".to_string(),
    ))
}
