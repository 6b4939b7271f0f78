//! Decision tree
//!
//! A Gini classification tree grown by `linfa-trees`. It is the second
//! default learner of the multiple reject option classifier.
//!
//! `linfa-trees` only reports the majority class of a leaf, so after growth
//! the training rows are routed once more and every leaf keeps the fraction
//! of class 1 among its rows as the predicted probability.
use crate::checks::{check_predict_input, check_x_y_s};
use crate::constants::DECISION_THRESHOLD;
use crate::data::{to_labels, Matrix};
use crate::errors::FairnessError;
use crate::estimator::Estimator;
use hashbrown::HashMap;
use linfa::traits::Fit;
use linfa::Dataset;
use linfa_trees::{DecisionTree, SplitQuality, TreeNode};
use log::debug;
use serde::{Deserialize, Serialize};

/// Walk a row down to its leaf.
///
/// Rows with a value below the split go left. The returned path has one
/// `l` or `r` per step and identifies the leaf.
fn leaf_path<'t>(root: &'t TreeNode<f64, usize>, x: &Matrix<f64>, row: usize) -> (String, &'t TreeNode<f64, usize>) {
    let mut node = root;
    let mut path = String::new();
    while !node.is_leaf() {
        let (feature, value, _) = node.split();
        let children = node.children();
        let (step, child) = if *x.get(row, feature) < value {
            ('l', children[0].as_deref())
        } else {
            ('r', children[1].as_deref())
        };
        match child {
            Some(c) => {
                path.push(step);
                node = c;
            }
            None => break,
        }
    }
    (path, node)
}

#[derive(Deserialize, Serialize, Clone, Debug)]
struct FittedTree {
    tree: DecisionTree<f64, usize>,
    /// Fraction of class 1 among the training rows of each leaf, keyed by path.
    leaf_proba: HashMap<String, f64>,
    n_features: usize,
}

/// Gini classification tree.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct DecisionTreeClassifier {
    /// Maximum depth, `None` grows until the leaves are pure.
    pub max_depth: Option<usize>,
    /// Minimum number of rows a node needs to be split.
    pub min_samples_split: usize,
    /// Minimum number of rows in each child of a split.
    pub min_samples_leaf: usize,
    fitted: Option<FittedTree>,
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        DecisionTreeClassifier {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            fitted: None,
        }
    }
}

impl DecisionTreeClassifier {
    pub fn new(
        max_depth: Option<usize>,
        min_samples_split: usize,
        min_samples_leaf: usize,
    ) -> Result<Self, FairnessError> {
        if min_samples_split < 2 {
            return Err(FairnessError::InvalidParameter(
                "min_samples_split".to_string(),
                "integer of at least 2".to_string(),
                min_samples_split.to_string(),
            ));
        }
        if min_samples_leaf < 1 {
            return Err(FairnessError::InvalidParameter(
                "min_samples_leaf".to_string(),
                "integer of at least 1".to_string(),
                min_samples_leaf.to_string(),
            ));
        }
        Ok(DecisionTreeClassifier {
            max_depth,
            min_samples_split,
            min_samples_leaf,
            ..Default::default()
        })
    }

    /// Number of leaves, `None` before `fit`.
    pub fn n_leaves(&self) -> Option<usize> {
        self.fitted.as_ref().map(|f| f.tree.num_leaves())
    }

    /// Depth of the deepest leaf, `None` before `fit`.
    pub fn depth(&self) -> Option<usize> {
        self.fitted.as_ref().map(|f| f.tree.max_depth())
    }
}

impl Estimator for DecisionTreeClassifier {
    fn fit(&mut self, x: &Matrix<f64>, y: &[f64]) -> Result<(), FairnessError> {
        check_x_y_s(x, y, None)?;
        let dataset = Dataset::new(x.to_array()?, to_labels(y));
        let tree = DecisionTree::<f64, usize>::params()
            .split_quality(SplitQuality::Gini)
            .max_depth(self.max_depth)
            .min_weight_split(self.min_samples_split as f32)
            .min_weight_leaf(self.min_samples_leaf as f32)
            .fit(&dataset)
            .map_err(|e| FairnessError::LearnerFailed(self.name().to_string(), e.to_string()))?;

        let mut counts: HashMap<String, (f64, f64)> = HashMap::new();
        for (row, y_) in y.iter().enumerate() {
            let (path, _) = leaf_path(tree.root_node(), x, row);
            let entry = counts.entry(path).or_insert((0.0, 0.0));
            entry.0 += y_;
            entry.1 += 1.0;
        }
        let leaf_proba = counts
            .into_iter()
            .map(|(path, (positives, n))| (path, positives / n))
            .collect();

        debug!(
            "DecisionTreeClassifier grown with {} leaves and depth {}.",
            tree.num_leaves(),
            tree.max_depth()
        );
        self.fitted = Some(FittedTree {
            tree,
            leaf_proba,
            n_features: x.cols,
        });
        Ok(())
    }

    fn predict(&self, x: &Matrix<f64>) -> Result<Vec<f64>, FairnessError> {
        Ok(self
            .predict_proba(x)?
            .into_iter()
            .map(|p| if p > DECISION_THRESHOLD { 1.0 } else { 0.0 })
            .collect())
    }

    fn predict_proba(&self, x: &Matrix<f64>) -> Result<Vec<f64>, FairnessError> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or_else(|| FairnessError::NotFitted(self.name().to_string(), "predict".to_string()))?;
        check_predict_input(x, None, fitted.n_features, self.name())?;
        Ok((0..x.rows)
            .map(|row| {
                let (path, node) = leaf_path(fitted.tree.root_node(), x, row);
                match fitted.leaf_proba.get(&path) {
                    Some(p) => *p,
                    None => node.prediction().map_or(0.0, |c| c as f64),
                }
            })
            .collect())
    }

    fn has_predict_proba(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "DecisionTreeClassifier"
    }

    fn boxed_clone(&self) -> Box<dyn Estimator> {
        Box::new(self.clone())
    }
}
