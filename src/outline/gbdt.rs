//! Gradient-boosted decision tree inference over LightGBM text models.
//!
//! Reads the text format written by `Booster.save_model()`: a `key=value`
//! header, one `Tree=N` block per tree, terminated by `end of trees`.
//! Only inference is supported.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

use super::classifier::HeadingModel;
use super::features::FeatureVector;

/// `decision_type` bit: categorical split.
const CATEGORICAL_MASK: u8 = 1;
/// `decision_type` bit: missing values go left.
const DEFAULT_LEFT_MASK: u8 = 2;
/// Values this close to zero count as zero for `MissingType::Zero`.
const ZERO_THRESHOLD: f64 = 1e-35;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MissingType {
    None,
    Zero,
    NaN,
}

impl MissingType {
    fn from_decision_type(decision_type: u8) -> Self {
        match (decision_type >> 2) & 3 {
            1 => MissingType::Zero,
            2 => MissingType::NaN,
            _ => MissingType::None,
        }
    }
}

/// Output transform named by the model's `objective`.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Objective {
    /// Logistic output with the given sigmoid scale
    Binary { sigmoid: f64 },
    /// Raw score clamped to [0, 1]
    Regression,
}

impl Objective {
    fn parse(spec: &str) -> Result<Self> {
        let mut parts = spec.split_whitespace();
        let name = parts.next().unwrap_or("");
        match name {
            "binary" => {
                let mut sigmoid = 1.0;
                for param in parts {
                    if let Some(value) = param.strip_prefix("sigmoid:") {
                        sigmoid = value.parse().map_err(|_| {
                            Error::ModelFormat(format!("bad sigmoid parameter: {}", value))
                        })?;
                    }
                }
                Ok(Objective::Binary { sigmoid })
            }
            "cross_entropy" | "xentropy" => Ok(Objective::Binary { sigmoid: 1.0 }),
            "regression" | "regression_l2" | "regression_l1" | "huber" | "fair" => {
                Ok(Objective::Regression)
            }
            other => Err(Error::ModelFormat(format!(
                "unsupported objective: {:?}",
                other
            ))),
        }
    }

    fn transform(&self, raw: f64) -> f64 {
        match *self {
            Objective::Binary { sigmoid } => 1.0 / (1.0 + (-sigmoid * raw).exp()),
            Objective::Regression => raw.clamp(0.0, 1.0),
        }
    }
}

/// One decision tree in flat array form.
#[derive(Debug, Clone)]
struct Tree {
    split_feature: Vec<usize>,
    threshold: Vec<f64>,
    decision_type: Vec<u8>,
    left_child: Vec<i32>,
    right_child: Vec<i32>,
    leaf_value: Vec<f64>,
    cat_boundaries: Vec<usize>,
    cat_threshold: Vec<u32>,
}

impl Tree {
    fn from_fields(index: usize, fields: &HashMap<&str, &str>) -> Result<Self> {
        let context = |key: &str| format!("tree {}: {}", index, key);

        let num_leaves: usize = parse_scalar(fields, "num_leaves", &context)?;
        if fields.get("is_linear").map(|v| v.trim() == "1").unwrap_or(false) {
            return Err(Error::ModelFormat(context("linear trees are not supported")));
        }

        let leaf_value: Vec<f64> = parse_list(fields, "leaf_value", &context)?;
        if leaf_value.len() != num_leaves {
            return Err(Error::ModelFormat(context("leaf_value length")));
        }

        if num_leaves <= 1 {
            return Ok(Self {
                split_feature: Vec::new(),
                threshold: Vec::new(),
                decision_type: Vec::new(),
                left_child: Vec::new(),
                right_child: Vec::new(),
                leaf_value,
                cat_boundaries: Vec::new(),
                cat_threshold: Vec::new(),
            });
        }

        let internal = num_leaves - 1;
        let tree = Self {
            split_feature: parse_list(fields, "split_feature", &context)?,
            threshold: parse_list(fields, "threshold", &context)?,
            decision_type: parse_list(fields, "decision_type", &context)?,
            left_child: parse_list(fields, "left_child", &context)?,
            right_child: parse_list(fields, "right_child", &context)?,
            leaf_value,
            cat_boundaries: parse_optional_list(fields, "cat_boundaries", &context)?,
            cat_threshold: parse_optional_list(fields, "cat_threshold", &context)?,
        };

        let lengths = [
            tree.split_feature.len(),
            tree.threshold.len(),
            tree.decision_type.len(),
            tree.left_child.len(),
            tree.right_child.len(),
        ];
        if lengths.iter().any(|&len| len != internal) {
            return Err(Error::ModelFormat(context("split arrays length")));
        }

        for &child in tree.left_child.iter().chain(&tree.right_child) {
            let in_range = if child >= 0 {
                (child as usize) < internal
            } else {
                ((!child) as usize) < num_leaves
            };
            if !in_range {
                return Err(Error::ModelFormat(context("child index out of range")));
            }
        }

        Ok(tree)
    }

    fn max_feature(&self) -> Option<usize> {
        self.split_feature.iter().copied().max()
    }

    fn predict(&self, features: &[f64]) -> f64 {
        if self.split_feature.is_empty() {
            return self.leaf_value.first().copied().unwrap_or(0.0);
        }

        let mut node: i32 = 0;
        // A root-to-leaf path visits each internal node at most once.
        for _ in 0..=self.split_feature.len() {
            let n = node as usize;
            let value = features.get(self.split_feature[n]).copied().unwrap_or(f64::NAN);
            node = if self.decision_type[n] & CATEGORICAL_MASK != 0 {
                self.categorical_decision(value, n)
            } else {
                self.numerical_decision(value, n)
            };
            if node < 0 {
                return self.leaf_value.get((!node) as usize).copied().unwrap_or(0.0);
            }
        }
        0.0
    }

    fn numerical_decision(&self, mut value: f64, node: usize) -> i32 {
        let decision_type = self.decision_type[node];
        let missing = MissingType::from_decision_type(decision_type);

        if value.is_nan() && missing != MissingType::NaN {
            value = 0.0;
        }
        if (missing == MissingType::Zero && value.abs() <= ZERO_THRESHOLD)
            || (missing == MissingType::NaN && value.is_nan())
        {
            return if decision_type & DEFAULT_LEFT_MASK != 0 {
                self.left_child[node]
            } else {
                self.right_child[node]
            };
        }

        if value <= self.threshold[node] {
            self.left_child[node]
        } else {
            self.right_child[node]
        }
    }

    fn categorical_decision(&self, value: f64, node: usize) -> i32 {
        let missing = MissingType::from_decision_type(self.decision_type[node]);
        let category = if value.is_nan() {
            if missing == MissingType::NaN {
                return self.right_child[node];
            }
            0
        } else {
            value as i64
        };
        if category < 0 {
            return self.right_child[node];
        }

        let cat_idx = self.threshold[node] as usize;
        let (Some(&start), Some(&end)) = (
            self.cat_boundaries.get(cat_idx),
            self.cat_boundaries.get(cat_idx + 1),
        ) else {
            return self.right_child[node];
        };
        let bitset = self.cat_threshold.get(start..end).unwrap_or(&[]);

        let word = (category / 32) as usize;
        let bit = (category % 32) as u32;
        match bitset.get(word) {
            Some(bits) if (bits >> bit) & 1 == 1 => self.left_child[node],
            _ => self.right_child[node],
        }
    }
}

/// A LightGBM binary classifier loaded from its text dump.
#[derive(Debug, Clone)]
pub struct GbdtModel {
    trees: Vec<Tree>,
    objective: Objective,
    average_output: bool,
    feature_names: Vec<String>,
}

impl GbdtModel {
    /// Load a model file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::ModelLoad(format!("{}: {}", path.display(), e)))?;
        let model: Self = text.parse()?;
        log::info!(
            "Loaded heading model from {} ({} trees)",
            path.display(),
            model.num_trees()
        );
        Ok(model)
    }

    /// Number of trees.
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Feature names recorded in the model header.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Raw (untransformed) score.
    pub fn raw_score(&self, features: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|tree| tree.predict(features)).sum();
        if self.average_output && !self.trees.is_empty() {
            sum / self.trees.len() as f64
        } else {
            sum
        }
    }

    /// Probability for a feature row in model column order.
    pub fn predict_row(&self, features: &[f64]) -> f64 {
        self.objective.transform(self.raw_score(features))
    }
}

impl std::str::FromStr for GbdtModel {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let mut header: HashMap<&str, &str> = HashMap::new();
        let mut average_output = false;
        let mut blocks: Vec<HashMap<&str, &str>> = Vec::new();
        let mut current: Option<HashMap<&str, &str>> = None;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "end of trees" {
                break;
            }
            if line.starts_with("Tree=") {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
                current = Some(HashMap::new());
                continue;
            }
            if line == "average_output" {
                average_output = true;
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            match current.as_mut() {
                Some(block) => {
                    block.insert(key, value);
                }
                None => {
                    header.insert(key, value);
                }
            }
        }
        if let Some(block) = current.take() {
            blocks.push(block);
        }

        if !header.contains_key("version") && blocks.is_empty() {
            return Err(Error::ModelFormat("not a LightGBM text model".to_string()));
        }

        let num_class: usize = header
            .get("num_class")
            .map(|v| v.trim().parse())
            .transpose()
            .map_err(|_| Error::ModelFormat("bad num_class".to_string()))?
            .unwrap_or(1);
        if num_class != 1 {
            return Err(Error::ModelFormat(format!(
                "expected a single-output model, got num_class={}",
                num_class
            )));
        }

        let objective = match header.get("objective") {
            Some(spec) => Objective::parse(spec)?,
            None => Objective::Binary { sigmoid: 1.0 },
        };

        let feature_names: Vec<String> = header
            .get("feature_names")
            .map(|v| v.split_whitespace().map(String::from).collect())
            .unwrap_or_default();

        let trees = blocks
            .iter()
            .enumerate()
            .map(|(i, fields)| Tree::from_fields(i, fields))
            .collect::<Result<Vec<_>>>()?;
        if trees.is_empty() {
            return Err(Error::ModelFormat("model has no trees".to_string()));
        }

        if let Some(max) = trees.iter().filter_map(Tree::max_feature).max() {
            if max >= FeatureVector::LEN {
                return Err(Error::ModelFormat(format!(
                    "model splits on feature {} but only {} features exist",
                    max,
                    FeatureVector::LEN
                )));
            }
        }
        if !feature_names.is_empty() && feature_names.len() != FeatureVector::LEN {
            log::warn!(
                "Heading model declares {} features, expected {}",
                feature_names.len(),
                FeatureVector::LEN
            );
        }

        Ok(Self {
            trees,
            objective,
            average_output,
            feature_names,
        })
    }
}

impl HeadingModel for GbdtModel {
    fn predict(&self, features: &FeatureVector) -> f32 {
        let row = features.to_array().map(f64::from);
        self.predict_row(&row) as f32
    }
}

fn parse_scalar<T: std::str::FromStr>(
    fields: &HashMap<&str, &str>,
    key: &str,
    context: &dyn Fn(&str) -> String,
) -> Result<T> {
    fields
        .get(key)
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| Error::ModelFormat(context(key)))
}

fn parse_list<T: std::str::FromStr>(
    fields: &HashMap<&str, &str>,
    key: &str,
    context: &dyn Fn(&str) -> String,
) -> Result<Vec<T>> {
    let value = fields
        .get(key)
        .ok_or_else(|| Error::ModelFormat(context(key)))?;
    value
        .split_whitespace()
        .map(|item| item.parse().map_err(|_| Error::ModelFormat(context(key))))
        .collect()
}

fn parse_optional_list<T: std::str::FromStr>(
    fields: &HashMap<&str, &str>,
    key: &str,
    context: &dyn Fn(&str) -> String,
) -> Result<Vec<T>> {
    if fields.contains_key(key) {
        parse_list(fields, key, context)
    } else {
        Ok(Vec::new())
    }
}
