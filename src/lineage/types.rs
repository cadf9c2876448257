//! Lineage snapshot types

use crate::dataset::Dataset;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of a run a dataset was observed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineageDirection {
    Input,
    Output,
}

impl std::fmt::Display for LineageDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// A collected dataset with its observation bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetLineageInfo {
    pub dataset: Dataset,
    /// Number of observation events recorded for this dataset
    pub count: u64,
    /// When the dataset was first observed
    pub first_seen: DateTime<Utc>,
    /// Component that made the first observation, if it identified itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,
}

/// Everything collected during one logical execution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookLineage {
    pub inputs: Vec<DatasetLineageInfo>,
    pub outputs: Vec<DatasetLineageInfo>,
}

impl HookLineage {
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }
}
