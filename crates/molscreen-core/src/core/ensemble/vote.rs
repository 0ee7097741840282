use serde::Deserialize;
use std::fmt;

/// A binary prediction made by one ensemble member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Positive,
    Negative,
}

/// Textual names of the two classes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LabelSet {
    pub positive: String,
    pub negative: String,
}

impl Default for LabelSet {
    fn default() -> Self {
        Self {
            positive: "above_5".to_string(),
            negative: "below_5".to_string(),
        }
    }
}

impl LabelSet {
    pub fn name(&self, label: Label) -> &str {
        match label {
            Label::Positive => &self.positive,
            Label::Negative => &self.negative,
        }
    }

    pub fn parse(&self, name: &str) -> Option<Label> {
        if name == self.positive {
            Some(Label::Positive)
        } else if name == self.negative {
            Some(Label::Negative)
        } else {
            None
        }
    }
}

/// Label assigned when exactly half of an even-sized ensemble votes positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TiePolicy {
    #[default]
    Negative,
    Positive,
}

impl TiePolicy {
    fn label(self) -> Label {
        match self {
            Self::Negative => Label::Negative,
            Self::Positive => Label::Positive,
        }
    }
}

impl fmt::Display for TiePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negative => write!(f, "negative"),
            Self::Positive => write!(f, "positive"),
        }
    }
}

/// Majority vote: positive iff strictly more than half of the votes are positive.
/// An exact tie goes to `tie`. No votes at all is negative.
pub fn majority_vote(votes: &[Label], tie: TiePolicy) -> Label {
    let positives = votes.iter().filter(|&&l| l == Label::Positive).count();
    let total = votes.len();
    if 2 * positives > total {
        Label::Positive
    } else if 2 * positives == total && total > 0 {
        tie.label()
    } else {
        Label::Negative
    }
}
