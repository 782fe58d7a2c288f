use serde::Serialize;

use super::model::{Child, ProfileDetails};
use super::schema::ChildInput;

const FIELD_WEIGHT: u32 = 10;
const DEPENDENT_WEIGHT: u32 = 30;

/// Anything that carries the two dependent fields the rubric looks at.
pub trait Dependent {
    fn name(&self) -> Option<&str>;
    fn class_name(&self) -> Option<&str>;
}

impl Dependent for Child {
    fn name(&self) -> Option<&str> {
        Some(self.name.as_str())
    }

    fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }
}

impl Dependent for ChildInput {
    fn name(&self) -> Option<&str> {
        Some(self.name.as_str())
    }

    fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileCompletion {
    pub percentage: u8,
    pub missing_fields: Vec<&'static str>,
}

fn filled(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Scores a profile: 10 points per filled field (7 fields), plus 30 when at
/// least one dependent has both a name and a class.
pub fn calculate_completion<D: Dependent>(
    profile: Option<&ProfileDetails>,
    dependents: &[D],
) -> ProfileCompletion {
    let fields: [(&'static str, Option<&str>); 7] = match profile {
        Some(p) => [
            ("address", p.address.as_deref()),
            ("city", p.city.as_deref()),
            ("pincode", p.pincode.as_deref()),
            ("education", p.education.as_deref()),
            ("relation", p.relation.as_deref()),
            ("counterpart_name", p.counterpart_name.as_deref()),
            ("counterpart_phone", p.counterpart_phone.as_deref()),
        ],
        None => [
            ("address", None),
            ("city", None),
            ("pincode", None),
            ("education", None),
            ("relation", None),
            ("counterpart_name", None),
            ("counterpart_phone", None),
        ],
    };

    let mut score = 0;
    let mut missing_fields = Vec::new();
    for (name, value) in fields {
        if filled(value) {
            score += FIELD_WEIGHT;
        } else {
            missing_fields.push(name);
        }
    }

    if dependents
        .iter()
        .any(|d| filled(d.name()) && filled(d.class_name()))
    {
        score += DEPENDENT_WEIGHT;
    }

    ProfileCompletion {
        percentage: score.min(100) as u8,
        missing_fields,
    }
}
