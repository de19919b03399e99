use std::fmt::{self, Display};

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use super::flow_rate::Grantee;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortingMethod {
    #[default]
    Random,
    Alphabetical,
    Popular,
}

impl Display for SortingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortingMethod::Random => write!(f, "Random"),
            SortingMethod::Alphabetical => write!(f, "Alphabetical"),
            SortingMethod::Popular => write!(f, "Popular"),
        }
    }
}

/// Orders the whole slice. Random always reshuffles.
pub fn sort_grantees<R>(grantees: &mut [Grantee], method: SortingMethod, rng: &mut R)
where
    R: Rng + ?Sized,
{
    match method {
        SortingMethod::Random => grantees.shuffle(rng),
        SortingMethod::Alphabetical => grantees.sort_by(|a, b| a.title().cmp(b.title())),
        SortingMethod::Popular => grantees.sort_by(|a, b| b.units.cmp(&a.units)),
    }
}
