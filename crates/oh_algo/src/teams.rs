//! crates/oh_algo/src/teams.rs
//! Team → nonprofit grouping for the judging and assignment views.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use oh_core::determinism::cmp_labelled;
use oh_core::ids::{NonprofitId, TeamId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nonprofit {
    pub id: NonprofitId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonprofit_id: Option<NonprofitId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NonprofitGroup {
    pub nonprofit: Nonprofit,
    pub teams: Vec<Team>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TeamAssignment {
    /// Every nonprofit, including ones nobody picked.
    pub groups: Vec<NonprofitGroup>,
    /// Teams that have not chosen a nonprofit yet.
    pub unassigned: Vec<Team>,
    /// Teams pointing at a nonprofit id that is not in the list.
    pub dangling: Vec<Team>,
}

impl TeamAssignment {
    pub fn assigned_count(&self) -> usize {
        self.groups.iter().map(|g| g.teams.len()).sum()
    }
}

fn cmp_team(a: &Team, b: &Team) -> core::cmp::Ordering {
    cmp_labelled(&a.name, &a.id, &b.name, &b.id)
}

/// Group teams under their nonprofits. On duplicate nonprofit ids the first wins.
pub fn group_teams(nonprofits: &[Nonprofit], teams: &[Team]) -> TeamAssignment {
    let mut by_id: BTreeMap<&NonprofitId, NonprofitGroup> = BTreeMap::new();
    for np in nonprofits {
        by_id
            .entry(&np.id)
            .or_insert_with(|| NonprofitGroup { nonprofit: np.clone(), teams: Vec::new() });
    }

    let mut out = TeamAssignment::default();
    for team in teams {
        match &team.nonprofit_id {
            None => out.unassigned.push(team.clone()),
            Some(id) => match by_id.get_mut(id) {
                Some(group) => group.teams.push(team.clone()),
                None => out.dangling.push(team.clone()),
            },
        }
    }

    out.groups = by_id.into_values().collect();
    out.groups.sort_by(|a, b| {
        cmp_labelled(&a.nonprofit.name, &a.nonprofit.id, &b.nonprofit.name, &b.nonprofit.id)
    });
    for g in &mut out.groups {
        g.teams.sort_by(cmp_team);
    }
    out.unassigned.sort_by(cmp_team);
    out.dangling.sort_by(cmp_team);
    out
}
