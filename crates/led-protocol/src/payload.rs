//! `LayoutPayload` — the coordinator's only view of the task hierarchy.
//!
//! External services pre-compute this shape; the coordinator renders it and
//! knows nothing else about projects, sprints or stories.

use serde::{Deserialize, Serialize};

/// Which hierarchical scene to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    SingleView,
    SprintView,
    UserStoryLayout,
}

/// Project line: display name and overall completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub name: String,
    pub percentage: f32,
}

/// One sprint and its user stories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintSummary {
    pub name: String,
    pub percentage: f32,
    #[serde(default)]
    pub user_stories: Vec<StorySummary>,
}

/// One user story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorySummary {
    pub title: String,
    pub percentage: f32,
}

/// Input to the hierarchical scene renderers.
///
/// Percentages may arrive outside `0..=100`; renderers clamp before use
/// (see [`LayoutPayload::clamped`]). A sprint with no user stories is legal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPayload {
    pub layout: Layout,
    pub project: ProjectSummary,
    #[serde(default)]
    pub sprints: Vec<SprintSummary>,
    /// Sprint shown by [`Layout::UserStoryLayout`]; defaults to 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_sprint_index: Option<usize>,
}

fn clamp(p: f32) -> f32 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 100.0)
    }
}

impl LayoutPayload {
    /// Copy of the payload with every percentage clamped to `0..=100`.
    pub fn clamped(&self) -> LayoutPayload {
        LayoutPayload {
            layout: self.layout,
            project: ProjectSummary {
                name: self.project.name.clone(),
                percentage: clamp(self.project.percentage),
            },
            sprints: self
                .sprints
                .iter()
                .map(|s| SprintSummary {
                    name: s.name.clone(),
                    percentage: clamp(s.percentage),
                    user_stories: s
                        .user_stories
                        .iter()
                        .map(|u| StorySummary {
                            title: u.title.clone(),
                            percentage: clamp(u.percentage),
                        })
                        .collect(),
                })
                .collect(),
            focus_sprint_index: self.focus_sprint_index,
        }
    }

    /// The sprint `UserStoryLayout` focuses on, if present.
    pub fn focus_sprint(&self) -> Option<(usize, &SprintSummary)> {
        let index = self.focus_sprint_index.unwrap_or(0);
        self.sprints.get(index).map(|s| (index, s))
    }
}
