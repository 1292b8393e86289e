//! The declared load order.
//!
//! Each [`Stage`] names the stages whose rows it reads. A plan is only run
//! if every dependency appears before the stage that needs it.

use std::{collections::HashSet, fmt};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
  Calendar,
  Organizations,
  RoundTypes,
  TopicRoots,
  TopicChildren,
  Questions,
  InterviewEvents,
}

impl Stage {
  /// The full seed run, in execution order.
  pub const PLAN: [Stage; 7] = [
    Self::Calendar,
    Self::Organizations,
    Self::RoundTypes,
    Self::TopicRoots,
    Self::TopicChildren,
    Self::Questions,
    Self::InterviewEvents,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Self::Calendar => "calendar",
      Self::Organizations => "organizations",
      Self::RoundTypes => "round_types",
      Self::TopicRoots => "topic_roots",
      Self::TopicChildren => "topic_children",
      Self::Questions => "questions",
      Self::InterviewEvents => "interview_events",
    }
  }

  /// Stages that must have committed before this one starts.
  pub fn depends_on(self) -> &'static [Stage] {
    match self {
      Self::Calendar | Self::Organizations | Self::RoundTypes | Self::TopicRoots => &[],
      Self::TopicChildren => &[Self::TopicRoots],
      Self::Questions => &[Self::TopicChildren],
      Self::InterviewEvents => &[
        Self::Calendar,
        Self::Organizations,
        Self::RoundTypes,
        Self::Questions,
      ],
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Reject a plan that repeats a stage or runs one before its dependencies.
pub fn validate_plan(plan: &[Stage]) -> Result<()> {
  let mut done = HashSet::new();
  for &stage in plan {
    if let Some(missing) = stage.depends_on().iter().find(|dep| !done.contains(*dep)) {
      return Err(Error::StagePlan(format!(
        "`{stage}` is scheduled before its dependency `{missing}`"
      )));
    }
    if !done.insert(stage) {
      return Err(Error::StagePlan(format!("`{stage}` is scheduled twice")));
    }
  }
  Ok(())
}
