//! Literal seed data for the interview analytics warehouse.
//!
//! Everything here is keyed by natural key only. Surrogate keys (a child
//! topic's parent, a question's topic) are resolved at load time.

use std::collections::BTreeMap;

use warehouse_core::model::{Difficulty, InterviewRoundType, Organization};

/// A topic to be loaded, before its parent key is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSpec {
  pub code: String,
  pub name: String,
}

impl TopicSpec {
  pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
    Self { code: code.into(), name: name.into() }
  }
}

/// A question to be loaded, referencing its level-2 topic by code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSpec {
  pub code:       String,
  pub text:       String,
  pub topic_code: String,
  pub difficulty: Difficulty,
  pub source:     String,
}

/// All literal dimension rows for one seed run.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
  pub organizations:  Vec<Organization>,
  pub round_types:    Vec<InterviewRoundType>,
  pub topic_roots:    Vec<TopicSpec>,
  /// Level-2 topics keyed by the code of their level-1 parent.
  pub topic_children: BTreeMap<String, Vec<TopicSpec>>,
  pub questions:      Vec<QuestionSpec>,
}

impl Catalog {
  /// The interview-preparation seed set.
  pub fn interview_seed() -> Self {
    Self {
      organizations:  organizations(),
      round_types:    round_types(),
      topic_roots:    topic_roots(),
      topic_children: topic_children(),
      questions:      questions(),
    }
  }
}

fn organizations() -> Vec<Organization> {
  [
    ("GOOG", "Google", "Technology", "Enterprise", "Bangalore", true),
    ("MSFT", "Microsoft", "Technology", "Enterprise", "Hyderabad", true),
    ("AMZN", "Amazon", "E-commerce", "Enterprise", "Bangalore", true),
    ("FLIP", "Flipkart", "E-commerce", "Large", "Bangalore", true),
    ("PAYT", "PayTM", "Fintech", "Large", "Noida", true),
    ("ZETA", "Zeta", "Fintech", "Medium", "Bangalore", true),
    ("SURL", "Swiggy", "Food Tech", "Large", "Bangalore", true),
    ("UBER", "Uber", "Transportation", "Enterprise", "Bangalore", true),
    ("TCS", "TCS", "IT Services", "Enterprise", "Multiple", false),
    ("INFO", "Infosys", "IT Services", "Enterprise", "Bangalore", false),
  ]
  .into_iter()
  .map(|(code, name, industry, size, location, product)| Organization {
    code:             code.into(),
    name:             name.into(),
    industry:         industry.into(),
    size_tier:        size.into(),
    location:         location.into(),
    is_product_based: product,
  })
  .collect()
}

fn round_types() -> Vec<InterviewRoundType> {
  [
    ("OA", "Online Assessment", "Initial coding test"),
    ("TECH1", "Technical Round 1", "First technical interview"),
    ("TECH2", "Technical Round 2", "Second technical interview"),
    ("TECH3", "Technical Round 3", "Third technical interview (if any)"),
    ("MGR", "Managerial Round", "Interview with hiring manager"),
    ("HR", "HR Round", "Final HR discussion"),
  ]
  .into_iter()
  .zip(1..)
  .map(|((code, name, description), sequence)| InterviewRoundType {
    code: code.into(),
    name: name.into(),
    sequence,
    description: description.into(),
  })
  .collect()
}

fn topic_roots() -> Vec<TopicSpec> {
  vec![
    TopicSpec::new("DSA", "Data Structures & Algorithms"),
    TopicSpec::new("DBMS", "Database Management Systems"),
    TopicSpec::new("OS", "Operating Systems"),
    TopicSpec::new("NET", "Computer Networks"),
    TopicSpec::new("OOP", "Object Oriented Programming"),
    TopicSpec::new("SYS", "System Design"),
  ]
}

fn topic_children() -> BTreeMap<String, Vec<TopicSpec>> {
  let dsa = [
    ("DSA-ARR", "Arrays"),
    ("DSA-STR", "Strings"),
    ("DSA-LL", "Linked Lists"),
    ("DSA-TREE", "Trees"),
    ("DSA-GRAPH", "Graphs"),
    ("DSA-DP", "Dynamic Programming"),
    ("DSA-GREEDY", "Greedy Algorithms"),
    ("DSA-BS", "Binary Search"),
  ];
  let dbms = [
    ("DBMS-SQL", "SQL Queries"),
    ("DBMS-NORM", "Normalization"),
    ("DBMS-INDEX", "Indexing"),
    ("DBMS-TRANS", "Transactions"),
  ];

  let specs = |children: &[(&str, &str)]| {
    children
      .iter()
      .map(|(code, name)| TopicSpec::new(*code, *name))
      .collect::<Vec<_>>()
  };
  BTreeMap::from([
    ("DSA".to_owned(), specs(&dsa)),
    ("DBMS".to_owned(), specs(&dbms)),
  ])
}

fn questions() -> Vec<QuestionSpec> {
  use Difficulty::{Easy, Hard, Medium};

  [
    ("Q001", "Find two numbers that add up to target", "DSA-ARR", Easy, "LeetCode"),
    ("Q002", "Reverse a linked list", "DSA-LL", Easy, "LeetCode"),
    ("Q003", "Lowest Common Ancestor in BST", "DSA-TREE", Medium, "LeetCode"),
    ("Q004", "Implement LRU Cache", "DSA-ARR", Hard, "LeetCode"),
    ("Q005", "Longest Common Subsequence", "DSA-DP", Medium, "LeetCode"),
    ("Q006", "Detect cycle in directed graph", "DSA-GRAPH", Medium, "Manual"),
    ("Q007", "Maximum subarray sum", "DSA-ARR", Medium, "LeetCode"),
    ("Q008", "Valid Parentheses", "DSA-STR", Easy, "LeetCode"),
    ("Q009", "Merge K sorted lists", "DSA-LL", Hard, "LeetCode"),
    ("Q010", "Write SQL join query", "DBMS-SQL", Medium, "Manual"),
    ("Q011", "Explain 3NF with example", "DBMS-NORM", Medium, "Manual"),
    ("Q012", "When to use indexing?", "DBMS-INDEX", Medium, "Manual"),
  ]
  .into_iter()
  .map(|(code, text, topic, difficulty, source)| QuestionSpec {
    code: code.into(),
    text: text.into(),
    topic_code: topic.into(),
    difficulty,
    source: source.into(),
  })
  .collect()
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use super::*;

  #[test]
  fn seed_sizes() {
    let c = Catalog::interview_seed();
    assert_eq!(c.organizations.len(), 10);
    assert_eq!(c.round_types.len(), 6);
    assert_eq!(c.topic_roots.len(), 6);
    assert_eq!(c.topic_children.values().map(Vec::len).sum::<usize>(), 12);
    assert_eq!(c.questions.len(), 12);
  }

  #[test]
  fn round_sequence_follows_interview_order() {
    let c = Catalog::interview_seed();
    let seq: Vec<_> = c.round_types.iter().map(|r| (r.code.as_str(), r.sequence)).collect();
    assert_eq!(seq[0], ("OA", 1));
    assert_eq!(seq[5], ("HR", 6));
  }

  #[test]
  fn every_reference_names_a_declared_topic() {
    let c = Catalog::interview_seed();
    let roots: BTreeSet<_> = c.topic_roots.iter().map(|t| t.code.as_str()).collect();
    assert!(c.topic_children.keys().all(|parent| roots.contains(parent.as_str())));

    let children: BTreeSet<_> = c
      .topic_children
      .values()
      .flatten()
      .map(|t| t.code.as_str())
      .collect();
    assert!(c.questions.iter().all(|q| children.contains(q.topic_code.as_str())));
  }
}
