//! Interactive assistant selection.

use std::collections::HashSet;

use tracing::debug;

use ensemble_assistants::Assistant;

use crate::console::{Console, ConsoleError};

/// Printed when a selection line names no valid assistant.
pub const INVALID_SELECTION: &str = "Invalid selection. Please try again.";

/// An ordered, non-empty set of distinct assistants.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    assistants: Vec<Assistant>,
}

impl Selection {
    /// Returns `None` for an empty list.
    pub fn new(assistants: Vec<Assistant>) -> Option<Self> {
        if assistants.is_empty() {
            None
        } else {
            Some(Self { assistants })
        }
    }

    /// First selected assistant.
    pub fn first(&self) -> &Assistant {
        &self.assistants[0]
    }

    pub fn assistants(&self) -> &[Assistant] {
        &self.assistants
    }

    pub fn len(&self) -> usize {
        self.assistants.len()
    }

    /// Always false.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Comma-separated display names.
    pub fn names(&self) -> String {
        self.assistants
            .iter()
            .map(Assistant::display_name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Zero-based indices named by a `1,3,4` style line.
///
/// Each token contributes its leading integer, if any; tokens without one,
/// and `0`, are dropped. Range checking is left to the caller.
pub fn parse_indices(input: &str) -> Vec<usize> {
    input
        .split(',')
        .filter_map(|token| leading_integer(token.trim()))
        .filter_map(|n| n.checked_sub(1))
        .collect()
}

fn leading_integer(token: &str) -> Option<usize> {
    let digits: String = token
        .strip_prefix('+')
        .unwrap_or(token)
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Candidates named by `input`, in candidate order, without duplicates.
pub fn pick(candidates: &[Assistant], input: &str) -> Vec<Assistant> {
    let wanted: HashSet<usize> = parse_indices(input).into_iter().collect();
    candidates
        .iter()
        .enumerate()
        .filter(|(index, _)| wanted.contains(index))
        .map(|(_, assistant)| assistant.clone())
        .collect()
}

/// Prompt until the user names at least one candidate.
///
/// Returns `Ok(None)` if input closes before a valid selection is made.
pub fn select_assistants(
    console: &mut dyn Console,
    candidates: &[Assistant],
) -> Result<Option<Selection>, ConsoleError> {
    loop {
        console.println(
            "Please select the assistants you would like to use by number, separated by commas:",
        );
        for (index, assistant) in candidates.iter().enumerate() {
            console.println(&format!("{}. {}", index + 1, assistant.display_name()));
        }

        let Some(line) = console.read_line("Enter your selections: ")? else {
            return Ok(None);
        };

        if let Some(selection) = Selection::new(pick(candidates, &line)) {
            debug!(selected = %selection.names(), "Assistants selected");
            return Ok(Some(selection));
        }

        debug!(input = %line, "Selection matched no assistant");
        console.println(INVALID_SELECTION);
    }
}
