//! Instruction registry.
//!
//! Two kinds of steering live here. Instruction sets are named system
//! preambles; at most one is selected and it replaces the default preamble
//! wholesale. Injected instructions are short-lived behavioral nudges mixed
//! into post and reply prompts until their use budget runs out.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sim_types::{InjectedInstruction, InstructionSet};

/// Named preambles plus active injections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstructionLibrary {
    #[serde(default)]
    sets: Vec<InstructionSet>,
    #[serde(default)]
    selected: Option<Uuid>,
    #[serde(default)]
    injected: Vec<InjectedInstruction>,
}

impl InstructionLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the library from snapshot parts.
    pub fn from_parts(
        sets: Vec<InstructionSet>,
        selected: Option<Uuid>,
        injected: Vec<InjectedInstruction>,
    ) -> Self {
        let selected = selected.filter(|id| sets.iter().any(|set| set.id == *id));
        Self {
            sets,
            selected,
            injected,
        }
    }

    pub fn sets(&self) -> &[InstructionSet] {
        &self.sets
    }

    pub fn injected(&self) -> &[InjectedInstruction] {
        &self.injected
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        self.selected
    }

    /// Adds a named instruction set and returns its id.
    pub fn add_set(&mut self, name: impl Into<String>, instructions: impl Into<String>) -> Uuid {
        let set = InstructionSet::new(name, instructions);
        let id = set.id;
        self.sets.push(set);
        id
    }

    /// Updates a set in place. Returns false when the id is unknown.
    pub fn update_set(
        &mut self,
        id: Uuid,
        name: impl Into<String>,
        instructions: impl Into<String>,
    ) -> bool {
        match self.sets.iter_mut().find(|set| set.id == id) {
            Some(set) => {
                set.update(name, instructions);
                true
            }
            None => false,
        }
    }

    /// Removes a set, clearing the selection if it pointed at it.
    pub fn remove_set(&mut self, id: Uuid) {
        self.sets.retain(|set| set.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    /// Selects a set as the active preamble. Returns false for unknown ids.
    pub fn select_set(&mut self, id: Uuid) -> bool {
        if self.sets.iter().any(|set| set.id == id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The selected set's instruction text, if any.
    pub fn selected_instructions(&self) -> Option<&str> {
        let id = self.selected?;
        self.sets
            .iter()
            .find(|set| set.id == id)
            .map(|set| set.instructions.as_str())
    }

    /// Injects a behavioral instruction that expires after `expires_after`
    /// uses.
    pub fn inject(&mut self, content: impl Into<String>, expires_after: u32) -> Uuid {
        let instruction = InjectedInstruction::new(content, expires_after);
        let id = instruction.id;
        self.injected.push(instruction);
        id
    }

    /// Contents of every currently active injection.
    pub fn active_injections(&self) -> Vec<String> {
        self.injected
            .iter()
            .filter(|instruction| instruction.active)
            .map(|instruction| instruction.content.clone())
            .collect()
    }

    /// Ids of every currently active injection.
    pub fn active_injection_ids(&self) -> Vec<Uuid> {
        self.injected
            .iter()
            .filter(|instruction| instruction.active)
            .map(|instruction| instruction.id)
            .collect()
    }

    /// Records one use of an injection, deactivating it once the budget is
    /// spent. Returns whether the injection is still active.
    pub fn record_use(&mut self, id: Uuid) -> bool {
        self.injected
            .iter_mut()
            .find(|instruction| instruction.id == id)
            .map(|instruction| instruction.record_use())
            .unwrap_or(false)
    }

    /// Deactivates an injection without removing it.
    pub fn deactivate(&mut self, id: Uuid) {
        if let Some(instruction) = self.injected.iter_mut().find(|i| i.id == id) {
            instruction.active = false;
        }
    }

    /// Removes an injection entirely.
    pub fn remove_injection(&mut self, id: Uuid) {
        self.injected.retain(|instruction| instruction.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_and_read_set() {
        let mut library = InstructionLibrary::new();
        let id = library.add_set("pirate", "Talk like a pirate.");
        assert!(library.select_set(id));
        assert_eq!(library.selected_instructions(), Some("Talk like a pirate."));
    }

    #[test]
    fn test_select_unknown_set_is_rejected() {
        let mut library = InstructionLibrary::new();
        assert!(!library.select_set(Uuid::new_v4()));
        assert_eq!(library.selected_instructions(), None);
    }

    #[test]
    fn test_removing_selected_set_clears_selection() {
        let mut library = InstructionLibrary::new();
        let id = library.add_set("pirate", "Talk like a pirate.");
        library.select_set(id);
        library.remove_set(id);
        assert_eq!(library.selected_id(), None);
        assert_eq!(library.selected_instructions(), None);
    }

    #[test]
    fn test_injection_expires_after_budget() {
        let mut library = InstructionLibrary::new();
        let id = library.inject("Mention the weather.", 2);

        assert_eq!(library.active_injections().len(), 1);
        assert!(library.record_use(id));
        assert!(!library.record_use(id));
        assert!(library.active_injections().is_empty());
    }

    #[test]
    fn test_record_use_on_unknown_id() {
        let mut library = InstructionLibrary::new();
        assert!(!library.record_use(Uuid::new_v4()));
    }

    #[test]
    fn test_from_parts_drops_dangling_selection() {
        let library = InstructionLibrary::from_parts(Vec::new(), Some(Uuid::new_v4()), Vec::new());
        assert_eq!(library.selected_id(), None);
    }
}
