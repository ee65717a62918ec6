//! Instruction Types
//!
//! Instruction sets are named, persistent system-prompt presets. Injected
//! instructions are temporary directives blended into generation prompts
//! until a use-count expiry is reached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named, reusable system-instruction preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionSet {
    pub id: Uuid,
    pub name: String,
    pub instructions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InstructionSet {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            instructions: instructions.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the name and text, bumping `updated_at`.
    pub fn update(&mut self, name: impl Into<String>, instructions: impl Into<String>) {
        self.name = name.into();
        self.instructions = instructions.into();
        self.updated_at = Utc::now();
    }
}

/// A temporary directive with a remaining-use counter.
///
/// Deactivates once it has been used in `expires_after` generation calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjectedInstruction {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub expires_after: u32,
    pub current_count: u32,
    pub active: bool,
}

impl InjectedInstruction {
    pub fn new(content: impl Into<String>, expires_after: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            created_at: Utc::now(),
            expires_after,
            current_count: 0,
            active: true,
        }
    }

    /// Counts one generation call that used this instruction.
    ///
    /// Returns true while the instruction remains active afterwards.
    pub fn record_use(&mut self) -> bool {
        self.current_count += 1;
        if self.current_count >= self.expires_after {
            self.active = false;
        }
        self.active
    }

    /// Uses left before expiry.
    pub fn remaining(&self) -> u32 {
        self.expires_after.saturating_sub(self.current_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_expires_after_n_uses() {
        let mut instruction = InjectedInstruction::new("mention the weather", 3);
        assert!(instruction.active);
        assert_eq!(instruction.remaining(), 3);

        assert!(instruction.record_use());
        assert!(instruction.record_use());
        assert!(!instruction.record_use());
        assert!(!instruction.active);
        assert_eq!(instruction.remaining(), 0);
    }

    #[test]
    fn test_zero_use_instruction_expires_immediately() {
        let mut instruction = InjectedInstruction::new("noop", 0);
        assert!(!instruction.record_use());
    }

    #[test]
    fn test_instruction_set_update_bumps_timestamp() {
        let mut set = InstructionSet::new("edgy", "be contrarian");
        let created = set.updated_at;
        set.update("edgy", "be very contrarian");
        assert!(set.updated_at >= created);
        assert_eq!(set.instructions, "be very contrarian");
    }

    #[test]
    fn test_injected_instruction_roundtrip() {
        let instruction = InjectedInstruction::new("plug the event", 5);
        let json = serde_json::to_string(&instruction).unwrap();
        let parsed: InjectedInstruction = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, instruction);
    }
}
