//! Instruction context assembly

use chrono::NaiveDate;

use crate::persona::Persona;
use super::types::MemoryNote;

/// Combine persona instructions, memory notes and the mode/date line.
///
/// This is the only place the three meet. Notes are included only when
/// `memory_enabled` is set and at least one exists.
pub fn build_instruction_context(
    persona: &Persona,
    notes: &[MemoryNote],
    memory_enabled: bool,
    date: NaiveDate,
) -> String {
    let mut context = persona.instructions.to_string();

    if memory_enabled && !notes.is_empty() {
        context.push_str("\n\n## PERSISTENT MEMORY CONTEXT\n");
        context.push_str("The following facts/notes have been saved by the user:\n");
        let listed: Vec<String> = notes
            .iter()
            .enumerate()
            .map(|(i, note)| format!("{}. {}", i + 1, note.text))
            .collect();
        context.push_str(&listed.join("\n"));
    }

    context.push_str(&format!(
        "\n\nCurrent mode: {}. Date: {}.",
        persona.label,
        date.format("%Y-%m-%d")
    ));
    context
}
