//! In-combat health bar prompt
//!
//! ```text
//! You: [##########################                          ] 50/100
//! Rat: [####################################################] 12/12
//! ```
//! (shown without markup)

use crate::application::ports::outbound::WorldStatePort;
use crate::domain::entities::Character;
use crate::domain::value_objects::{CharacterId, HEALTH};

/// Total display width of one prompt line
const DISPLAY_WIDTH: usize = 60;
const SELF_LABEL: &str = "You";
/// `": "` after the name plus the space before the numbers
const SEPARATOR_WIDTH: usize = 3;

const HEALTHY_COLOR: &str = "green";
const HOSTILE_COLOR: &str = "red";

pub struct PromptBuilder;

impl PromptBuilder {
    /// Render the viewer's combat prompt
    ///
    /// Returns an empty string when the viewer isn't fighting anyone.
    pub fn render(world: &dyn WorldStatePort, viewer: CharacterId) -> String {
        let Some(viewer) = world.character(viewer) else {
            return String::new();
        };
        if !viewer.is_in_combat() {
            return String::new();
        }

        let combatants: Vec<Character> = viewer
            .combatants
            .iter()
            .filter_map(|id| world.character(*id))
            .collect();

        let name_width = combatants
            .iter()
            .map(|target| target.name.chars().count())
            .fold(SELF_LABEL.len(), usize::max);
        let bar_width = DISPLAY_WIDTH.saturating_sub(name_width + SEPARATOR_WIDTH);

        let mut lines = Vec::with_capacity(combatants.len() + 1);
        lines.push(Self::health_line(SELF_LABEL, &viewer, name_width, bar_width, HEALTHY_COLOR));
        for target in &combatants {
            lines.push(Self::health_line(&target.name, target, name_width, bar_width, HOSTILE_COLOR));
        }

        lines.join("\r\n")
    }

    fn health_line(
        label: &str,
        entity: &Character,
        name_width: usize,
        bar_width: usize,
        color: &str,
    ) -> String {
        let current = entity.get_attribute(HEALTH);
        let max = entity.get_max_attribute(HEALTH);
        let pad = " ".repeat(name_width.saturating_sub(label.chars().count()));

        format!(
            "<b>{label}{pad}</b>: {} <b>{current}/{max}</b>",
            progress_bar(bar_width, health_percentage(current, max), color)
        )
    }
}

/// `floor(current / max * 100)`, clamped to 0..=100; 0 for an empty pool
pub fn health_percentage(current: i32, max: i32) -> u32 {
    if max <= 0 {
        return 0;
    }
    let percent = i64::from(current) * 100 / i64::from(max);
    percent.clamp(0, 100) as u32
}

/// `[####      ]` of the given total width, brackets included
pub fn progress_bar(width: usize, percent: u32, color: &str) -> String {
    let inner = width.saturating_sub(2);
    let filled = inner * percent.min(100) as usize / 100;

    format!(
        "<{color}>[{}{}]</{color}>",
        "#".repeat(filled),
        " ".repeat(inner - filled)
    )
}
