// systems/dialogue.rs
//
// The guide's script and a wrapping cursor over its lines.

use serde::{Deserialize, Serialize};

use super::character::Motion;

/// Id of the terminal farewell line.
pub const GOODBYE_ID: &str = "goodbye";

/// One line of the guide's script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub id: String,
    /// Display text. May embed simple inline markup (`<b>`, `<br/>`).
    pub text: String,
    /// Broadcast on the guide channel when the line becomes current.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Gesture the character plays when the line becomes current.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion: Option<Motion>,
}

impl DialogueLine {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            action: None,
            motion: None,
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = Some(motion);
        self
    }
}

/// Standalone script document: `{ "dialogues": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogueScript {
    #[serde(default)]
    pub dialogues: Vec<DialogueLine>,
}

impl DialogueScript {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Cursor over a non-empty script.
#[derive(Debug, Clone)]
pub struct DialogueSequencer {
    lines: Vec<DialogueLine>,
    index: usize,
}

impl DialogueSequencer {
    /// `None` for an empty script: there is no current line to show.
    pub fn new(lines: Vec<DialogueLine>) -> Option<Self> {
        if lines.is_empty() {
            return None;
        }
        Some(Self { lines, index: 0 })
    }

    /// Advance one line, wrapping to the first after the last.
    pub fn next(&mut self) -> &DialogueLine {
        self.index = (self.index + 1) % self.lines.len();
        &self.lines[self.index]
    }

    /// Move to the line with `id`. Unknown ids leave the cursor alone.
    pub fn jump_to(&mut self, id: &str) -> bool {
        match self.lines.iter().position(|l| l.id == id) {
            Some(i) => {
                self.index = i;
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn current(&self) -> &DialogueLine {
        &self.lines[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Never true; a sequencer always holds at least one line.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The farewell line hides the "next" hint.
    pub fn is_terminal(&self) -> bool {
        self.current().id == GOODBYE_ID
    }

    pub fn lines(&self) -> &[DialogueLine] {
        &self.lines
    }
}
