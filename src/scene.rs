//! Scene state machine
//!
//! One owner holds the current scene; menus and the play loop send commands
//! and get the next scene back.

use serde::{Deserialize, Serialize};

use crate::settings::Level;

/// Top-level scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Scene {
    #[default]
    Title,
    SelectLevel,
    Play(Level),
    Clear { level: Level, elapsed_ms: u64 },
    HowToPlay,
}

/// Requests that move between scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneCommand {
    /// "Start" on the title screen
    Start,
    /// "How to play" on the title screen
    ShowHowToPlay,
    /// A level button on the level screen
    ChooseLevel(Level),
    /// "Back" on the level or how-to-play screen
    Back,
    /// Marker left the field
    PlayCleared { elapsed_ms: u64 },
    /// "Return to title" on the clear screen
    ReturnToTitle,
}

impl Scene {
    /// Next scene for `command`; commands that make no sense here are ignored
    pub fn transition(self, command: SceneCommand) -> Scene {
        let next = match (self, command) {
            (Scene::Title, SceneCommand::Start) => Scene::SelectLevel,
            (Scene::Title, SceneCommand::ShowHowToPlay) => Scene::HowToPlay,
            (Scene::SelectLevel, SceneCommand::ChooseLevel(level)) => Scene::Play(level),
            (Scene::SelectLevel, SceneCommand::Back) => Scene::Title,
            (Scene::HowToPlay, SceneCommand::Back) => Scene::Title,
            (Scene::Play(level), SceneCommand::PlayCleared { elapsed_ms }) => {
                Scene::Clear { level, elapsed_ms }
            }
            (Scene::Clear { .. }, SceneCommand::ReturnToTitle) => Scene::Title,
            (scene, command) => {
                log::debug!("Ignoring {:?} in {:?}", command, scene);
                return scene;
            }
        };
        log::info!("Scene {:?} -> {:?}", self, next);
        next
    }

    /// Parse a debug start-scene tag
    ///
    /// `clear` starts on an easy-level clear screen with a zero time.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "title" => Some(Scene::Title),
            "level" => Some(Scene::SelectLevel),
            "play-easy" => Some(Scene::Play(Level::Easy)),
            "play-normal" => Some(Scene::Play(Level::Normal)),
            "play-hard" => Some(Scene::Play(Level::Hard)),
            "clear" => Some(Scene::Clear {
                level: Level::Easy,
                elapsed_ms: 0,
            }),
            "how-to-play" => Some(Scene::HowToPlay),
            _ => None,
        }
    }
}

/// Format a clear time as minutes and seconds
pub fn format_clear_time(elapsed_ms: u64) -> String {
    let secs = elapsed_ms / 1000;
    format!("{}m {}s", secs / 60, secs % 60)
}
