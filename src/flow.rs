//! Scene flow
//!
//! Menu -> Playing -> Won / GameOver, driven by an explicit transition table.
//! `App` owns the live session while a game is being played and tears it
//! down (cancelling every pending timer) when the `Playing` scene is left.

use crate::consts::*;
use crate::hud::Hud;
use crate::settings::Settings;
use crate::sim::{EndSummary, GameEvent, GameState, Outcome, TickInput, tick};

/// One SDG-6 target shown on the win screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub id: &'static str,
    pub title: &'static str,
}

pub static TARGETS: [Target; 8] = [
    Target { id: "6.1", title: "Safe and affordable drinking water" },
    Target { id: "6.2", title: "Sanitation and hygiene for all" },
    Target { id: "6.3", title: "Improve water quality" },
    Target { id: "6.4", title: "Efficient water use" },
    Target { id: "6.5", title: "Integrated water resources management" },
    Target { id: "6.6", title: "Protect water-related ecosystems" },
    Target { id: "6.a", title: "International cooperation" },
    Target { id: "6.b", title: "Community participation" },
];

/// Win screen page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinPage {
    Summary,
    /// Index into `TARGETS`
    Target(usize),
}

impl WinPage {
    pub fn target(self) -> Option<&'static Target> {
        match self {
            WinPage::Summary => None,
            WinPage::Target(i) => TARGETS.get(i),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scene {
    Menu,
    Playing,
    Won { summary: EndSummary, page: WinPage },
    GameOver { summary: EndSummary },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneTrigger {
    Start,
    Finished(Outcome, EndSummary),
    Restart,
    NextPage,
    PreviousPage,
    PlayAgain,
    Quit,
}

impl Scene {
    pub fn name(&self) -> &'static str {
        match self {
            Scene::Menu => "Menu",
            Scene::Playing => "Playing",
            Scene::Won { .. } => "Won",
            Scene::GameOver { .. } => "GameOver",
        }
    }

    /// The trigger bound to the confirm key / tap on this scene, if any
    pub fn primary_action(&self) -> Option<SceneTrigger> {
        match *self {
            Scene::Menu => Some(SceneTrigger::Start),
            Scene::Playing => None,
            Scene::GameOver { .. } => Some(SceneTrigger::Restart),
            Scene::Won {
                page: WinPage::Target(i),
                ..
            } if i + 1 == TARGETS.len() => Some(SceneTrigger::PlayAgain),
            Scene::Won { .. } => Some(SceneTrigger::NextPage),
        }
    }

    /// The transition table. `None` means the pair is not listed.
    pub fn next(self, trigger: SceneTrigger) -> Option<Scene> {
        use SceneTrigger as T;
        let last = TARGETS.len() - 1;

        match (self, trigger) {
            (Scene::Menu, T::Start) => Some(Scene::Playing),
            (Scene::Playing, T::Finished(Outcome::Won, summary)) => Some(Scene::Won {
                summary,
                page: WinPage::Summary,
            }),
            (Scene::Playing, T::Finished(Outcome::Lost, summary)) => {
                Some(Scene::GameOver { summary })
            }
            (Scene::Playing, T::Quit) => Some(Scene::Menu),
            (Scene::GameOver { .. }, T::Restart) => Some(Scene::Playing),
            (
                Scene::Won {
                    summary,
                    page: WinPage::Summary,
                },
                T::NextPage,
            ) => Some(Scene::Won {
                summary,
                page: WinPage::Target(0),
            }),
            (
                Scene::Won {
                    summary,
                    page: WinPage::Target(i),
                },
                T::NextPage,
            ) if i < last => Some(Scene::Won {
                summary,
                page: WinPage::Target(i + 1),
            }),
            (
                Scene::Won {
                    summary,
                    page: WinPage::Target(i),
                },
                T::PreviousPage,
            ) if i > 0 => Some(Scene::Won {
                summary,
                page: WinPage::Target(i - 1),
            }),
            (
                Scene::Won {
                    page: WinPage::Target(i),
                    ..
                },
                T::PlayAgain,
            ) if i == last => Some(Scene::Menu),
            _ => None,
        }
    }
}

/// Application shell state: current scene, live session and its HUD
pub struct App {
    pub settings: Settings,
    scene: Scene,
    session: Option<GameState>,
    hud: Option<Hud>,
    base_seed: u64,
    sessions_started: u64,
    accumulator: f32,
}

impl App {
    /// `base_seed` feeds sessions when the settings don't pin a seed
    pub fn new(settings: Settings, base_seed: u64) -> Self {
        Self {
            settings,
            scene: Scene::Menu,
            session: None,
            hud: None,
            base_seed,
            sessions_started: 0,
            accumulator: 0.0,
        }
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn session(&self) -> Option<&GameState> {
        self.session.as_ref()
    }

    pub fn hud(&self) -> Option<&Hud> {
        self.hud.as_ref()
    }

    pub fn hud_mut(&mut self) -> Option<&mut Hud> {
        self.hud.as_mut()
    }

    /// Fire a scene trigger. Returns true if the scene changed.
    pub fn trigger(&mut self, trigger: SceneTrigger) -> bool {
        let Some(next) = self.scene.next(trigger) else {
            log::debug!("Ignored {:?} in scene {}", trigger, self.scene.name());
            return false;
        };
        log::info!("Scene {} -> {} ({:?})", self.scene.name(), next.name(), trigger);

        if self.scene == Scene::Playing {
            self.end_session();
        }
        if next == Scene::Playing {
            self.begin_session();
        }
        self.scene = next;
        true
    }

    fn begin_session(&mut self) {
        let seed = self
            .settings
            .seed
            .unwrap_or_else(|| self.base_seed.wrapping_add(self.sessions_started));
        self.sessions_started += 1;

        let mut state = GameState::new(self.settings.variant, self.settings.tuning(), seed);
        state.start();
        let mut hud = Hud::new();
        for event in state.drain_events() {
            hud.apply(&event);
        }
        self.session = Some(state);
        self.hud = Some(hud);
        self.accumulator = 0.0;
    }

    fn end_session(&mut self) {
        if let Some(mut state) = self.session.take() {
            state.shutdown();
        }
        self.hud = None;
    }

    /// Run one fixed simulation step and route the resulting events.
    ///
    /// HUD touch buttons are merged into `input`. A hand-off event moves the
    /// app to the matching end scene.
    pub fn step(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let Some(state) = self.session.as_mut() else {
            return Vec::new();
        };
        let input = input
            .clone()
            .with_touch(self.hud.as_ref().map(|hud| &hud.touch));
        tick(state, &input, SIM_DT);
        let events = state.drain_events();

        if let Some(hud) = self.hud.as_mut() {
            for event in &events {
                hud.apply(event);
            }
        }

        let handoff = events.iter().find_map(|event| match *event {
            GameEvent::Handoff { outcome, summary } => Some((outcome, summary)),
            _ => None,
        });
        if let Some((outcome, summary)) = handoff {
            self.trigger(SceneTrigger::Finished(outcome, summary));
        }
        events
    }

    /// Accumulate wall-clock time and run as many fixed steps as are due,
    /// capped at `MAX_SUBSTEPS` per frame.
    pub fn update(&mut self, frame_dt: f32, input: &TickInput) -> Vec<GameEvent> {
        if self.session.is_none() {
            self.accumulator = 0.0;
            return Vec::new();
        }
        self.accumulator += frame_dt.clamp(0.0, 0.1);

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            events.extend(self.step(input));
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;
    use crate::tuning::Variant;

    fn summary() -> EndSummary {
        EndSummary {
            score: 120,
            items_collected: 9,
            progress_percent: 80,
        }
    }

    fn won_at(page: WinPage) -> Scene {
        Scene::Won {
            summary: summary(),
            page,
        }
    }

    #[test]
    fn test_listed_transitions() {
        assert_eq!(Scene::Menu.next(SceneTrigger::Start), Some(Scene::Playing));
        assert_eq!(
            Scene::Playing.next(SceneTrigger::Finished(Outcome::Won, summary())),
            Some(won_at(WinPage::Summary))
        );
        assert_eq!(
            Scene::Playing.next(SceneTrigger::Finished(Outcome::Lost, summary())),
            Some(Scene::GameOver { summary: summary() })
        );
        assert_eq!(Scene::Playing.next(SceneTrigger::Quit), Some(Scene::Menu));
        assert_eq!(
            Scene::GameOver { summary: summary() }.next(SceneTrigger::Restart),
            Some(Scene::Playing)
        );
    }

    #[test]
    fn test_win_pages_walk_every_target() {
        let mut scene = won_at(WinPage::Summary);
        for i in 0..TARGETS.len() {
            scene = scene.next(SceneTrigger::NextPage).unwrap();
            assert_eq!(scene, won_at(WinPage::Target(i)));
        }
        // No page past the last target
        assert_eq!(scene.next(SceneTrigger::NextPage), None);
        assert_eq!(scene.next(SceneTrigger::PlayAgain), Some(Scene::Menu));

        assert_eq!(
            won_at(WinPage::Target(3)).next(SceneTrigger::PreviousPage),
            Some(won_at(WinPage::Target(2)))
        );
        assert_eq!(won_at(WinPage::Target(0)).next(SceneTrigger::PreviousPage), None);
        assert_eq!(won_at(WinPage::Target(5)).next(SceneTrigger::PlayAgain), None);
    }

    #[test]
    fn test_unlisted_pairs_are_ignored() {
        assert_eq!(Scene::Menu.next(SceneTrigger::Restart), None);
        assert_eq!(Scene::Menu.next(SceneTrigger::Quit), None);
        assert_eq!(Scene::Playing.next(SceneTrigger::Start), None);
        assert_eq!(won_at(WinPage::Summary).next(SceneTrigger::Quit), None);
        let game_over = Scene::GameOver { summary: summary() };
        assert_eq!(
            game_over.next(SceneTrigger::Finished(Outcome::Won, summary())),
            None
        );
    }

    #[test]
    fn test_primary_action_is_always_listed() {
        let scenes = [
            Scene::Menu,
            Scene::GameOver { summary: summary() },
            won_at(WinPage::Summary),
            won_at(WinPage::Target(0)),
            won_at(WinPage::Target(7)),
        ];
        for scene in scenes {
            let trigger = scene.primary_action().unwrap();
            assert!(scene.next(trigger).is_some(), "{:?} on {:?}", trigger, scene);
        }
        assert_eq!(Scene::Playing.primary_action(), None);
    }

    #[test]
    fn test_target_lookup() {
        assert_eq!(WinPage::Summary.target(), None);
        assert_eq!(WinPage::Target(0).target().map(|t| t.id), Some("6.1"));
        assert_eq!(WinPage::Target(7).target().map(|t| t.id), Some("6.b"));
    }

    #[test]
    fn test_start_creates_session_and_hud() {
        let mut app = App::new(Settings::default(), 1);
        assert!(app.session().is_none());
        assert!(app.trigger(SceneTrigger::Start));
        let session = app.session().unwrap();
        assert_eq!(session.phase, GamePhase::Running);
        let hud = app.hud().unwrap();
        assert_eq!(hud.health, 3);
        assert_eq!(hud.max_distance, 100.0);
    }

    #[test]
    fn test_quit_shuts_the_session_down() {
        let mut app = App::new(Settings::default(), 1);
        app.trigger(SceneTrigger::Start);
        app.update(0.5, &TickInput::default());
        assert!(app.trigger(SceneTrigger::Quit));
        assert_eq!(app.scene(), Scene::Menu);
        assert!(app.session().is_none() && app.hud().is_none());
        assert!(app.update(0.1, &TickInput::default()).is_empty());
    }

    #[test]
    fn test_ignored_trigger_keeps_scene() {
        let mut app = App::new(Settings::default(), 1);
        assert!(!app.trigger(SceneTrigger::Restart));
        assert_eq!(app.scene(), Scene::Menu);
    }

    #[test]
    fn test_loss_hands_off_to_game_over() {
        let settings = Settings {
            seed: Some(9),
            ..Settings::default().with_variant(Variant::Platformer)
        };
        let mut app = App::new(settings, 0);
        app.trigger(SceneTrigger::Start);

        // Walk off the safe start into the first gap
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        let mut ticks = 0;
        while app.scene() == Scene::Playing && ticks < 60 * 30 {
            app.step(&right);
            ticks += 1;
        }
        match app.scene() {
            Scene::GameOver { summary } => assert!(summary.progress_percent < 100),
            other => panic!("expected game over, got {:?}", other),
        }
        assert!(app.session().is_none());
    }

    #[test]
    fn test_restart_uses_a_fresh_seed() {
        let mut app = App::new(Settings::default(), 100);
        app.trigger(SceneTrigger::Start);
        let first = app.session().unwrap().seed;
        app.trigger(SceneTrigger::Quit);
        app.trigger(SceneTrigger::Start);
        assert_ne!(app.session().unwrap().seed, first);
    }

    #[test]
    fn test_touch_buttons_drive_the_player() {
        let mut app = App::new(Settings::default(), 3);
        app.trigger(SceneTrigger::Start);
        let x = app.session().unwrap().player.body.pos.x;
        app.hud_mut().unwrap().touch.left = true;
        app.step(&TickInput::default());
        assert!(app.session().unwrap().player.body.pos.x < x);
    }

    #[test]
    fn test_update_caps_substeps() {
        let mut app = App::new(Settings::default(), 3);
        app.trigger(SceneTrigger::Start);
        // A long stall is clamped and never runs more than the substep cap
        app.update(10.0, &TickInput::default());
        let ticks = app.session().unwrap().time_ticks;
        assert!((5..=MAX_SUBSTEPS as u64).contains(&ticks));
    }
}
