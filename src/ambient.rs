//! Ambient backdrop selection
//!
//! Each weather category turns on a fixed set of decorative layer groups.
//! The controller pushes the resulting scene to whatever surface draws the
//! backdrop; without a surface it does nothing.

use serde::Serialize;
use tracing::debug;

use crate::classify::WeatherCategory;

/// Decorative layer groups a backdrop can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbientGroup {
    Clouds,
    Rain,
    Snow,
    Stars,
    Lightning,
    SunRays,
    SunGlow,
    Fog,
}

impl AmbientGroup {
    pub const ALL: [AmbientGroup; 8] = [
        AmbientGroup::Clouds,
        AmbientGroup::Rain,
        AmbientGroup::Snow,
        AmbientGroup::Stars,
        AmbientGroup::Lightning,
        AmbientGroup::SunRays,
        AmbientGroup::SunGlow,
        AmbientGroup::Fog,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Visibility of one group
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupState {
    pub visible: bool,
    /// 0.0 (transparent) to 1.0
    pub opacity: f32,
}

impl GroupState {
    pub const HIDDEN: GroupState = GroupState {
        visible: false,
        opacity: 0.0,
    };

    #[must_use]
    pub const fn shown(opacity: f32) -> Self {
        Self {
            visible: true,
            opacity,
        }
    }
}

/// Complete backdrop configuration for one category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientScene {
    pub category: Option<WeatherCategory>,
    groups: [GroupState; 8],
}

impl AmbientScene {
    /// Every group hidden
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            category: None,
            groups: [GroupState::HIDDEN; 8],
        }
    }

    #[must_use]
    pub fn state(&self, group: AmbientGroup) -> GroupState {
        self.groups[group.index()]
    }

    /// Groups with their state, in [`AmbientGroup::ALL`] order
    pub fn groups(&self) -> impl Iterator<Item = (AmbientGroup, GroupState)> + '_ {
        AmbientGroup::ALL
            .into_iter()
            .map(|group| (group, self.state(group)))
    }

    pub fn visible_groups(&self) -> impl Iterator<Item = AmbientGroup> + '_ {
        self.groups()
            .filter(|(_, state)| state.visible)
            .map(|(group, _)| group)
    }

    fn with(mut self, group: AmbientGroup, opacity: f32) -> Self {
        self.groups[group.index()] = GroupState::shown(opacity);
        self
    }
}

/// Static category to scene table
#[must_use]
pub fn scene_for(category: WeatherCategory) -> AmbientScene {
    use AmbientGroup::*;

    let scene = AmbientScene {
        category: Some(category),
        ..AmbientScene::empty()
    };

    match category {
        WeatherCategory::Clear => scene.with(SunRays, 1.0).with(SunGlow, 1.0),
        WeatherCategory::Rain => scene.with(Rain, 1.0).with(Clouds, 0.2),
        WeatherCategory::Snow => scene.with(Snow, 1.0).with(Clouds, 0.15),
        WeatherCategory::Thunder => scene
            .with(Rain, 1.0)
            .with(Lightning, 1.0)
            .with(Clouds, 0.25),
        WeatherCategory::PartlyCloudy => scene.with(Clouds, 0.2),
        WeatherCategory::Fog => scene.with(Fog, 1.0),
        WeatherCategory::Overcast | WeatherCategory::WindyDefault => scene.with(Clouds, 0.15),
    }
}

/// Something that can show or hide decorative groups
pub trait AmbientSurface {
    fn set_group(&mut self, group: AmbientGroup, state: GroupState);
}

/// Applies scenes to an optional surface
#[derive(Debug)]
pub struct AmbientController<S> {
    surface: Option<S>,
    scene: Option<AmbientScene>,
}

impl<S: AmbientSurface> AmbientController<S> {
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self {
            surface: Some(surface),
            scene: None,
        }
    }

    /// A controller with nothing to draw on
    #[must_use]
    pub fn detached() -> Self {
        Self {
            surface: None,
            scene: None,
        }
    }

    /// Show the scene for a category; calling it twice has no further effect
    pub fn apply(&mut self, category: WeatherCategory) {
        self.push(scene_for(category));
    }

    /// Hide every group
    pub fn clear(&mut self) {
        self.push(AmbientScene::empty());
    }

    /// Last scene pushed to the surface
    #[must_use]
    pub fn scene(&self) -> Option<&AmbientScene> {
        self.scene.as_ref()
    }

    #[must_use]
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    fn push(&mut self, scene: AmbientScene) {
        let Some(surface) = self.surface.as_mut() else {
            debug!("No ambient surface attached, skipping scene update");
            return;
        };

        for (group, state) in scene.groups() {
            surface.set_group(group, state);
        }
        self.scene = Some(scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    #[derive(Default)]
    struct RecordingSurface {
        groups: HashMap<AmbientGroup, GroupState>,
        writes: usize,
    }

    impl AmbientSurface for RecordingSurface {
        fn set_group(&mut self, group: AmbientGroup, state: GroupState) {
            self.groups.insert(group, state);
            self.writes += 1;
        }
    }

    #[rstest]
    #[case(WeatherCategory::Clear, &[(AmbientGroup::SunRays, 1.0), (AmbientGroup::SunGlow, 1.0)])]
    #[case(WeatherCategory::Rain, &[(AmbientGroup::Clouds, 0.2), (AmbientGroup::Rain, 1.0)])]
    #[case(WeatherCategory::Snow, &[(AmbientGroup::Clouds, 0.15), (AmbientGroup::Snow, 1.0)])]
    #[case(WeatherCategory::Thunder, &[(AmbientGroup::Clouds, 0.25), (AmbientGroup::Rain, 1.0), (AmbientGroup::Lightning, 1.0)])]
    #[case(WeatherCategory::PartlyCloudy, &[(AmbientGroup::Clouds, 0.2)])]
    #[case(WeatherCategory::Fog, &[(AmbientGroup::Fog, 1.0)])]
    #[case(WeatherCategory::Overcast, &[(AmbientGroup::Clouds, 0.15)])]
    #[case(WeatherCategory::WindyDefault, &[(AmbientGroup::Clouds, 0.15)])]
    fn test_scene_table(#[case] category: WeatherCategory, #[case] expected: &[(AmbientGroup, f32)]) {
        let scene = scene_for(category);
        let visible: Vec<_> = scene
            .groups()
            .filter(|(_, state)| state.visible)
            .map(|(group, state)| (group, state.opacity))
            .collect();
        assert_eq!(visible, expected);

        for (group, state) in scene.groups() {
            if !state.visible {
                assert_eq!(state.opacity, 0.0, "{group:?} hidden but not transparent");
            }
        }
    }

    #[test]
    fn test_stars_never_shown() {
        for category in [
            WeatherCategory::Clear,
            WeatherCategory::PartlyCloudy,
            WeatherCategory::Overcast,
            WeatherCategory::Fog,
            WeatherCategory::Rain,
            WeatherCategory::Snow,
            WeatherCategory::Thunder,
            WeatherCategory::WindyDefault,
        ] {
            assert!(!scene_for(category).state(AmbientGroup::Stars).visible);
        }
    }

    #[test]
    fn test_apply_writes_every_group() {
        let mut controller = AmbientController::new(RecordingSurface::default());
        controller.apply(WeatherCategory::Thunder);

        let surface = controller.surface().unwrap();
        assert_eq!(surface.groups.len(), AmbientGroup::ALL.len());
        assert!(surface.groups[&AmbientGroup::Lightning].visible);
        assert!(!surface.groups[&AmbientGroup::SunRays].visible);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut controller = AmbientController::new(RecordingSurface::default());
        controller.apply(WeatherCategory::Snow);
        let first = controller.surface().unwrap().groups.clone();
        controller.apply(WeatherCategory::Snow);
        assert_eq!(controller.surface().unwrap().groups, first);
        assert_eq!(controller.surface().unwrap().writes, 2 * AmbientGroup::ALL.len());
    }

    #[test]
    fn test_switching_category_hides_previous_groups() {
        let mut controller = AmbientController::new(RecordingSurface::default());
        controller.apply(WeatherCategory::Clear);
        controller.apply(WeatherCategory::Fog);

        let surface = controller.surface().unwrap();
        assert!(!surface.groups[&AmbientGroup::SunRays].visible);
        assert!(surface.groups[&AmbientGroup::Fog].visible);
    }

    #[test]
    fn test_clear_hides_everything() {
        let mut controller = AmbientController::new(RecordingSurface::default());
        controller.apply(WeatherCategory::Rain);
        controller.clear();

        let surface = controller.surface().unwrap();
        assert!(surface.groups.values().all(|state| !state.visible));
        assert_eq!(controller.scene().unwrap().visible_groups().count(), 0);
    }

    #[test]
    fn test_detached_controller_is_noop() {
        let mut controller: AmbientController<RecordingSurface> = AmbientController::detached();
        controller.apply(WeatherCategory::Clear);
        controller.clear();
        assert!(controller.surface().is_none());
        assert!(controller.scene().is_none());
    }
}
