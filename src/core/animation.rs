//! Sprite-sheet clip playback.
//!
//! Every animated entity carries a [`ClipPlayer`] holding its clip table. Each
//! clip lives in its own sheet (`sprites/<prefix>/<clip>.png`), laid out as a
//! grid of equally sized frames.

use std::collections::HashMap;

use bevy::prelude::*;
use serde::Deserialize;

use super::events::ClipFinished;

/// Frame layout and playback settings of one clip.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ClipSpec {
    pub frames: usize,
    pub fps: f32,
    #[serde(default)]
    pub looping: bool,
    /// Size of one frame in the sheet, in pixels.
    #[serde(default = "default_frame_size")]
    pub frame_size: (u32, u32),
    /// Frames per sheet row. Zero means a single row.
    #[serde(default)]
    pub columns: u32,
}

fn default_frame_size() -> (u32, u32) {
    (64, 64)
}

impl ClipSpec {
    pub fn new(frames: usize, fps: f32, looping: bool) -> Self {
        Self {
            frames,
            fps,
            looping,
            frame_size: default_frame_size(),
            columns: 0,
        }
    }

    fn frame_duration(&self) -> f32 {
        1.0 / self.fps.max(f32::EPSILON)
    }

    fn grid(&self) -> (u32, u32) {
        let frames = self.frames.max(1) as u32;
        let columns = if self.columns == 0 { frames } else { self.columns };
        (columns, frames.div_ceil(columns))
    }
}

/// Plays one named clip at a time.
#[derive(Component, Debug, Clone, Default)]
pub struct ClipPlayer {
    clips: HashMap<String, ClipSpec>,
    current: Option<String>,
    frame: usize,
    elapsed: f32,
    finished: bool,
}

impl ClipPlayer {
    pub fn new(clips: HashMap<String, ClipSpec>) -> Self {
        Self {
            clips,
            ..default()
        }
    }

    /// Start `name` unless it is already the current clip. Returns `true` when
    /// playback switched.
    pub fn play(&mut self, name: &str) -> bool {
        if self.current.as_deref() == Some(name) {
            return false;
        }
        self.restart(name)
    }

    /// Start `name` from its first frame even if it is already current.
    pub fn restart(&mut self, name: &str) -> bool {
        if !self.clips.contains_key(name) {
            warn!("Unknown animation clip: {}", name);
            return false;
        }
        self.current = Some(name.to_string());
        self.frame = 0;
        self.elapsed = 0.0;
        self.finished = false;
        true
    }

    pub fn is_playing(&self, name: &str) -> bool {
        self.current.as_deref() == Some(name) && !self.finished
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn clips(&self) -> &HashMap<String, ClipSpec> {
        &self.clips
    }

    /// Advance playback by `delta` seconds. Returns `true` on the call where a
    /// one-shot clip completes.
    pub fn advance(&mut self, delta: f32) -> bool {
        if self.finished {
            return false;
        }
        let Some(spec) = self.current.as_ref().and_then(|name| self.clips.get(name)) else {
            return false;
        };

        let frame_duration = spec.frame_duration();
        let last_frame = spec.frames.saturating_sub(1);
        let looping = spec.looping;

        self.elapsed += delta;
        while self.elapsed >= frame_duration {
            self.elapsed -= frame_duration;
            if self.frame < last_frame {
                self.frame += 1;
            } else if looping {
                self.frame = 0;
            } else {
                self.finished = true;
                return true;
            }
        }
        false
    }
}

/// Loaded sheet handles for each clip of a [`ClipPlayer`].
#[derive(Component, Clone, Default)]
pub struct ClipSheets {
    pub sheets: HashMap<String, (Handle<Image>, Handle<TextureAtlasLayout>)>,
}

impl ClipSheets {
    /// Load `sprites/<prefix>/<clip>.png` for every clip.
    pub fn load(
        asset_server: &AssetServer,
        layouts: &mut Assets<TextureAtlasLayout>,
        prefix: &str,
        clips: &HashMap<String, ClipSpec>,
    ) -> Self {
        let sheets = clips
            .iter()
            .map(|(name, spec)| {
                let image = asset_server.load(format!("sprites/{}/{}.png", prefix, name));
                let (columns, rows) = spec.grid();
                let layout = layouts.add(TextureAtlasLayout::from_grid(
                    UVec2::new(spec.frame_size.0, spec.frame_size.1),
                    columns,
                    rows,
                    None,
                    None,
                ));
                (name.clone(), (image, layout))
            })
            .collect();
        Self { sheets }
    }
}

/// Advance every clip player and report completed one-shot clips.
pub fn advance_clips(
    time: Res<Time>,
    mut query: Query<(Entity, &mut ClipPlayer)>,
    mut finished: EventWriter<ClipFinished>,
) {
    let delta = time.delta_secs();

    for (entity, mut player) in query.iter_mut() {
        if player.advance(delta) {
            let clip = player.current().unwrap_or_default().to_string();
            finished.send(ClipFinished { entity, clip });
        }
    }
}

/// Point sprites at the sheet and frame of their current clip.
pub fn sync_clip_sprites(
    mut query: Query<(&ClipPlayer, &ClipSheets, &mut Sprite), Changed<ClipPlayer>>,
) {
    for (player, sheets, mut sprite) in query.iter_mut() {
        let Some((image, layout)) = player.current().and_then(|name| sheets.sheets.get(name))
        else {
            continue;
        };

        if sprite.image != *image {
            sprite.image = image.clone();
        }
        sprite.texture_atlas = Some(TextureAtlas {
            layout: layout.clone(),
            index: player.frame(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> ClipPlayer {
        ClipPlayer::new(HashMap::from([
            ("walk".to_string(), ClipSpec::new(4, 10.0, true)),
            ("dead".to_string(), ClipSpec::new(3, 10.0, false)),
        ]))
    }

    #[test]
    fn test_play_is_noop_for_current_clip() {
        let mut clips = player();
        assert!(clips.play("walk"));
        clips.advance(0.15);
        assert_eq!(clips.frame(), 1);

        assert!(!clips.play("walk"));
        assert_eq!(clips.frame(), 1);

        assert!(clips.restart("walk"));
        assert_eq!(clips.frame(), 0);
    }

    #[test]
    fn test_unknown_clip_is_rejected() {
        let mut clips = player();
        assert!(!clips.play("fly"));
        assert_eq!(clips.current(), None);
    }

    #[test]
    fn test_looping_clip_wraps() {
        let mut clips = player();
        clips.play("walk");
        for _ in 0..4 {
            assert!(!clips.advance(0.1));
        }
        assert_eq!(clips.frame(), 0);
        assert!(clips.is_playing("walk"));
    }

    #[test]
    fn test_one_shot_clip_finishes_once() {
        let mut clips = player();
        clips.play("dead");
        assert!(!clips.advance(0.25));
        assert_eq!(clips.frame(), 2);

        assert!(clips.advance(0.1));
        assert!(clips.is_finished());
        assert!(!clips.is_playing("dead"));
        assert!(!clips.advance(1.0));
        assert_eq!(clips.frame(), 2);
    }

    #[test]
    fn test_grid_defaults_to_one_row() {
        let spec = ClipSpec::new(7, 10.0, false);
        assert_eq!(spec.grid(), (7, 1));

        let spec = ClipSpec {
            columns: 3,
            ..spec
        };
        assert_eq!(spec.grid(), (3, 3));
    }

    #[test]
    fn test_clip_spec_from_ron() {
        let spec: ClipSpec = ron::from_str("(frames: 10, fps: 15.0, looping: true)").unwrap();
        assert_eq!(spec.frames, 10);
        assert!(spec.looping);
        assert_eq!(spec.frame_size, (64, 64));
    }
}
