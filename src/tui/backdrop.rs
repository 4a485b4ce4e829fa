//! Animated backdrop behind the result area
//!
//! Draws one particle layer per visible ambient group. Opacity scales how
//! dense a layer is; a hidden group draws nothing.

use rand::RngExt;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

use crate::ambient::{AmbientGroup, AmbientSurface, GroupState};

/// Particles per 100 cells at full opacity
const RAIN_DENSITY: f32 = 3.0;
const SNOW_DENSITY: f32 = 2.0;
const CLOUD_DENSITY: f32 = 1.2;
const STAR_DENSITY: f32 = 0.8;
const FOG_DENSITY: f32 = 4.0;

/// Chance per tick that a visible lightning layer flashes
const LIGHTNING_CHANCE: f32 = 0.02;
const FLASH_TICKS: u8 = 3;

#[derive(Debug, Clone, Copy)]
struct Particle {
    x: f32,
    y: f32,
    /// Cells per second along the layer's direction
    speed: f32,
}

#[derive(Debug, Default)]
struct Layer {
    particles: Vec<Particle>,
}

/// Terminal surface for the ambient scene
#[derive(Debug)]
pub struct Backdrop {
    groups: [GroupState; 8],
    layers: [Layer; 8],
    width: u16,
    height: u16,
    flash: u8,
    elapsed: f32,
    mono: bool,
}

impl AmbientSurface for Backdrop {
    fn set_group(&mut self, group: AmbientGroup, state: GroupState) {
        self.groups[group as usize] = state;
        if !state.visible {
            self.layers[group as usize].particles.clear();
        }
    }
}

impl Backdrop {
    #[must_use]
    pub fn new(mono: bool) -> Self {
        Self {
            groups: [GroupState::HIDDEN; 8],
            layers: Default::default(),
            width: 0,
            height: 0,
            flash: 0,
            elapsed: 0.0,
            mono,
        }
    }

    /// Current visibility of a group
    #[must_use]
    pub fn state(&self, group: AmbientGroup) -> GroupState {
        self.groups[group as usize]
    }

    /// Whether any group is currently visible
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.groups.iter().any(|state| state.visible)
    }

    /// Advance the animation by `dt` seconds in an area of the given size
    pub fn tick(&mut self, width: u16, height: u16, dt: f32) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            for layer in &mut self.layers {
                layer.particles.clear();
            }
        }
        if width == 0 || height == 0 {
            return;
        }

        self.elapsed += dt;
        let mut rng = rand::rng();
        let (w, h) = (f32::from(width), f32::from(height));

        for group in AmbientGroup::ALL {
            let state = self.state(group);
            let layer = &mut self.layers[group as usize];
            if !state.visible {
                continue;
            }

            let target = match density(group) {
                Some(per_100) => ((w * h / 100.0) * per_100 * state.opacity.max(0.05)).ceil() as usize,
                None => 0,
            };
            while layer.particles.len() < target {
                layer.particles.push(Particle {
                    x: rng.random_range(0.0..w),
                    y: rng.random_range(0.0..h),
                    speed: rng.random_range(0.6..1.4) * base_speed(group),
                });
            }
            layer.particles.truncate(target);

            for particle in &mut layer.particles {
                match group {
                    AmbientGroup::Rain => {
                        particle.y += particle.speed * dt;
                        particle.x += particle.speed * dt * 0.15;
                    }
                    AmbientGroup::Snow => {
                        particle.y += particle.speed * dt;
                        particle.x += (self.elapsed * 1.7 + particle.y).sin() * dt;
                    }
                    AmbientGroup::Clouds | AmbientGroup::Fog => {
                        particle.x += particle.speed * dt;
                    }
                    _ => {}
                }

                if particle.y >= h {
                    particle.y -= h;
                    particle.x = rng.random_range(0.0..w);
                }
                particle.x = particle.x.rem_euclid(w);
            }
        }

        if self.state(AmbientGroup::Lightning).visible {
            if self.flash > 0 {
                self.flash -= 1;
            } else if rng.random_range(0.0..1.0) < LIGHTNING_CHANCE {
                self.flash = FLASH_TICKS;
            }
        } else {
            self.flash = 0;
        }
    }

    fn style(&self, color: Color) -> Style {
        if self.mono {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(color)
        }
    }
}

fn density(group: AmbientGroup) -> Option<f32> {
    match group {
        AmbientGroup::Rain => Some(RAIN_DENSITY),
        AmbientGroup::Snow => Some(SNOW_DENSITY),
        AmbientGroup::Clouds => Some(CLOUD_DENSITY),
        AmbientGroup::Stars => Some(STAR_DENSITY),
        AmbientGroup::Fog => Some(FOG_DENSITY),
        AmbientGroup::Lightning | AmbientGroup::SunRays | AmbientGroup::SunGlow => None,
    }
}

fn base_speed(group: AmbientGroup) -> f32 {
    match group {
        AmbientGroup::Rain => 18.0,
        AmbientGroup::Snow => 3.0,
        AmbientGroup::Clouds => 1.5,
        AmbientGroup::Fog => 0.6,
        _ => 0.0,
    }
}

fn glyph(group: AmbientGroup) -> &'static str {
    match group {
        AmbientGroup::Rain => "╲",
        AmbientGroup::Snow => "*",
        AmbientGroup::Clouds => "≈",
        AmbientGroup::Stars => "·",
        AmbientGroup::Fog => "░",
        _ => " ",
    }
}

fn color(group: AmbientGroup) -> Color {
    match group {
        AmbientGroup::Rain => Color::Blue,
        AmbientGroup::Snow => Color::White,
        AmbientGroup::Clouds => Color::DarkGray,
        AmbientGroup::Stars => Color::Yellow,
        AmbientGroup::Fog => Color::Gray,
        AmbientGroup::Lightning => Color::LightYellow,
        AmbientGroup::SunRays | AmbientGroup::SunGlow => Color::Yellow,
    }
}

impl Widget for &Backdrop {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        if self.flash > 0 {
            buf.set_style(area, Style::default().bg(if self.mono { Color::Gray } else { Color::LightYellow }));
        }

        if self.state(AmbientGroup::SunGlow).visible {
            let style = self.style(color(AmbientGroup::SunGlow));
            let x = area.right().saturating_sub(8);
            buf.set_string(x, area.top(), "( ☼ )", style);
        }

        if self.state(AmbientGroup::SunRays).visible {
            let style = self.style(color(AmbientGroup::SunRays));
            let phase = (self.elapsed * 2.0) as u16 % 2;
            let cx = area.right().saturating_sub(6);
            for step in 1..area.height.min(5) {
                let y = area.top() + step;
                let offset = step * 2 + phase;
                if cx >= area.left() + offset {
                    buf.set_string(cx - offset, y, "/", style);
                }
                if step + phase < area.height {
                    buf.set_string(cx, y, "|", style);
                }
            }
        }

        for group in AmbientGroup::ALL {
            if !self.state(group).visible {
                continue;
            }
            let style = self.style(color(group));
            for particle in &self.layers[group as usize].particles {
                let x = area.left() + (particle.x as u16).min(area.width - 1);
                let y = area.top() + (particle.y as u16).min(area.height - 1);
                buf.set_string(x, y, glyph(group), style);
            }
        }
    }
}
