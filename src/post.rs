//! Post-processing composer.
//!
//! Turns the current preferences into an ordered effect chain. The renderer
//! consumes the flattened [`PostParams`], one composite pass for the whole chain.

use crate::constants::*;
use crate::scene::SceneKind;
use crate::settings::VisualSettings;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    Antialias,
    Bloom {
        threshold: f32,
        smoothing: f32,
        intensity: f32,
    },
    ChromaticAberration {
        offset: [f32; 2],
    },
    Vignette {
        offset: f32,
        darkness: f32,
    },
    Noise {
        opacity: f32,
    },
}

impl Effect {
    /// Position in the canonical chain order.
    pub fn rank(&self) -> u8 {
        match self {
            Effect::Antialias => 0,
            Effect::Bloom { .. } => 1,
            Effect::ChromaticAberration { .. } => 2,
            Effect::Vignette { .. } => 3,
            Effect::Noise { .. } => 4,
        }
    }
}

/// Effects in canonical order, at most one of each kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostChain {
    effects: SmallVec<[Effect; 5]>,
}

impl PostChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert keeping canonical order; an effect of the same kind is replaced.
    pub fn push(&mut self, effect: Effect) {
        let rank = effect.rank();
        match self.effects.iter().position(|e| e.rank() >= rank) {
            Some(i) if self.effects[i].rank() == rank => self.effects[i] = effect,
            Some(i) => self.effects.insert(i, effect),
            None => self.effects.push(effect),
        }
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn bloom(&self) -> Option<(f32, f32, f32)> {
        self.effects.iter().find_map(|e| match *e {
            Effect::Bloom {
                threshold,
                smoothing,
                intensity,
            } => Some((threshold, smoothing, intensity)),
            _ => None,
        })
    }
}

/// Chain for `kind` under the given preferences.
///
/// `None` means "present the raw scene". Disabling effects in the preferences
/// does not remove the chain; that toggle only governs the material shimmer.
pub fn compose(
    kind: SceneKind,
    settings: &VisualSettings,
    reduced_motion: bool,
    hovered: bool,
) -> Option<PostChain> {
    if reduced_motion {
        return None;
    }
    let low = settings.low_quality_mode;
    let mut chain = PostChain::new();
    match kind {
        SceneKind::Hero => {
            chain.push(Effect::Antialias);
            chain.push(Effect::Bloom {
                threshold: HERO_BLOOM_THRESHOLD,
                smoothing: HERO_BLOOM_SMOOTHING,
                intensity: settings.bloom_intensity * HERO_BLOOM_GAIN,
            });
            if !low {
                chain.push(Effect::ChromaticAberration {
                    offset: HERO_CA_OFFSET,
                });
            }
            chain.push(Effect::Vignette {
                offset: VIGNETTE_OFFSET,
                darkness: VIGNETTE_DARKNESS,
            });
            if !low {
                chain.push(Effect::Noise {
                    opacity: NOISE_OPACITY,
                });
            }
        }
        SceneKind::About => {
            let hover = if hovered { 2.0 } else { 1.0 };
            chain.push(Effect::Bloom {
                threshold: ABOUT_BLOOM_THRESHOLD,
                smoothing: ABOUT_BLOOM_SMOOTHING,
                intensity: settings.bloom_intensity * ABOUT_BLOOM_GAIN * hover,
            });
            if !low {
                chain.push(Effect::ChromaticAberration {
                    offset: if hovered {
                        ABOUT_CA_OFFSET_HOVER
                    } else {
                        ABOUT_CA_OFFSET
                    },
                });
            }
        }
    }
    Some(chain)
}

/// Flat uniform block consumed by the composite shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PostParams {
    /// x: viewport width, y: height, z: time, w: unused.
    pub frame: [f32; 4],
    /// Blur direction in texels; written per blur pass.
    pub blur_dir: [f32; 4],
    /// x: threshold, y: smoothing, z: intensity, w: unused.
    pub bloom: [f32; 4],
    /// x,y: chromatic offset; z: vignette offset; w: vignette darkness.
    pub lens: [f32; 4],
    /// x: noise opacity.
    pub grain: [f32; 4],
    /// AA, bloom, CA, vignette enables (0 or 1); noise rides on `grain.y`.
    pub toggles: [f32; 4],
}

impl PostParams {
    pub fn from_chain(chain: &PostChain) -> Self {
        let mut p = PostParams::default();
        for effect in chain.effects() {
            match *effect {
                Effect::Antialias => p.toggles[0] = 1.0,
                Effect::Bloom {
                    threshold,
                    smoothing,
                    intensity,
                } => {
                    p.bloom = [threshold, smoothing, intensity, 0.0];
                    p.toggles[1] = 1.0;
                }
                Effect::ChromaticAberration { offset } => {
                    p.lens[0] = offset[0];
                    p.lens[1] = offset[1];
                    p.toggles[2] = 1.0;
                }
                Effect::Vignette { offset, darkness } => {
                    p.lens[2] = offset;
                    p.lens[3] = darkness;
                    p.toggles[3] = 1.0;
                }
                Effect::Noise { opacity } => {
                    p.grain = [opacity, 1.0, 0.0, 0.0];
                }
            }
        }
        p
    }

    pub fn with_frame(mut self, width: u32, height: u32, time: f32) -> Self {
        self.frame = [width as f32, height as f32, time, 0.0];
        self
    }

    pub fn has_bloom(&self) -> bool {
        self.toggles[1] > 0.5
    }
}
