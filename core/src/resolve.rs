//! Layer resolution
//!
//! Walks each layer's rule list (last declared wins), falls back to the
//! dynamic template, and folds the scene placement into per-layer display
//! descriptors. Resolution is pure: it reads the shared configuration and
//! returns fresh values, never mutating definitions mid-scan.

use serde::Serialize;
use tachie_types::{PortraitLayer, RenderPriority, SceneConfig, SpriteSheet};

use crate::rules::{EvalContext, EvalError, evaluate};
use crate::template;

/// Display descriptor for one resolved layer, consumed by the host's
/// rendering side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLayer {
    /// Image to show, or `None` when no rule matched and no template is
    /// configured
    pub file_name: Option<String>,

    /// Displayed coordinate: scene slot base plus the layer's own offset
    pub x: i32,
    pub y: i32,

    /// Final scale factors: layer scale x scene scale, X negated when the
    /// scene mirrors
    pub scale_x: f32,
    pub scale_y: f32,

    pub opacity: u8,

    /// Gated by the scene's show switch
    pub visible: bool,

    /// Crop descriptor, passed through for the renderer to apply once the
    /// bitmap size is known
    pub sprite_sheet: Option<SpriteSheet>,

    /// Scene's sorting tier
    pub priority: RenderPriority,
}

/// Select the active file for one layer.
///
/// Rules are scanned in reverse declared order so that later entries
/// override earlier ones; the first passing rule wins. When none pass, the
/// layer's dynamic template is expanded instead, if configured.
pub fn resolve_file(layer: &PortraitLayer, ctx: &EvalContext) -> Result<Option<String>, EvalError> {
    for rule in layer.files.iter().rev() {
        if evaluate(rule, ctx)? {
            return Ok(Some(rule.file_name.clone()));
        }
    }
    Ok(layer
        .dynamic_file
        .as_deref()
        .map(|t| template::expand(t, ctx)))
}

/// Percent scale with 0 as the unset sentinel.
fn scale_factor(percent: u16) -> f32 {
    if percent == 0 {
        1.0
    } else {
        f32::from(percent) / 100.0
    }
}

/// Resolve every layer of one actor for one scene slot.
///
/// Returns `Ok(None)` when `layers` is empty or the scene has no base
/// coordinate for `slot`: there is nothing to show, which is not an error.
pub fn resolve_layers(
    layers: &[PortraitLayer],
    scene: &SceneConfig,
    slot: usize,
    ctx: &EvalContext,
) -> Result<Option<Vec<ResolvedLayer>>, EvalError> {
    let Some(base) = scene.positions.get(slot) else {
        return Ok(None);
    };
    if layers.is_empty() {
        return Ok(None);
    }

    let visible = scene.show_switch == 0 || ctx.game.switch(scene.show_switch);
    let mirror = if scene.mirror { -1.0 } else { 1.0 };

    let mut resolved = Vec::with_capacity(layers.len());
    for layer in layers {
        let file_name = resolve_file(layer, ctx)?;
        resolved.push(ResolvedLayer {
            file_name,
            x: base.x + layer.x,
            y: base.y + layer.y,
            scale_x: scale_factor(layer.scale_x) * scale_factor(scene.scale_x) * mirror,
            scale_y: scale_factor(layer.scale_y) * scale_factor(scene.scale_y),
            opacity: layer.opacity,
            visible,
            sprite_sheet: layer.sprite_sheet,
            priority: scene.priority,
        });
    }
    Ok(Some(resolved))
}
