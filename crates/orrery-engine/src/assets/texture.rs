use std::future::Future;

use crate::api::types::{BodyId, TextureId};
use crate::assets::error::AssetError;
use crate::core::color::Color;
use crate::core::system::BodySystem;

/// Surface appearance of a body: a base color, optionally replaced by a
/// texture once it has loaded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Material {
    pub color: Color,
    pub texture: Option<TextureId>,
}

impl Material {
    pub fn new(color: Color) -> Self {
        Self { color, texture: None }
    }

    /// The "texture attached" transition. Color is kept as the fallback tint.
    pub fn with_texture(self, texture: TextureId) -> Self {
        Self {
            texture: Some(texture),
            ..self
        }
    }

    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }
}

/// A texture a body wants, waiting to be fetched.
///
/// `generation` names the body table the request came from. Body and texture
/// ids restart at 0 with every table, so a load that outlives its table must
/// not be applied to the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRequest {
    pub body: BodyId,
    pub texture: TextureId,
    pub url: String,
    pub generation: u32,
}

impl TextureRequest {
    pub fn with_generation(mut self, generation: u32) -> Self {
        self.generation = generation;
        self
    }
}

/// A successfully loaded texture, ready to be attached to its body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureLoaded {
    pub body: BodyId,
    pub texture: TextureId,
    pub generation: u32,
}

impl TextureLoaded {
    pub fn from_request(request: &TextureRequest) -> Self {
        Self {
            body: request.body,
            texture: request.texture,
            generation: request.generation,
        }
    }

    /// Attach the texture to the body's material. Returns false when the body
    /// no longer exists.
    pub fn apply(&self, system: &mut BodySystem) -> bool {
        match system.get_mut(self.body) {
            Some(body) => {
                body.material = body.material.clone().with_texture(self.texture);
                true
            }
            None => false,
        }
    }
}

/// Resolves texture URLs on the host.
///
/// The browser implementation decodes an image element and registers it with
/// the renderer under the requested slot, unless the request's generation has
/// been superseded in the meantime.
pub trait TextureLoader {
    fn load(&self, request: &TextureRequest) -> impl Future<Output = Result<(), AssetError>>;
}

/// Fetch one texture. Failures are logged and yield `None`, leaving the body
/// with its plain color material.
pub async fn load_texture<L: TextureLoader>(
    loader: &L,
    request: TextureRequest,
) -> Option<TextureLoaded> {
    match loader.load(&request).await {
        Ok(()) => {
            log::debug!("texture {:?} loaded from {}", request.texture, request.url);
            Some(TextureLoaded::from_request(&request))
        }
        Err(e) => {
            log::warn!("{e}");
            None
        }
    }
}
