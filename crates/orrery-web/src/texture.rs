use std::cell::{Cell, RefCell};
use std::rc::Rc;

use orrery_engine::{load_texture, AssetError, TextureId, TextureLoaded, TextureLoader, TextureRequest};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

/// Decoded images by texture slot, shared with the JS renderer.
///
/// Slots belong to one body table at a time; `reset` empties them and names
/// the table that now owns them.
#[derive(Clone, Default)]
pub struct TextureSlots {
    images: Rc<RefCell<Vec<Option<HtmlImageElement>>>>,
    generation: Rc<Cell<u32>>,
}

impl TextureSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, texture: TextureId, image: HtmlImageElement) {
        let mut images = self.images.borrow_mut();
        let slot = texture.0 as usize;
        if images.len() <= slot {
            images.resize(slot + 1, None);
        }
        images[slot] = Some(image);
    }

    pub fn get(&self, texture: TextureId) -> Option<HtmlImageElement> {
        self.images.borrow().get(texture.0 as usize).cloned().flatten()
    }

    /// Drop every image and hand the slots to body table `generation`.
    pub fn reset(&self, generation: u32) {
        self.images.borrow_mut().clear();
        self.generation.set(generation);
    }

    pub fn generation(&self) -> u32 {
        self.generation.get()
    }

    /// Whether a load for body table `generation` may still fill a slot.
    pub fn accepts(&self, generation: u32) -> bool {
        self.generation.get() == generation
    }

    pub fn len(&self) -> usize {
        self.images.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.borrow().is_empty()
    }
}

/// Loads textures through `<img>` elements; decoded images land in
/// [`TextureSlots`] for the renderer to upload.
#[derive(Clone, Default)]
pub struct ImageTextureLoader {
    slots: TextureSlots,
}

impl ImageTextureLoader {
    pub fn new(slots: TextureSlots) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &TextureSlots {
        &self.slots
    }
}

impl TextureLoader for ImageTextureLoader {
    async fn load(&self, request: &TextureRequest) -> Result<(), AssetError> {
        let fail = |reason: String| AssetError::TextureLoad {
            url: request.url.clone(),
            reason,
        };

        let image = HtmlImageElement::new().map_err(|e| fail(format!("{e:?}")))?;
        image.set_cross_origin(Some("anonymous"));
        image.set_src(&request.url);
        JsFuture::from(image.decode())
            .await
            .map_err(|e| fail(format!("{e:?}")))?;

        // The table may have been replaced while the image decoded
        if !self.slots.accepts(request.generation) {
            log::debug!("{} decoded after its table was replaced, not storing", request.url);
            return Ok(());
        }
        self.slots.insert(request.texture, image);
        Ok(())
    }
}

/// Fetch every request in the background. Each texture that loads is handed
/// to `on_loaded`; failures are logged by the loader and dropped.
pub fn spawn_texture_loads<F>(loader: &ImageTextureLoader, requests: Vec<TextureRequest>, on_loaded: F)
where
    F: Fn(TextureLoaded) + Clone + 'static,
{
    for request in requests {
        let loader = loader.clone();
        let on_loaded = on_loaded.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Some(loaded) = load_texture(&loader, request).await {
                on_loaded(loaded);
            }
        });
    }
}
