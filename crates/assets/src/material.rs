use serde::{Deserialize, Serialize};

use crate::{MaterialId, TextureHandle};

/// Surface appearance for a drawable part (Phong-style parameters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub specular: [f32; 3],
    pub shininess: f32,
    pub texture: Option<TextureHandle>,
    pub double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".into(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            specular: [0.0, 0.0, 0.0],
            shininess: 30.0,
            texture: None,
            double_sided: false,
        }
    }
}

impl Material {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Opaque color from a packed `0xRRGGBB` value.
    pub fn with_color(mut self, rgb: u32) -> Self {
        self.base_color = unpack_rgb(rgb);
        self
    }

    pub fn with_specular(mut self, rgb: u32, shininess: f32) -> Self {
        let [r, g, b, _] = unpack_rgb(rgb);
        self.specular = [r, g, b];
        self.shininess = shininess;
        self
    }

    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }

    /// Content hash over every field, so equal materials share an id.
    pub fn id(&self) -> MaterialId {
        let floats: Vec<u8> = self
            .base_color
            .iter()
            .chain(self.specular.iter())
            .chain(std::iter::once(&self.shininess))
            .flat_map(|f| f.to_le_bytes())
            .collect();
        let texture = self.texture.map_or(0, |t| t.0).to_le_bytes();
        MaterialId::from_parts(&[
            self.name.as_bytes(),
            &floats,
            &texture,
            &[u8::from(self.texture.is_some()), u8::from(self.double_sided)],
        ])
    }
}

/// `0xRRGGBB` to linear-ish `[r, g, b, 1.0]` in 0..1.
pub fn unpack_rgb(rgb: u32) -> [f32; 4] {
    let channel = |shift: u32| ((rgb >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), 1.0]
}
