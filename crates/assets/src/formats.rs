use image::ImageFormat;
use serde::{Deserialize, Serialize};

use crate::ResourceLoadError;

const GLB_MAGIC: &[u8; 4] = b"glTF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureFormat {
    Png,
    Jpeg,
}

/// What the cache knows about a loaded texture. The image is decoded once to
/// prove it is whole; the pixels themselves are left to the rendering backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureInfo {
    pub format: TextureFormat,
    pub width: u32,
    pub height: u32,
    pub byte_len: usize,
}

impl TextureInfo {
    /// Recognise a PNG or JPEG and decode it.
    pub fn parse(path: &str, bytes: &[u8]) -> Result<Self, ResourceLoadError> {
        let unrecognized = || ResourceLoadError::UnrecognizedFormat {
            path: path.to_string(),
        };
        let guessed = image::guess_format(bytes).map_err(|_| unrecognized())?;
        let format = match guessed {
            ImageFormat::Png => TextureFormat::Png,
            ImageFormat::Jpeg => TextureFormat::Jpeg,
            _ => return Err(unrecognized()),
        };
        let img = image::load_from_memory_with_format(bytes, guessed).map_err(|e| {
            ResourceLoadError::Malformed {
                path: path.to_string(),
                reason: e.to_string(),
            }
        })?;
        if img.width() == 0 || img.height() == 0 {
            return Err(ResourceLoadError::Malformed {
                path: path.to_string(),
                reason: "zero-sized image".into(),
            });
        }
        tracing::debug!(path, width = img.width(), height = img.height(), "texture decoded");
        Ok(Self {
            format,
            width: img.width(),
            height: img.height(),
            byte_len: bytes.len(),
        })
    }
}

/// Summary of a glTF model: enough to name its parts and tint them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelInfo {
    pub mesh_names: Vec<String>,
    pub material_colors: Vec<[f32; 4]>,
}

impl ModelInfo {
    /// Parse and validate a `.gltf` JSON document or a binary `.glb`.
    pub fn parse(path: &str, bytes: &[u8]) -> Result<Self, ResourceLoadError> {
        if !bytes.starts_with(GLB_MAGIC) && !bytes.trim_ascii_start().starts_with(b"{") {
            return Err(ResourceLoadError::UnrecognizedFormat {
                path: path.to_string(),
            });
        }
        let malformed = |reason: String| ResourceLoadError::Malformed {
            path: path.to_string(),
            reason,
        };
        let gltf = gltf::Gltf::from_slice(bytes).map_err(|e| malformed(e.to_string()))?;
        let version = &gltf.as_json().asset.version;
        if !version.starts_with('2') {
            return Err(malformed(format!("unsupported glTF version {version}")));
        }

        Ok(Self {
            mesh_names: gltf
                .meshes()
                .map(|m| {
                    m.name()
                        .map(str::to_owned)
                        .unwrap_or_else(|| format!("mesh_{}", m.index()))
                })
                .collect(),
            material_colors: gltf
                .materials()
                .map(|m| m.pbr_metallic_roughness().base_color_factor())
                .collect(),
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat, RgbImage};

    fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut Cursor::new(&mut bytes), format)
            .unwrap();
        bytes
    }

    pub fn png(width: u32, height: u32) -> Vec<u8> {
        encode(width, height, ImageFormat::Png)
    }

    pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
        encode(width, height, ImageFormat::Jpeg)
    }

    /// One triangle's worth of zeroed positions shared by two meshes.
    pub const GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "buffers": [{
            "byteLength": 36,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"
        }],
        "bufferViews": [{ "buffer": 0, "byteLength": 36 }],
        "accessors": [{
            "bufferView": 0,
            "componentType": 5126,
            "count": 3,
            "type": "VEC3",
            "min": [0.0, 0.0, 0.0],
            "max": [0.0, 0.0, 0.0]
        }],
        "meshes": [
            { "name": "bowl", "primitives": [{ "attributes": { "POSITION": 0 }, "material": 0 }] },
            { "primitives": [{ "attributes": { "POSITION": 0 }, "material": 1 }] }
        ],
        "materials": [
            { "pbrMetallicRoughness": { "baseColorFactor": [1.0, 0.5, 0.25, 1.0] } },
            {}
        ]
    }"#;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_dimensions_are_read() {
        let info = TextureInfo::parse("a.png", &fixtures::png(64, 48)).unwrap();
        assert_eq!(info.format, TextureFormat::Png);
        assert_eq!((info.width, info.height), (64, 48));
    }

    #[test]
    fn jpeg_dimensions_are_read() {
        let info = TextureInfo::parse("a.jpg", &fixtures::jpeg(40, 60)).unwrap();
        assert_eq!(info.format, TextureFormat::Jpeg);
        assert_eq!((info.width, info.height), (40, 60));
    }

    #[test]
    fn unknown_bytes_are_unrecognized() {
        assert!(matches!(
            TextureInfo::parse("a.txt", b"plain text"),
            Err(ResourceLoadError::UnrecognizedFormat { .. })
        ));
    }

    #[test]
    fn header_without_pixels_is_malformed() {
        // Signature and IHDR only: claims 640x480 but carries no image data.
        let mut stub = fixtures::png(640, 480);
        stub.truncate(33);
        assert!(matches!(
            TextureInfo::parse("a.png", &stub),
            Err(ResourceLoadError::Malformed { .. })
        ));
    }

    #[test]
    fn truncated_images_are_malformed() {
        let png = fixtures::png(8, 8);
        assert!(matches!(
            TextureInfo::parse("a.png", &png[..png.len() / 2]),
            Err(ResourceLoadError::Malformed { .. })
        ));
        assert!(matches!(
            TextureInfo::parse("a.jpg", &[0xff, 0xd8, 0xff, 0xd9]),
            Err(ResourceLoadError::Malformed { .. })
        ));
    }

    #[test]
    fn gltf_metadata_is_summarized() {
        let info = ModelInfo::parse("bowl.gltf", fixtures::GLTF.as_bytes()).unwrap();
        assert_eq!(info.mesh_names, vec!["bowl".to_string(), "mesh_1".to_string()]);
        assert_eq!(
            info.material_colors,
            vec![[1.0, 0.5, 0.25, 1.0], [1.0, 1.0, 1.0, 1.0]]
        );
    }

    #[test]
    fn glb_container_is_unwrapped() {
        let mut json = fixtures::GLTF.as_bytes().to_vec();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }
        let mut glb = b"glTF".to_vec();
        glb.extend_from_slice(&2u32.to_le_bytes());
        glb.extend_from_slice(&((20 + json.len()) as u32).to_le_bytes());
        glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"JSON");
        glb.extend_from_slice(&json);
        let info = ModelInfo::parse("bowl.glb", &glb).unwrap();
        assert_eq!(info.mesh_names.len(), 2);
    }

    #[test]
    fn bad_models_fail() {
        assert!(matches!(
            ModelInfo::parse("m.gltf", b"{ \"meshes\": [] }"),
            Err(ResourceLoadError::Malformed { .. })
        ));
        assert!(matches!(
            ModelInfo::parse("m.obj", b"v 0 0 0"),
            Err(ResourceLoadError::UnrecognizedFormat { .. })
        ));
        assert!(ModelInfo::parse("m.gltf", br#"{"asset":{"version":"1.0"}}"#).is_err());
    }
}
