//! Engine-neutral geometry and pixels to Bevy assets.

use bevy::image::ImageSampler;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use citygen::material::MaterialParams;
use citygen::mesh_data::MeshData;
use citygen::raster::RasterImage;
use citygen::repository::Rgba;

/// Emissive strength of a fully lit window at `emissive == 1`.
const WINDOW_GLOW: f32 = 4.0;

pub fn mesh_from_data(data: &MeshData) -> Mesh {
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, data.positions.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, data.normals.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, data.uvs.clone());
    mesh.insert_indices(Indices::U32(data.indices.clone()));
    mesh
}

/// Pixel-art texture: nearest filtering keeps window edges crisp.
pub fn image_from_raster(raster: &RasterImage) -> Image {
    let mut image = Image::new(
        Extent3d {
            width: raster.width.max(1),
            height: raster.height.max(1),
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        padded_bytes(raster),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    );
    image.sampler = ImageSampler::nearest();
    image
}

// Zero-sized rasters still need one texel for a valid texture.
fn padded_bytes(raster: &RasterImage) -> Vec<u8> {
    if raster.width == 0 || raster.height == 0 {
        vec![0; 4]
    } else {
        raster.to_bytes()
    }
}

pub fn color_from_rgba(rgba: Rgba) -> Color {
    Color::srgba_u8(rgba[0], rgba[1], rgba[2], rgba[3])
}

/// Write `params` into an existing building material.
pub fn apply_material_params(material: &mut StandardMaterial, params: &MaterialParams) {
    let [r, g, b] = params.base_color;
    material.base_color = Color::srgb(r, g, b);
    material.emissive = LinearRgba::rgb(1.0, 1.0, 1.0) * (params.emissive * WINDOW_GLOW);
}

/// Facade material: the atlas both colors the walls and drives the window glow.
pub fn building_material(atlas: Handle<Image>, params: &MaterialParams) -> StandardMaterial {
    let mut material = StandardMaterial {
        base_color_texture: Some(atlas.clone()),
        emissive_texture: Some(atlas),
        perceptual_roughness: 0.85,
        ..default()
    };
    apply_material_params(&mut material, params);
    material
}

/// Unlit, alpha-blended, visible from both sides.
pub fn sign_material(texture: Handle<Image>) -> StandardMaterial {
    StandardMaterial {
        base_color_texture: Some(texture),
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        double_sided: true,
        cull_mode: None,
        ..default()
    }
}

#[cfg(test)]
mod tests {
    use bevy::render::mesh::VertexAttributeValues;

    use super::*;
    use citygen::mesh_data::building_shell;

    #[test]
    fn test_mesh_keeps_all_attributes() {
        let data = building_shell(20.0, 30.0, 0.4);
        let mesh = mesh_from_data(&data);
        match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(v)) => assert_eq!(v.len(), data.vertex_count()),
            _ => panic!("shell mesh should have positions"),
        }
        match mesh.attribute(Mesh::ATTRIBUTE_UV_0) {
            Some(VertexAttributeValues::Float32x2(v)) => assert_eq!(v.len(), data.vertex_count()),
            _ => panic!("shell mesh should have uvs"),
        }
        if let Some(Indices::U32(idx)) = mesh.indices() {
            assert_eq!(idx.len(), data.triangle_count() * 3);
        } else {
            panic!("shell mesh should have u32 indices");
        }
    }

    #[test]
    fn test_image_matches_raster() {
        let mut raster = RasterImage::new(3, 2, [0, 0, 0, 255]);
        raster.set(2, 1, [255, 10, 20, 255]);
        let image = image_from_raster(&raster);
        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 2);
        let offset = (3 + 2) * 4;
        assert_eq!(&image.data[offset..offset + 4], &[255, 10, 20, 255]);
    }

    #[test]
    fn test_empty_raster_gets_one_texel() {
        let image = image_from_raster(&RasterImage::new(0, 0, [0; 4]));
        assert_eq!(image.width(), 1);
        assert_eq!(image.data.len(), 4);
    }

    #[test]
    fn test_material_params_applied() {
        let params = MaterialParams {
            base_color: [0.5, 0.25, 1.0],
            emissive: 0.5,
        };
        let material = building_material(Handle::default(), &params);
        assert_eq!(material.base_color, Color::srgb(0.5, 0.25, 1.0));
        assert!((material.emissive.red - 0.5 * WINDOW_GLOW).abs() < 1e-6);
        assert!(material.emissive_texture.is_some());
    }
}
