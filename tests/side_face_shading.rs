use cgmath::{Matrix4, SquareMatrix, Vector2, Vector3, Vector4};
use image::{Rgba, RgbaImage};
use voxel_face_shading::shading::{
    atlas::build_texture_array,
    geometry::{scaled_model, translation_model},
    shade_fragment, shade_side_fragment, transform_vertex, AddressMode, AtlasBand, AtlasBinding,
    Sampler, TextureArray, TransformSet, VoxelVertex,
};

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn face_sheet(top: Rgba<u8>, side: Rgba<u8>, bottom: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_fn(12, 4, |x, _| match x / 4 {
        0 => top,
        1 => side,
        _ => bottom,
    })
}

fn two_type_atlas() -> TextureArray {
    build_texture_array(&[
        face_sheet(GREEN, RED, BLUE),
        face_sheet(RED, WHITE, GREEN),
    ])
    .unwrap()
}

#[test]
fn red_side_band_shades_red() {
    let atlas = build_texture_array(&[face_sheet(GREEN, RED, BLUE)]).unwrap();
    let sampler = Sampler::default();

    let color = shade_side_fragment(
        Vector2::new(0.5, 0.5),
        0,
        AtlasBinding::new(&atlas, &sampler),
    );
    assert_eq!(color, Vector4::new(1.0, 0.0, 0.0, 1.0));
}

#[test]
fn whole_face_reads_only_the_side_band() {
    let atlas = two_type_atlas();
    let sampler = Sampler::default();
    let binding = AtlasBinding::new(&atlas, &sampler);

    for i in 0..16 {
        for j in 0..16 {
            let uv = Vector2::new((i as f32 + 0.5) / 16.0, (j as f32 + 0.5) / 16.0);
            assert_eq!(
                shade_side_fragment(uv, 0, binding),
                Vector4::new(1.0, 0.0, 0.0, 1.0),
                "uv {uv:?}"
            );
            assert_eq!(
                shade_side_fragment(uv, 1, binding),
                Vector4::new(1.0, 1.0, 1.0, 1.0),
                "uv {uv:?}"
            );
        }
    }
}

#[test]
fn other_bands_read_their_own_tiles() {
    let atlas = two_type_atlas();
    let sampler = Sampler::default();
    let binding = AtlasBinding::new(&atlas, &sampler);
    let uv = Vector2::new(0.5, 0.5);

    assert_eq!(
        shade_fragment(uv, AtlasBand::Top, 0, binding),
        Vector4::new(0.0, 1.0, 0.0, 1.0)
    );
    assert_eq!(
        shade_fragment(uv, AtlasBand::Bottom, 0, binding),
        Vector4::new(0.0, 0.0, 1.0, 1.0)
    );
}

#[test]
fn side_remap_interval_is_exact() {
    assert_eq!(AtlasBand::Side.remap_u(0.0), -1.0 / 3.0);
    assert_eq!(AtlasBand::Side.remap_u(1.0), 0.0);
}

#[test]
fn side_band_is_red_for_every_vertical_address_mode() {
    let atlas = build_texture_array(&[face_sheet(GREEN, RED, BLUE)]).unwrap();

    for mode in [
        AddressMode::Repeat,
        AddressMode::ClampToEdge,
        AddressMode::MirrorRepeat,
    ] {
        let sampler = Sampler::for_atlas(mode);
        assert_eq!(
            shade_side_fragment(Vector2::new(0.5, 0.5), 0, AtlasBinding::new(&atlas, &sampler)),
            Vector4::new(1.0, 0.0, 0.0, 1.0),
            "{mode:?}"
        );
    }
}

#[test]
fn right_edge_of_the_face_lands_on_the_top_seam() {
    let atlas = build_texture_array(&[face_sheet(GREEN, RED, BLUE)]).unwrap();
    let sampler = Sampler::default();
    let binding = AtlasBinding::new(&atlas, &sampler);

    assert_eq!(
        shade_side_fragment(Vector2::new(0.99, 0.5), 0, binding),
        Vector4::new(1.0, 0.0, 0.0, 1.0)
    );
    assert_eq!(
        shade_side_fragment(Vector2::new(1.0, 0.5), 0, binding),
        Vector4::new(0.0, 1.0, 0.0, 1.0)
    );
}

#[test]
fn v_is_never_remapped() {
    // Rows differ only in v: top half white, bottom half red on the side tile.
    let sheet = RgbaImage::from_fn(12, 4, |x, y| match (x / 4, y / 2) {
        (1, 0) => WHITE,
        (1, _) => RED,
        _ => BLUE,
    });
    let atlas = build_texture_array(&[sheet]).unwrap();
    let sampler = Sampler::for_atlas(AddressMode::ClampToEdge);
    let binding = AtlasBinding::new(&atlas, &sampler);

    assert_eq!(
        shade_side_fragment(Vector2::new(0.5, 0.2), 0, binding),
        Vector4::new(1.0, 1.0, 1.0, 1.0)
    );
    assert_eq!(
        shade_side_fragment(Vector2::new(0.5, 0.8), 0, binding),
        Vector4::new(1.0, 0.0, 0.0, 1.0)
    );
}

#[test]
fn layers_do_not_bleed_into_each_other() {
    let sampler = Sampler::default();
    let uv = Vector2::new(0.25, 0.75);

    let atlas = two_type_atlas();
    let before = shade_side_fragment(uv, 0, AtlasBinding::new(&atlas, &sampler));

    let changed = build_texture_array(&[
        face_sheet(GREEN, RED, BLUE),
        face_sheet(BLUE, BLUE, BLUE),
    ])
    .unwrap();
    let after = shade_side_fragment(uv, 0, AtlasBinding::new(&changed, &sampler));

    assert_eq!(before, after);
    assert_ne!(
        shade_side_fragment(uv, 1, AtlasBinding::new(&atlas, &sampler)),
        shade_side_fragment(uv, 1, AtlasBinding::new(&changed, &sampler))
    );
}

#[test]
fn vertices_are_recentred_before_the_model_matrix() {
    let vertex = VoxelVertex::new([0.0, 0.0, 0.0], [0.0, 1.0]);
    let transforms =
        TransformSet::identity().with_model(scaled_model(Vector3::new(5.0, 0.0, 0.0), 4.0));

    let out = transform_vertex(&vertex, &transforms);
    assert_eq!(out.clip_position, Vector4::new(3.0, -2.0, -2.0, 1.0));
    assert_eq!(out.uv, Vector2::new(0.0, 1.0));
}

#[test]
fn draws_sharing_a_camera_differ_only_by_model() {
    let view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -10.0));
    let projection = Matrix4::identity();
    let camera = TransformSet::new(Matrix4::identity(), view, projection);
    let vertex = VoxelVertex::new([0.5, 0.5, 0.5], [0.5, 0.5]);

    let first = transform_vertex(
        &vertex,
        &camera.with_model(translation_model(Vector3::new(-1.0, 0.0, 0.0))),
    );
    let second = transform_vertex(
        &vertex,
        &camera.with_model(translation_model(Vector3::new(1.0, 0.0, 0.0))),
    );

    assert_eq!(first.clip_position, Vector4::new(-1.0, 0.0, -10.0, 1.0));
    assert_eq!(second.clip_position, Vector4::new(1.0, 0.0, -10.0, 1.0));
}

#[test]
fn repeated_shading_is_deterministic() {
    let atlas = two_type_atlas();
    let sampler = Sampler::default();
    let binding = AtlasBinding::new(&atlas, &sampler);
    let uv = Vector2::new(0.37, 0.61);

    let first = shade_side_fragment(uv, 1, binding);
    for _ in 0..8 {
        assert_eq!(shade_side_fragment(uv, 1, binding), first);
    }
}
